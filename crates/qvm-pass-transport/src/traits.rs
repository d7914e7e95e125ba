use crate::error::Result;

/// A synchronous RPC channel to another qube.
///
/// One call is one request/reply exchange: the request bytes are delivered
/// to the remote service's stdin, the reply bytes come back from its stdout.
/// [`QrexecClient`](crate::qrexec::QrexecClient) is the production
/// implementation; tests substitute mocks at this seam.
pub trait RpcChannel {
    /// Invoke `service` on `destination`, passing `arg` as the qrexec
    /// service argument and `input` on stdin; returns the reply bytes.
    fn call(&self, destination: &str, service: &str, arg: &str, input: &[u8]) -> Result<Vec<u8>>;
}
