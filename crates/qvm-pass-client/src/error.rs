/// Errors surfaced by the RPC dispatcher.
///
/// Both variants are transparent so pinned wording ("Unexpected reply", the
/// JSON parser's own message) reaches stderr verbatim when printed.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The qrexec exchange itself failed.
    #[error(transparent)]
    Transport(#[from] qvm_pass_transport::TransportError),

    /// The reply could not be decoded or did not echo the request.
    #[error(transparent)]
    Envelope(#[from] qvm_pass_envelope::EnvelopeError),
}

pub type Result<T> = std::result::Result<T, ClientError>;
