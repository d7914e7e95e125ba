use qvm_pass_envelope::{decode_reply, CompletedInvocation, RequestEnvelope};
use qvm_pass_transport::{QrexecClient, RpcChannel};
use tracing::debug;

use crate::error::Result;

/// qrexec service exposed by the vault for read-only operations.
pub const READ_SERVICE: &str = "qubes.PasswordStoreRead";
/// qrexec service exposed by the vault for mutating operations.
pub const WRITE_SERVICE: &str = "qubes.PasswordStoreWrite";

/// Dispatches password-store operations to the vault qube.
///
/// Each operation is one envelope exchange over the channel. Remote exit
/// codes are data, not errors: a failed remote command still yields a
/// [`CompletedInvocation`] so callers can forward its streams and code
/// verbatim.
#[derive(Debug)]
pub struct PassClient<C = QrexecClient> {
    channel: C,
    vault: String,
}

impl PassClient<QrexecClient> {
    /// A client talking to `vault` through the standard qrexec utility.
    pub fn new(vault: impl Into<String>) -> Self {
        Self::with_channel(QrexecClient::new(), vault)
    }
}

impl<C: RpcChannel> PassClient<C> {
    /// A client with an explicit channel implementation.
    pub fn with_channel(channel: C, vault: impl Into<String>) -> Self {
        Self {
            channel,
            vault: vault.into(),
        }
    }

    /// The vault qube this client targets.
    pub fn vault(&self) -> &str {
        &self.vault
    }

    /// Invoke a read-only command on the vault.
    pub fn read(&self, command: &str, args: &[String]) -> Result<CompletedInvocation> {
        self.call(READ_SERVICE, command, args, None)
    }

    /// Invoke a mutating command on the vault, optionally with stdin.
    pub fn write(
        &self,
        command: &str,
        args: &[String],
        stdin: Option<&[u8]>,
    ) -> Result<CompletedInvocation> {
        self.call(WRITE_SERVICE, command, args, stdin)
    }

    fn call(
        &self,
        service: &str,
        command: &str,
        args: &[String],
        stdin: Option<&[u8]>,
    ) -> Result<CompletedInvocation> {
        let request = RequestEnvelope::new(command, args, stdin);
        let payload = request.to_bytes()?;
        let raw = self
            .channel
            .call(&self.vault, service, request.selector(), &payload)?;
        let invocation = decode_reply(&raw, &request.a)?;
        debug!(
            command,
            exit_code = invocation.exit_code,
            "vault invocation completed"
        );
        Ok(invocation)
    }
}
