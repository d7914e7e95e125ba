use std::io::Write;
use std::process::{Command, Stdio};

use tracing::debug;

use crate::error::{Result, TransportError};
use crate::traits::RpcChannel;

/// The qrexec client utility available inside every qube.
pub const DEFAULT_PROGRAM: &str = "qrexec-client-vm";

/// Format the qrexec service token: `service+arg`, or the bare service name
/// when there is no argument.
pub fn service_token(service: &str, arg: &str) -> String {
    if arg.is_empty() {
        service.to_string()
    } else {
        format!("{service}+{arg}")
    }
}

/// Shells out to `qrexec-client-vm` for each call.
///
/// The utility is invoked as `qrexec-client-vm <dest> <service>+<arg>` with
/// the request payload piped to stdin. Its stdout (the reply bytes) is
/// captured; its stderr stays attached to the caller's, so policy prompts
/// and qrexec diagnostics reach the terminal directly.
#[derive(Debug, Clone)]
pub struct QrexecClient {
    program: String,
}

impl QrexecClient {
    /// A client invoking the standard `qrexec-client-vm` from `PATH`.
    pub fn new() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
        }
    }

    /// Override the client program (test harnesses, alternate installs).
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for QrexecClient {
    fn default() -> Self {
        Self::new()
    }
}

impl RpcChannel for QrexecClient {
    fn call(&self, destination: &str, service: &str, arg: &str, input: &[u8]) -> Result<Vec<u8>> {
        let token = service_token(service, arg);
        debug!(%destination, %token, "invoking qrexec service");

        let mut child = Command::new(&self.program)
            .arg(destination)
            .arg(&token)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|source| TransportError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            // A refused call can close the pipe before the payload is fully
            // written; the exit status is the authoritative signal then.
            if let Err(err) = stdin.write_all(input) {
                if err.kind() != std::io::ErrorKind::BrokenPipe {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(TransportError::Io(err));
                }
            }
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            return Err(TransportError::CallFailed {
                service: token,
                status: output.status.to_string(),
            });
        }
        debug!(bytes = output.stdout.len(), "qrexec reply received");
        Ok(output.stdout)
    }
}
