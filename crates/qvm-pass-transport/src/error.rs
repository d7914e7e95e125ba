/// Errors that can occur while invoking a qrexec service.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The qrexec client utility could not be started.
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    /// An I/O error occurred while exchanging data with the qrexec client.
    #[error("qrexec I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The qrexec client exited non-zero: policy denial, unreachable
    /// destination, or a remote failure before any reply was produced.
    #[error("qrexec call to {service} failed ({status})")]
    CallFailed { service: String, status: String },
}

pub type Result<T> = std::result::Result<T, TransportError>;
