//! Inter-qube transport for the split password-store client.
//!
//! One RPC is one subprocess exchange with the qrexec client utility:
//! request bytes in on the remote service's stdin, reply bytes back out on
//! its stdout. The [`RpcChannel`] trait is the seam; everything above it is
//! transport-agnostic.

pub mod error;
pub mod qrexec;
pub mod traits;

pub use error::{Result, TransportError};
pub use qrexec::{service_token, QrexecClient};
pub use traits::RpcChannel;
