//! Split password-store client for Qubes OS.
//!
//! qvm-pass proxies `pass` commands from a client qube to a vault qube over
//! qrexec. The binary in this crate is the user-facing tool; the library
//! surface re-exports the building blocks for tests and embedders.
//!
//! # Crate Structure
//!
//! - [`envelope`] — JSON request/reply wire envelopes
//! - [`transport`] — qrexec subprocess channel
//! - [`client`] — read/write dispatch to the vault services

/// Re-export envelope types.
pub mod envelope {
    pub use qvm_pass_envelope::*;
}

/// Re-export transport types.
pub mod transport {
    pub use qvm_pass_transport::*;
}

/// Re-export client types.
pub mod client {
    pub use qvm_pass_client::*;
}
