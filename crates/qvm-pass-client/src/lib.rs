//! RPC dispatcher for the split password-store client.
//!
//! [`PassClient`] turns password-store commands into envelope exchanges with
//! the vault qube: read-only commands go to `qubes.PasswordStoreRead`,
//! mutating ones to `qubes.PasswordStoreWrite`, always with the command name
//! as the qrexec service argument.

pub mod client;
pub mod error;

pub use client::{PassClient, READ_SERVICE, WRITE_SERVICE};
pub use error::{ClientError, Result};
