//! JSON request/reply envelopes for the split password-store RPC.
//!
//! Every vault call is one request object and one reply object:
//! - request: `a` = command argv, optional `i` = base64 stdin
//! - reply: `a` = remote argv echo, `r` = exit code, `o`/`e` = base64 streams
//!
//! The reply's argv echo is validated against what was sent before any
//! stream content is trusted.

pub mod envelope;
pub mod error;

pub use envelope::{decode_reply, CompletedInvocation, ReplyEnvelope, RequestEnvelope};
pub use error::{EnvelopeError, Result};
