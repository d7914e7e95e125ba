use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::{EnvelopeError, Result};

/// A password-store request as it travels to the vault.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RequestEnvelope {
    /// Remote argv: the command name followed by its arguments.
    pub a: Vec<String>,
    /// Base64 stdin payload; the key is absent when no stdin is supplied.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub i: Option<String>,
}

/// The raw reply object as produced by the vault service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReplyEnvelope {
    /// Remote argv as executed: the remote program name, then the echo of
    /// the request argv.
    pub a: Vec<String>,
    /// Remote exit code.
    pub r: i32,
    /// Base64 stdout.
    pub o: String,
    /// Base64 stderr.
    pub e: String,
}

/// One validated, decoded remote invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedInvocation {
    /// The full remote argv, program name included.
    pub args: Vec<String>,
    /// Remote exit code, forwarded verbatim by callers.
    pub exit_code: i32,
    /// Decoded stdout bytes.
    pub stdout: Vec<u8>,
    /// Decoded stderr bytes.
    pub stderr: Vec<u8>,
}

impl CompletedInvocation {
    /// Whether the remote command exited zero.
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

impl RequestEnvelope {
    /// Build a request for `command` with `args`, attaching stdin when given.
    pub fn new(command: &str, args: &[String], stdin: Option<&[u8]>) -> Self {
        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push(command.to_string());
        argv.extend(args.iter().cloned());
        Self {
            a: argv,
            i: stdin.map(|bytes| STANDARD.encode(bytes)),
        }
    }

    /// The qrexec service argument: the command name.
    pub fn selector(&self) -> &str {
        self.a.first().map(String::as_str).unwrap_or_default()
    }

    /// Serialize to the compact JSON wire form.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(EnvelopeError::Encode)
    }
}

impl ReplyEnvelope {
    /// Validate the argv echo against `sent` and decode the stream fields.
    ///
    /// The first element of the reply argv is the remote program's own name;
    /// everything after it must match what was sent, byte for byte.
    pub fn into_invocation(self, sent: &[String]) -> Result<CompletedInvocation> {
        if self.a.is_empty() || self.a[1..] != *sent {
            return Err(EnvelopeError::UnexpectedReply);
        }
        let stdout = STANDARD.decode(&self.o)?;
        let stderr = STANDARD.decode(&self.e)?;
        Ok(CompletedInvocation {
            args: self.a,
            exit_code: self.r,
            stdout,
            stderr,
        })
    }
}

/// Decode a raw reply and validate it against the argv that was sent.
pub fn decode_reply(raw: &[u8], sent: &[String]) -> Result<CompletedInvocation> {
    let reply: ReplyEnvelope = serde_json::from_slice(raw)?;
    reply.into_invocation(sent)
}
