/// Errors that can occur while encoding requests or decoding replies.
#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    /// The reply was not a well-formed envelope object.
    #[error("malformed reply: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A base64 stream field in the reply failed to decode.
    #[error("invalid base64 in reply stream: {0}")]
    Stream(#[from] base64::DecodeError),

    /// The reply echoed a different argv than was sent.
    ///
    /// The message is fixed wording; callers print it verbatim.
    #[error("Unexpected reply")]
    UnexpectedReply,

    /// The request could not be serialized.
    #[error("failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EnvelopeError>;
