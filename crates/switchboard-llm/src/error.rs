use thiserror::Error;

/// Errors that can occur while driving a language model
///
/// The retry wrapper does not classify errors: every failure raised before
/// output starts is retried until the retry budget is spent.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Provider rejected or failed the request
    #[error("upstream error: {0}")]
    Upstream(String),

    /// Error while reading the response stream
    #[error("streaming error: {0}")]
    Streaming(String),

    /// Request could not be expressed in the provider's format
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Consumer stopped the response
    #[error("response cancelled")]
    Cancelled,
}
