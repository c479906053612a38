use thiserror::Error;

/// Errors raised while validating or decoding shared schema values
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// An assistant message carries two tool calls with the same id
    #[error("duplicate tool call id in assistant message: {id}")]
    DuplicateToolCallId { id: String },

    /// Serialized tool-call arguments are not a JSON object
    #[error("malformed arguments for tool {tool}: {reason}")]
    MalformedArguments { tool: String, reason: String },
}
