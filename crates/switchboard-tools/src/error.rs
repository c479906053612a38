use switchboard_core::SchemaError;
use thiserror::Error;

/// Errors raised by tool dispatch
///
/// Dispatch errors signal a mismatch between the caller and the tool schema
/// and are never retried.
#[derive(Debug, Error)]
pub enum ToolError {
    /// No tool with this name is registered in the namespace
    #[error("tool not found: {tool}")]
    NotFound { tool: String },

    /// A required parameter was absent from the arguments
    #[error("missing argument for parameter \"{parameter}\" of tool {tool}")]
    MissingArgument { tool: String, parameter: String },

    /// An argument does not match its declared type or allowed values
    #[error("invalid argument for parameter \"{parameter}\" of tool {tool}: {reason}")]
    InvalidArgument {
        tool: String,
        parameter: String,
        reason: String,
    },

    /// Serialized arguments could not be decoded into a keyword map
    #[error("malformed arguments for tool {tool}: {reason}")]
    MalformedArguments { tool: String, reason: String },

    /// The tool itself failed; the error is passed through unchanged
    #[error(transparent)]
    Execution(anyhow::Error),
}

impl ToolError {
    /// Whether the error stems from the call not matching the tool schema
    pub const fn is_caller_error(&self) -> bool {
        !matches!(self, Self::Execution(_))
    }
}

impl From<SchemaError> for ToolError {
    fn from(err: SchemaError) -> Self {
        match err {
            SchemaError::MalformedArguments { tool, reason } => Self::MalformedArguments { tool, reason },
            other => Self::Execution(other.into()),
        }
    }
}
