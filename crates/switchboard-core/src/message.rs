use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::SchemaError;
use crate::schema::value_kind;

/// Role of a message participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// End user
    User,
    /// Model response
    Assistant,
    /// System instruction
    System,
    /// Tool/function result
    Tool,
}

impl Role {
    /// Lowercase wire name of the role
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::System => "system",
            Self::Tool => "tool",
        }
    }
}

/// Message in a conversation thread
///
/// Discriminated by `role` on the wire. A tool message always names the call
/// it answers; an assistant message may carry any number of tool calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Message {
    /// User message
    User {
        /// Message text
        content: String,
        /// Optional participant name
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    /// Assistant response, possibly requesting tool calls
    Assistant {
        /// Message text (may be empty when only tools are called)
        #[serde(default)]
        content: String,
        /// Tool calls requested in this turn
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tool_calls: Vec<ToolCall>,
    },
    /// System instruction
    System {
        /// Instruction text
        content: String,
    },
    /// Result of a tool call
    Tool {
        /// Tool output
        content: String,
        /// ID of the tool call this message answers
        tool_call_id: String,
    },
}

impl Message {
    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::User {
            content: content.into(),
            name: None,
        }
    }

    /// Create an assistant text message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::Assistant {
            content: content.into(),
            tool_calls: Vec::new(),
        }
    }

    /// Create an assistant message requesting tool calls
    pub fn assistant_tool_calls(tool_calls: Vec<ToolCall>) -> Self {
        Self::Assistant {
            content: String::new(),
            tool_calls,
        }
    }

    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::System {
            content: content.into(),
        }
    }

    /// Create a tool result message
    pub fn tool(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::Tool {
            content: content.into(),
            tool_call_id: tool_call_id.into(),
        }
    }

    /// Role of the message author
    pub const fn role(&self) -> Role {
        match self {
            Self::User { .. } => Role::User,
            Self::Assistant { .. } => Role::Assistant,
            Self::System { .. } => Role::System,
            Self::Tool { .. } => Role::Tool,
        }
    }

    /// Text content regardless of role
    pub fn content(&self) -> &str {
        match self {
            Self::User { content, .. }
            | Self::Assistant { content, .. }
            | Self::System { content }
            | Self::Tool { content, .. } => content,
        }
    }

    /// Tool calls carried by an assistant message (empty for other roles)
    pub fn tool_calls(&self) -> &[ToolCall] {
        match self {
            Self::Assistant { tool_calls, .. } => tool_calls,
            _ => &[],
        }
    }

    /// Check that tool-call ids are unique within this message
    pub fn validate(&self) -> Result<(), SchemaError> {
        let mut seen = HashSet::new();

        for call in self.tool_calls() {
            if !seen.insert(call.id.as_str()) {
                return Err(SchemaError::DuplicateToolCallId { id: call.id.clone() });
            }
        }

        Ok(())
    }
}

/// Kind of a tool call (only functions exist today)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallType {
    /// Function call
    #[default]
    Function,
}

/// A tool invocation requested by the assistant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Identifier unique within the requesting message
    pub id: String,
    /// Always `function`
    #[serde(rename = "type", default)]
    pub call_type: CallType,
    /// Function name and serialized arguments
    pub function: FunctionCall,
}

/// Function name and arguments within a tool call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Tool name
    pub name: String,
    /// JSON-encoded arguments, kept verbatim
    pub arguments: String,
}

impl ToolCall {
    /// Build a function tool call from raw parts
    pub fn function(id: impl Into<String>, name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            call_type: CallType::Function,
            function: FunctionCall {
                name: name.into(),
                arguments: arguments.into(),
            },
        }
    }

    /// Decode the serialized arguments into a keyword map
    ///
    /// An empty or whitespace-only payload decodes to an empty map, since
    /// some providers send nothing for zero-argument calls.
    pub fn decode_arguments(&self) -> Result<Map<String, Value>, SchemaError> {
        let raw = self.function.arguments.trim();
        if raw.is_empty() {
            return Ok(Map::new());
        }

        let malformed = |reason: String| SchemaError::MalformedArguments {
            tool: self.function.name.clone(),
            reason,
        };

        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(malformed(format!("expected a JSON object, got {}", value_kind(&other)))),
            Err(e) => Err(malformed(e.to_string())),
        }
    }
}
