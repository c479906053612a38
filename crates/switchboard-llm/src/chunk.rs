//! Incremental response units and their assembly

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use switchboard_core::{Message, ToolCall};

use crate::error::LlmError;

/// One incremental unit of a streamed response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Chunk {
    /// Text fragment
    Text(String),
    /// Fragment of a tool invocation request
    ToolCall(ToolCallDelta),
}

impl Chunk {
    /// Text fragment chunk
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Chunk carrying a complete tool call at `index`
    pub fn tool_call(index: u32, call: ToolCall) -> Self {
        Self::ToolCall(ToolCallDelta {
            index,
            id: Some(call.id),
            name: Some(call.function.name),
            arguments: Some(call.function.arguments),
        })
    }
}

/// Partial tool call data
///
/// `id` and `name` usually arrive on the first delta for an index; argument
/// fragments are concatenated in arrival order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCallDelta {
    /// Position of the call within the assistant turn
    pub index: u32,
    /// Tool call ID (first delta only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Function name (first delta only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Serialized arguments fragment
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<String>,
}

#[derive(Debug, Default)]
struct PartialCall {
    id: Option<String>,
    name: Option<String>,
    arguments: String,
}

/// Folds tool-call deltas into complete tool calls
#[derive(Debug, Default)]
pub struct ToolCallAccumulator {
    calls: BTreeMap<u32, PartialCall>,
}

impl ToolCallAccumulator {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one delta
    pub fn push(&mut self, delta: ToolCallDelta) {
        let call = self.calls.entry(delta.index).or_default();

        if let Some(id) = delta.id {
            call.id = Some(id);
        }
        if let Some(name) = delta.name {
            call.name = Some(name);
        }
        if let Some(arguments) = delta.arguments {
            call.arguments.push_str(&arguments);
        }
    }

    /// Whether no deltas have been merged
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Complete tool calls in index order
    pub fn finish(self) -> Result<Vec<ToolCall>, LlmError> {
        self.calls
            .into_iter()
            .map(|(index, call)| match (call.id, call.name) {
                (Some(id), Some(name)) => Ok(ToolCall::function(id, name, call.arguments)),
                _ => Err(LlmError::Streaming(format!("incomplete tool call at index {index}"))),
            })
            .collect()
    }
}

/// A fully consumed response
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completion {
    /// Concatenated text fragments
    pub text: String,
    /// Tool calls requested by the model
    pub tool_calls: Vec<ToolCall>,
}

impl Completion {
    /// Assistant message equivalent of the response
    pub fn into_message(self) -> Message {
        Message::Assistant {
            content: self.text,
            tool_calls: self.tool_calls,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merges_fragments_by_index() {
        let mut acc = ToolCallAccumulator::new();
        acc.push(ToolCallDelta {
            index: 1,
            id: Some("call_b".into()),
            name: Some("second".into()),
            arguments: Some("{}".into()),
        });
        acc.push(ToolCallDelta {
            index: 0,
            id: Some("call_a".into()),
            name: Some("first".into()),
            arguments: Some("{\"q\":".into()),
        });
        acc.push(ToolCallDelta {
            index: 0,
            arguments: Some("\"rust\"}".into()),
            ..ToolCallDelta::default()
        });

        let calls = acc.finish().unwrap();
        assert_eq!(
            calls,
            vec![
                ToolCall::function("call_a", "first", "{\"q\":\"rust\"}"),
                ToolCall::function("call_b", "second", "{}"),
            ]
        );
    }

    #[test]
    fn nameless_call_is_incomplete() {
        let mut acc = ToolCallAccumulator::new();
        acc.push(ToolCallDelta {
            index: 0,
            id: Some("call_a".into()),
            ..ToolCallDelta::default()
        });

        assert!(matches!(acc.finish(), Err(LlmError::Streaming(_))));
    }

    #[test]
    fn complete_chunk_round_trips_through_accumulator() {
        let call = ToolCall::function("call_1", "lookup", "{\"id\":7}");
        let Chunk::ToolCall(delta) = Chunk::tool_call(0, call.clone()) else {
            panic!("expected tool call chunk");
        };

        let mut acc = ToolCallAccumulator::new();
        acc.push(delta);
        assert_eq!(acc.finish().unwrap(), vec![call]);
    }
}
