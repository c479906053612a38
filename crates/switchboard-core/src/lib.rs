#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

//! Shared value types for Switchboard
//!
//! Conversation messages, tool-call references, the tool parameter schema and
//! the identities carried by every tool context. No behavior beyond
//! validation and conversion lives here; every other crate consumes these.

pub mod error;
pub mod identity;
pub mod message;
pub mod schema;

pub use error::SchemaError;
pub use identity::{AgentIdentity, UserIdentity};
pub use message::{CallType, FunctionCall, Message, Role, ToolCall};
pub use schema::{FunctionSchema, ParameterType, ParametersSchema, PropertySchema, ToolParameter, ToolSchema};
