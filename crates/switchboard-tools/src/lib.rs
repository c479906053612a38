#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

//! Tool registries and dispatch
//!
//! One generic [`ToolRegistry`] instantiated per namespace. The server,
//! context and client namespaces share dispatch semantics but each binds its
//! own context type, so a tool registered in one namespace can never be
//! called with another namespace's capabilities.

pub mod arguments;
pub mod context;
pub mod definition;
pub mod error;
pub mod registry;

pub use arguments::PositionalArgs;
pub use context::{
    ClientSurface, ClientTask, ClientToolContext, ContextToolContext, ModalRequest, Namespace, PersistenceHandle,
    ServerToolContext, ToolContext,
};
pub use definition::{ToolDefinition, ToolHandler, ToolSummary};
pub use error::ToolError;
pub use registry::ToolRegistry;

/// Registry of tools that run on the server with persistence access
pub type ServerToolRegistry = ToolRegistry<ServerToolContext>;

/// Registry of tools that supply additional data or instructions to a conversation
pub type ContextToolRegistry = ToolRegistry<ContextToolContext>;

/// Registry of tools that run against the client UI surface
pub type ClientToolRegistry = ToolRegistry<ClientToolContext>;

/// Server tool definition
pub type ServerTool = ToolDefinition<ServerToolContext>;

/// Context/data tool definition
pub type ContextTool = ToolDefinition<ContextToolContext>;

/// Client tool definition
pub type ClientTool = ToolDefinition<ClientToolContext>;
