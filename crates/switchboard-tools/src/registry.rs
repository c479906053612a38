use std::collections::HashMap;

use serde_json::{Map, Value};
use switchboard_core::{ToolCall, ToolSchema};

use crate::arguments::reorder_arguments;
use crate::context::ToolContext;
use crate::definition::{ToolDefinition, ToolSummary};
use crate::error::ToolError;

/// In-memory mapping from tool name to definition for one namespace
///
/// Populated at startup, then shared read-only. Registering a name twice
/// replaces the earlier definition.
pub struct ToolRegistry<C> {
    tools: HashMap<String, ToolDefinition<C>>,
}

impl<C> Default for ToolRegistry<C> {
    fn default() -> Self {
        Self { tools: HashMap::new() }
    }
}

impl<C> std::fmt::Debug for ToolRegistry<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<C: ToolContext> ToolRegistry<C> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a tool under its name, replacing any previous definition
    pub fn register(&mut self, tool: ToolDefinition<C>) {
        let name = tool.name.clone();

        if self.tools.insert(name.clone(), tool).is_some() {
            tracing::debug!(namespace = %C::NAMESPACE, tool = %name, "replaced registered tool");
        } else {
            tracing::debug!(namespace = %C::NAMESPACE, tool = %name, "registered tool");
        }
    }

    /// Summaries of every tool, `system` category first, then other
    /// categories, then uncategorized, alphabetical within each group
    pub fn list(&self) -> Vec<ToolSummary> {
        let mut summaries: Vec<ToolSummary> = self.tools.values().map(ToolDefinition::summary).collect();
        summaries.sort_by(|a, b| {
            a.category_rank()
                .cmp(&b.category_rank())
                .then_with(|| a.id.cmp(&b.id))
        });
        summaries
    }

    /// Look up a tool by name
    pub fn get(&self, name: &str) -> Option<&ToolDefinition<C>> {
        self.tools.get(name)
    }

    /// Raw name-to-definition map
    pub const fn tools(&self) -> &HashMap<String, ToolDefinition<C>> {
        &self.tools
    }

    /// Provider-facing declarations, in listing order
    pub fn schemas(&self) -> Vec<ToolSchema> {
        self.list()
            .iter()
            .filter_map(|summary| self.tools.get(&summary.id))
            .map(ToolDefinition::schema)
            .collect()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Whether no tools are registered
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Invoke a tool with keyword arguments
    ///
    /// Arguments are reordered into the tool's declared parameter order before
    /// the call. The tool's result or error is returned unchanged.
    pub async fn call(&self, name: &str, context: &C, args: Map<String, Value>) -> Result<Value, ToolError> {
        let tool = self.tools.get(name).ok_or_else(|| {
            tracing::debug!(namespace = %C::NAMESPACE, tool = name, "tool not found");
            ToolError::NotFound { tool: name.to_owned() }
        })?;

        let positional = reorder_arguments(&tool.name, &tool.parameters, args).inspect_err(|e| {
            tracing::debug!(namespace = %C::NAMESPACE, tool = name, error = %e, "rejected tool arguments");
        })?;

        tracing::debug!(
            namespace = %C::NAMESPACE,
            tool = name,
            user = %context.user().id,
            agent = %context.agent().id,
            "calling tool"
        );

        tool.handler().call(context, positional).await.map_err(ToolError::Execution)
    }

    /// Decode a model-issued tool call and invoke it
    pub async fn dispatch(&self, call: &ToolCall, context: &C) -> Result<Value, ToolError> {
        if !self.tools.contains_key(&call.function.name) {
            return Err(ToolError::NotFound {
                tool: call.function.name.clone(),
            });
        }

        let args = call.decode_arguments()?;
        self.call(&call.function.name, context, args).await
    }
}
