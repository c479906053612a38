use std::fmt;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use serde::Serialize;
use serde_json::Value;
use switchboard_core::{ToolParameter, ToolSchema};

use crate::arguments::PositionalArgs;

/// Callable behind a tool
///
/// Receives the namespace context as its receiver and the arguments in
/// declared parameter order.
pub trait ToolHandler<C>: Send + Sync {
    /// Run the tool
    fn call<'a>(&'a self, context: &'a C, args: PositionalArgs) -> BoxFuture<'a, anyhow::Result<Value>>;
}

impl<C, F> ToolHandler<C> for F
where
    F: for<'a> Fn(&'a C, PositionalArgs) -> BoxFuture<'a, anyhow::Result<Value>> + Send + Sync,
{
    fn call<'a>(&'a self, context: &'a C, args: PositionalArgs) -> BoxFuture<'a, anyhow::Result<Value>> {
        self(context, args)
    }
}

/// A named, schema-described tool
pub struct ToolDefinition<C> {
    /// Unique name within the namespace
    pub name: String,
    /// Grouping used for listing order (`system` sorts first)
    pub category: Option<String>,
    /// What the tool does, shown to the model
    pub description: String,
    /// Parameters in positional order
    pub parameters: Vec<ToolParameter>,
    handler: Arc<dyn ToolHandler<C>>,
}

impl<C> ToolDefinition<C> {
    /// Define a tool backed by a closure
    ///
    /// ```ignore
    /// ToolDefinition::new("echo", "Echo the input", |_ctx, args| {
    ///     Box::pin(async move { args.required::<serde_json::Value>(0) })
    /// })
    /// ```
    pub fn new<F>(name: impl Into<String>, description: impl Into<String>, handler: F) -> Self
    where
        F: for<'a> Fn(&'a C, PositionalArgs) -> BoxFuture<'a, anyhow::Result<Value>> + Send + Sync + 'static,
    {
        Self::from_handler(name, description, Arc::new(handler))
    }

    /// Define a tool backed by a shared handler
    pub fn from_handler(
        name: impl Into<String>,
        description: impl Into<String>,
        handler: Arc<dyn ToolHandler<C>>,
    ) -> Self {
        Self {
            name: name.into(),
            category: None,
            description: description.into(),
            parameters: Vec::new(),
            handler,
        }
    }

    /// Set the category
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Append a parameter
    #[must_use]
    pub fn with_parameter(mut self, parameter: ToolParameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    /// Append several parameters
    #[must_use]
    pub fn with_parameters(mut self, parameters: impl IntoIterator<Item = ToolParameter>) -> Self {
        self.parameters.extend(parameters);
        self
    }

    /// The callable behind the tool
    pub fn handler(&self) -> &Arc<dyn ToolHandler<C>> {
        &self.handler
    }

    /// Provider-facing declaration of the tool
    pub fn schema(&self) -> ToolSchema {
        ToolSchema::from_parameters(&self.name, &self.description, &self.parameters)
    }

    /// Listing entry for the tool
    pub fn summary(&self) -> ToolSummary {
        ToolSummary {
            id: self.name.clone(),
            category: self.category.clone(),
            description: self.description.clone(),
        }
    }
}

impl<C> Clone for ToolDefinition<C> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            category: self.category.clone(),
            description: self.description.clone(),
            parameters: self.parameters.clone(),
            handler: Arc::clone(&self.handler),
        }
    }
}

impl<C> fmt::Debug for ToolDefinition<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDefinition")
            .field("name", &self.name)
            .field("category", &self.category)
            .field("description", &self.description)
            .field("parameters", &self.parameters)
            .finish_non_exhaustive()
    }
}

/// Entry returned when listing a namespace
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolSummary {
    /// Tool name
    pub id: String,
    /// Tool category
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Tool description
    pub description: String,
}

impl ToolSummary {
    /// Listing rank of the category: `system` first, other categories next,
    /// uncategorized last
    pub fn category_rank(&self) -> u8 {
        match self.category.as_deref() {
            Some("system") => 0,
            Some(_) => 1,
            None => 2,
        }
    }
}
