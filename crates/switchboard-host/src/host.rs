use std::sync::Arc;

use indexmap::IndexMap;
use serde_json::{Map, Value};
use switchboard_catalog::{CatalogEntry, LlmRegistration, ModelCatalog, Theme, ThemeCatalog};
use switchboard_config::Config;
use switchboard_core::{Message, ToolSchema};
use switchboard_llm::{DynLlmAdapter, LlmError, ModelConfiguration, ResponseRequest, ResponseStream, RetryPolicy};
use switchboard_tools::{
    ClientTool, ClientToolContext, ClientToolRegistry, ContextTool, ContextToolContext, ContextToolRegistry,
    ServerTool, ServerToolContext, ServerToolRegistry, ToolError, ToolSummary,
};

use crate::error::HostError;
use crate::plugin::{Plugin, PluginRegistrar};
use crate::system::SystemPlugin;

/// Collects plugins and registrations before the host is frozen
#[derive(Debug, Default)]
pub struct HostBuilder {
    registrar: PluginRegistrar,
    retry_policy: Option<RetryPolicy>,
}

impl HostBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder seeded from configuration
    ///
    /// Registers the configured themes, applies the retry settings to every
    /// instantiated model and installs the built-in system plugin unless it
    /// is disabled.
    pub fn from_config(config: &Config) -> Result<Self, HostError> {
        let retry = &config.llm.retry;
        let mut builder = Self::new().with_retry_policy(RetryPolicy::new(retry.max_retries, retry.base_delay()));

        for theme in &config.themes {
            builder.registrar.register_theme(Theme {
                id: theme.id.clone(),
                name: theme.name.clone(),
                description: theme.description.clone(),
                image_preview: theme.image_preview.clone(),
                theme: theme.style.clone(),
            });
        }

        if config.plugins.system {
            builder = builder.plugin(&SystemPlugin)?;
        } else {
            tracing::debug!("system plugin disabled by configuration");
        }

        Ok(builder)
    }

    /// Override the retry policy of every model the host instantiates
    #[must_use]
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = Some(policy);
        self
    }

    /// Run a plugin's registration hook
    pub fn plugin(mut self, plugin: &dyn Plugin) -> Result<Self, HostError> {
        plugin
            .register(&mut self.registrar)
            .map_err(|source| HostError::Plugin {
                plugin: plugin.name().to_owned(),
                source,
            })?;

        tracing::debug!(plugin = plugin.name(), "registered plugin");
        Ok(self)
    }

    /// Direct access to the registries for one-off registrations
    pub const fn registrar(&mut self) -> &mut PluginRegistrar {
        &mut self.registrar
    }

    /// Freeze the registries
    pub fn build(self) -> Host {
        let PluginRegistrar {
            server_tools,
            context_tools,
            client_tools,
            themes,
            models,
        } = self.registrar;

        tracing::info!(
            server_tools = server_tools.len(),
            context_tools = context_tools.len(),
            client_tools = client_tools.len(),
            themes = themes.len(),
            models = models.len(),
            "host ready"
        );

        Host {
            inner: Arc::new(Registries {
                server_tools,
                context_tools,
                client_tools,
                themes,
                models,
                retry_policy: self.retry_policy,
            }),
        }
    }
}

#[derive(Debug)]
struct Registries {
    server_tools: ServerToolRegistry,
    context_tools: ContextToolRegistry,
    client_tools: ClientToolRegistry,
    themes: ThemeCatalog,
    models: ModelCatalog,
    retry_policy: Option<RetryPolicy>,
}

/// Frozen, shareable view of every registry
#[derive(Debug, Clone)]
pub struct Host {
    inner: Arc<Registries>,
}

impl Host {
    pub fn builder() -> HostBuilder {
        HostBuilder::new()
    }

    pub fn server_tool_list(&self) -> Vec<ToolSummary> {
        self.inner.server_tools.list()
    }

    pub fn context_tool_list(&self) -> Vec<ToolSummary> {
        self.inner.context_tools.list()
    }

    pub fn client_tool_list(&self) -> Vec<ToolSummary> {
        self.inner.client_tools.list()
    }

    pub fn server_tools(&self) -> &ServerToolRegistry {
        &self.inner.server_tools
    }

    pub fn context_tools(&self) -> &ContextToolRegistry {
        &self.inner.context_tools
    }

    pub fn client_tools(&self) -> &ClientToolRegistry {
        &self.inner.client_tools
    }

    pub fn server_tool(&self, name: &str) -> Option<&ServerTool> {
        self.inner.server_tools.get(name)
    }

    pub fn context_tool(&self, name: &str) -> Option<&ContextTool> {
        self.inner.context_tools.get(name)
    }

    pub fn client_tool(&self, name: &str) -> Option<&ClientTool> {
        self.inner.client_tools.get(name)
    }

    /// Invoke a server tool; the tool's result or error is returned unchanged
    pub async fn call_server_tool(
        &self,
        name: &str,
        context: &ServerToolContext,
        args: Map<String, Value>,
    ) -> Result<Value, ToolError> {
        self.inner.server_tools.call(name, context, args).await
    }

    /// Invoke a context tool; the tool's result or error is returned unchanged
    pub async fn call_context_tool(
        &self,
        name: &str,
        context: &ContextToolContext,
        args: Map<String, Value>,
    ) -> Result<Value, ToolError> {
        self.inner.context_tools.call(name, context, args).await
    }

    /// Invoke a client tool; the tool's result or error is returned unchanged
    pub async fn call_client_tool(
        &self,
        name: &str,
        context: &ClientToolContext,
        args: Map<String, Value>,
    ) -> Result<Value, ToolError> {
        self.inner.client_tools.call(name, context, args).await
    }

    pub fn theme_list(&self) -> Vec<CatalogEntry> {
        self.inner.themes.list()
    }

    pub fn theme(&self, id: &str) -> Option<&Theme> {
        self.inner.themes.get(id)
    }

    /// Style mapping of a theme
    pub fn theme_style(&self, id: &str) -> Result<&IndexMap<String, String>, HostError> {
        Ok(self.inner.themes.style(id)?)
    }

    pub fn llm_list(&self) -> Vec<CatalogEntry> {
        self.inner.models.list()
    }

    pub fn llm(&self, id: &str) -> Option<&LlmRegistration> {
        self.inner.models.get(id)
    }

    /// Build an adapter for a registered model
    ///
    /// The host's retry policy, when configured, replaces the adapter's own.
    pub fn instantiate_llm(
        &self,
        id: &str,
        configuration: Option<ModelConfiguration>,
    ) -> Result<LlmInstance, HostError> {
        let adapter = self.inner.models.instantiate(id, configuration)?;

        Ok(LlmInstance {
            adapter,
            retry_policy: self.inner.retry_policy,
        })
    }
}

/// An instantiated model adapter bound to the host's retry settings
pub struct LlmInstance {
    adapter: Box<dyn DynLlmAdapter>,
    retry_policy: Option<RetryPolicy>,
}

impl LlmInstance {
    pub fn model_id(&self) -> &str {
        self.adapter.model_id()
    }

    pub fn adapter(&self) -> &dyn DynLlmAdapter {
        self.adapter.as_ref()
    }

    /// Messages in the provider's format
    pub fn map_messages(&self, messages: &[Message]) -> Result<Vec<Value>, LlmError> {
        self.adapter.map_messages(messages)
    }

    /// Tool declarations in the provider's format
    pub fn map_tools(&self, tools: &[ToolSchema]) -> Result<Vec<Value>, LlmError> {
        self.adapter.map_tools(tools)
    }

    /// Stream a response with retry
    pub fn generate_response<'a>(&'a self, request: &'a ResponseRequest) -> ResponseStream<'a> {
        match self.retry_policy {
            Some(policy) => self.adapter.generate_response_with(request, policy),
            None => self.adapter.generate_response(request),
        }
    }
}

impl std::fmt::Debug for LlmInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LlmInstance")
            .field("model_id", &self.adapter.model_id())
            .field("retry_policy", &self.retry_policy)
            .finish()
    }
}
