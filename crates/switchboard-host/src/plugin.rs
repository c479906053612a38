use switchboard_catalog::{LlmRegistration, ModelCatalog, Theme, ThemeCatalog};
use switchboard_tools::{
    ClientTool, ClientToolRegistry, ContextTool, ContextToolRegistry, ServerTool, ServerToolRegistry,
};

/// A bundle of tools, themes and models registered at startup
pub trait Plugin: Send + Sync {
    /// Name used in logs and errors
    fn name(&self) -> &str;

    /// Contribute registrations
    fn register(&self, registrar: &mut PluginRegistrar) -> anyhow::Result<()>;
}

/// Mutable registries open during startup
///
/// Registering a name that already exists in the same registry replaces the
/// earlier entry.
#[derive(Debug, Default)]
pub struct PluginRegistrar {
    pub(crate) server_tools: ServerToolRegistry,
    pub(crate) context_tools: ContextToolRegistry,
    pub(crate) client_tools: ClientToolRegistry,
    pub(crate) themes: ThemeCatalog,
    pub(crate) models: ModelCatalog,
}

impl PluginRegistrar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool to the server namespace
    pub fn register_server_tool(&mut self, tool: ServerTool) -> &mut Self {
        self.server_tools.register(tool);
        self
    }

    /// Add a tool to the context namespace
    pub fn register_context_tool(&mut self, tool: ContextTool) -> &mut Self {
        self.context_tools.register(tool);
        self
    }

    /// Add a tool to the client namespace
    pub fn register_client_tool(&mut self, tool: ClientTool) -> &mut Self {
        self.client_tools.register(tool);
        self
    }

    pub fn register_theme(&mut self, theme: Theme) -> &mut Self {
        self.themes.register(theme);
        self
    }

    pub fn register_llm(&mut self, registration: LlmRegistration) -> &mut Self {
        self.models.register(registration);
        self
    }
}
