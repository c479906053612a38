use serde::Deserialize;

/// Toggles for plugins bundled with the host
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PluginsConfig {
    /// Register the built-in `system` tools
    #[serde(default = "enabled")]
    pub system: bool,
}

impl Default for PluginsConfig {
    fn default() -> Self {
        Self { system: enabled() }
    }
}

const fn enabled() -> bool {
    true
}
