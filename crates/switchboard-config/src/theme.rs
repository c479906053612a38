use indexmap::IndexMap;
use serde::Deserialize;

/// Theme declared in the config file
///
/// ```toml
/// [[themes]]
/// id = "dusk"
/// name = "Dusk"
/// style = { background = "bg-slate-900", text = "text-slate-100" }
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ThemeConfig {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_preview: Option<String>,
    /// Style token to class name mapping
    #[serde(default)]
    pub style: IndexMap<String, String>,
}
