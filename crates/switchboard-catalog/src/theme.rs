use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::model::CatalogEntry;

/// Named visual style for the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Theme {
    /// Unique theme id
    pub id: String,
    /// Display name
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Preview image URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_preview: Option<String>,
    /// Style token to class name mapping
    #[serde(default)]
    pub theme: IndexMap<String, String>,
}

/// Registered themes, in registration order
#[derive(Debug, Default, Clone)]
pub struct ThemeCatalog {
    themes: IndexMap<String, Theme>,
}

impl ThemeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a theme under its id, replacing any earlier one
    pub fn register(&mut self, theme: Theme) {
        let id = theme.id.clone();

        if self.themes.insert(id.clone(), theme).is_some() {
            tracing::debug!(theme = %id, "replaced registered theme");
        } else {
            tracing::debug!(theme = %id, "registered theme");
        }
    }

    /// Id and description of every theme
    pub fn list(&self) -> Vec<CatalogEntry> {
        self.themes
            .values()
            .map(|theme| CatalogEntry {
                id: theme.id.clone(),
                description: theme.description.clone(),
            })
            .collect()
    }

    pub fn get(&self, id: &str) -> Option<&Theme> {
        self.themes.get(id)
    }

    /// Style mapping of a theme
    pub fn style(&self, id: &str) -> Result<&IndexMap<String, String>, CatalogError> {
        self.themes
            .get(id)
            .map(|theme| &theme.theme)
            .ok_or_else(|| CatalogError::ThemeNotFound { id: id.to_owned() })
    }

    pub fn len(&self) -> usize {
        self.themes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }
}
