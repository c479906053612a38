use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use switchboard_llm::{AdapterFactory, DynLlmAdapter, ModelConfiguration};

use crate::error::CatalogError;

/// Static description of a selectable model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmDefinition {
    /// Unique model id
    pub id: String,
    /// Display name
    pub name: String,
    /// Provider that serves the model
    pub provider: String,
    /// Short description shown in pickers
    pub description: String,
    /// Largest output the model will produce
    pub maximum_output_tokens: u32,
    /// Highest accepted sampling temperature
    pub maximum_temperature: f64,
}

/// A model definition paired with the factory that builds its adapter
#[derive(Clone)]
pub struct LlmRegistration {
    pub definition: LlmDefinition,
    pub factory: AdapterFactory,
}

impl LlmRegistration {
    pub fn new(definition: LlmDefinition, factory: AdapterFactory) -> Self {
        Self { definition, factory }
    }
}

impl fmt::Debug for LlmRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmRegistration")
            .field("definition", &self.definition)
            .finish_non_exhaustive()
    }
}

/// Listing entry for a catalog item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub id: String,
    pub description: String,
}

/// Registered models, in registration order
#[derive(Debug, Default, Clone)]
pub struct ModelCatalog {
    models: IndexMap<String, LlmRegistration>,
}

impl ModelCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a model under its definition id
    ///
    /// Re-registering an id replaces the earlier entry but keeps its position.
    pub fn register(&mut self, registration: LlmRegistration) {
        let id = registration.definition.id.clone();

        if self.models.insert(id.clone(), registration).is_some() {
            tracing::debug!(model = %id, "replaced registered model");
        } else {
            tracing::debug!(model = %id, "registered model");
        }
    }

    /// Id and description of every model
    pub fn list(&self) -> Vec<CatalogEntry> {
        self.models
            .values()
            .map(|registration| CatalogEntry {
                id: registration.definition.id.clone(),
                description: registration.definition.description.clone(),
            })
            .collect()
    }

    /// Look up a registration by model id
    pub fn get(&self, id: &str) -> Option<&LlmRegistration> {
        self.models.get(id)
    }

    /// Full definitions of every model
    pub fn definitions(&self) -> impl Iterator<Item = &LlmDefinition> {
        self.models.values().map(|registration| &registration.definition)
    }

    /// Build an adapter for a registered model
    pub fn instantiate(
        &self,
        id: &str,
        configuration: Option<ModelConfiguration>,
    ) -> Result<Box<dyn DynLlmAdapter>, CatalogError> {
        let registration = self
            .models
            .get(id)
            .ok_or_else(|| CatalogError::ModelNotFound { id: id.to_owned() })?;

        (registration.factory)(id.to_owned(), configuration).map_err(|source| CatalogError::Instantiate {
            id: id.to_owned(),
            source,
        })
    }

    /// Number of registered models
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Whether no models are registered
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
