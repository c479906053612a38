use thiserror::Error;

/// Catalog lookup failures
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No model registered under this id
    #[error("model not found: {id}")]
    ModelNotFound { id: String },

    /// No theme registered under this id
    #[error("theme not found: {id}")]
    ThemeNotFound { id: String },

    /// The model's factory failed to build an adapter
    #[error("failed to instantiate model {id}")]
    Instantiate {
        id: String,
        #[source]
        source: switchboard_llm::LlmError,
    },
}
