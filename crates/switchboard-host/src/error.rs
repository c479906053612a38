use switchboard_catalog::CatalogError;
use thiserror::Error;

/// Failures while assembling or querying the host
#[derive(Debug, Error)]
pub enum HostError {
    /// A plugin's registration hook failed
    #[error("plugin {plugin} failed to register")]
    Plugin {
        plugin: String,
        #[source]
        source: anyhow::Error,
    },

    /// Catalog lookup or model instantiation failed
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
