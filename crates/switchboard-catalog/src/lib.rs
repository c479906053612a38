//! Model and theme catalogs for Switchboard
//!
//! Both catalogs keep registration order so listings are stable across runs.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod error;
pub mod model;
pub mod theme;

pub use error::CatalogError;
pub use model::{CatalogEntry, LlmDefinition, LlmRegistration, ModelCatalog};
pub use theme::{Theme, ThemeCatalog};
