//! Configuration for Switchboard
//!
//! Loaded from a TOML file whose string values may reference environment
//! variables as `{{ env.NAME }}` or `{{ env.NAME | default("value") }}`.

#![allow(clippy::must_use_candidate)]

mod env;
pub mod llm;
mod loader;
pub mod plugins;
pub mod telemetry;
pub mod theme;

use serde::Deserialize;

pub use env::{ExpandError, expand_env};
pub use llm::{LlmConfig, RetryConfig};
pub use plugins::PluginsConfig;
pub use telemetry::{LogFormat, TelemetryConfig};
pub use theme::ThemeConfig;

/// Top-level Switchboard configuration
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Model adapter settings
    #[serde(default)]
    pub llm: LlmConfig,
    /// Logging setup
    #[serde(default)]
    pub telemetry: TelemetryConfig,
    /// Themes registered at startup
    #[serde(default)]
    pub themes: Vec<ThemeConfig>,
    /// Built-in plugin toggles
    #[serde(default)]
    pub plugins: PluginsConfig,
}
