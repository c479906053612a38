//! Composition root for Switchboard
//!
//! Plugins contribute tools, themes and models through a [`PluginRegistrar`]
//! while the [`HostBuilder`] is open. [`HostBuilder::build`] freezes every
//! registry behind an `Arc`; the resulting [`Host`] is cheap to clone and
//! answers listing, lookup and dispatch queries without locking.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

mod error;
mod host;
mod plugin;
pub mod system;

pub use error::HostError;
pub use host::{Host, HostBuilder, LlmInstance};
pub use plugin::{Plugin, PluginRegistrar};
pub use system::SystemPlugin;
