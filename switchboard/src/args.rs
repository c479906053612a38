use std::path::PathBuf;

use clap::{Parser, Subcommand};
use switchboard_tools::Namespace;

/// Switchboard plugin host
#[derive(Debug, Parser)]
#[command(name = "switchboard", about = "Inspect registered tools and themes and call tools")]
pub struct Args {
    /// Path to configuration file; built-in defaults apply when omitted
    #[arg(short, long, env = "SWITCHBOARD_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log filter directive, overriding `RUST_LOG` and the config file
    #[arg(long, env = "SWITCHBOARD_LOG")]
    pub log: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List registered tools
    Tools {
        /// Only list one namespace
        #[arg(short, long)]
        namespace: Option<Namespace>,
    },
    /// List registered themes
    Themes,
    /// Call a server or context tool
    Call {
        /// Namespace of the tool (`server` or `context`)
        namespace: Namespace,
        /// Tool name
        name: String,
        /// Keyword arguments as a JSON object
        #[arg(long, default_value = "{}")]
        args: String,
        /// User the call is made on behalf of
        #[arg(long, default_value = "cli")]
        user: String,
    },
}
