//! Built-in `system` tools
//!
//! One or two tools per namespace that only need the capabilities their
//! context carries. Disabled with `[plugins] system = false`.

mod client;
mod context;
mod server;

use switchboard_core::{ParameterType, ToolParameter};
use switchboard_tools::{ClientTool, ContextTool, ServerTool};

use crate::plugin::{Plugin, PluginRegistrar};

/// Category shared by every built-in tool; listed first in each namespace
pub const CATEGORY: &str = "system";

/// Registers the built-in tools
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemPlugin;

impl Plugin for SystemPlugin {
    fn name(&self) -> &str {
        CATEGORY
    }

    fn register(&self, registrar: &mut PluginRegistrar) -> anyhow::Result<()> {
        registrar
            .register_server_tool(
                ServerTool::new(
                    "current_time",
                    "Current date and time in the user's time zone",
                    server::current_time,
                )
                .with_category(CATEGORY)
                .with_parameter(
                    ToolParameter::new("format", ParameterType::String, "strftime-style format for the local time")
                        .optional()
                        .with_default(server::DEFAULT_FORMAT),
                ),
            )
            .register_context_tool(
                ContextTool::new(
                    "conversation_stats",
                    "Message counts for the current conversation",
                    context::conversation_stats,
                )
                .with_category(CATEGORY),
            )
            .register_client_tool(
                ClientTool::new("switch_task", "Switch the client to another task", client::switch_task)
                    .with_category(CATEGORY)
                    .with_parameter(ToolParameter::new("task", ParameterType::String, "name of the task")),
            )
            .register_client_tool(
                ClientTool::new("open_thread", "Show another conversation thread", client::open_thread)
                    .with_category(CATEGORY)
                    .with_parameter(ToolParameter::new("thread_id", ParameterType::String, "thread to open")),
            )
            .register_client_tool(
                ClientTool::new("ask_user", "Ask the user a question in a modal", client::ask_user)
                    .with_category(CATEGORY)
                    .with_parameters([
                        ToolParameter::new("title", ParameterType::String, "modal title"),
                        ToolParameter::new("question", ParameterType::String, "question shown to the user"),
                    ]),
            );

        Ok(())
    }
}
