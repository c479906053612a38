use anyhow::Context as _;
use jiff::tz::TimeZone;
use serde_json::{Map, Value};
use switchboard_core::schema::value_kind;
use switchboard_core::{AgentIdentity, UserIdentity};
use switchboard_host::Host;
use switchboard_tools::{ContextToolContext, Namespace, PersistenceHandle, ServerToolContext, ToolSummary};

use crate::args::Command;

const CLI_AGENT_ID: &str = "switchboard-cli";

pub async fn run(host: &Host, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Tools { namespace } => {
            let namespaces = namespace.map_or_else(
                || vec![Namespace::Server, Namespace::Context, Namespace::Client],
                |namespace| vec![namespace],
            );

            for namespace in namespaces {
                for tool in tool_list(host, namespace) {
                    println!("{}", format_tool(namespace, &tool));
                }
            }
        }
        Command::Themes => {
            for theme in host.theme_list() {
                println!("{:<20} {}", theme.id, theme.description);
            }
        }
        Command::Call {
            namespace,
            name,
            args,
            user,
        } => {
            let arguments = parse_arguments(&args)?;
            let result = call(host, namespace, &name, &user, arguments).await?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}

fn tool_list(host: &Host, namespace: Namespace) -> Vec<ToolSummary> {
    match namespace {
        Namespace::Server => host.server_tool_list(),
        Namespace::Context => host.context_tool_list(),
        Namespace::Client => host.client_tool_list(),
    }
}

fn format_tool(namespace: Namespace, tool: &ToolSummary) -> String {
    format!(
        "{:<8} {:<24} {:<10} {}",
        namespace.as_str(),
        tool.id,
        tool.category.as_deref().unwrap_or("-"),
        tool.description
    )
}

async fn call(
    host: &Host,
    namespace: Namespace,
    name: &str,
    user: &str,
    arguments: Map<String, Value>,
) -> anyhow::Result<Value> {
    let user = UserIdentity::new(user, TimeZone::system());
    let agent = AgentIdentity::new(CLI_AGENT_ID, "Switchboard CLI");

    tracing::debug!(%namespace, tool = name, "calling tool from command line");

    let result = match namespace {
        Namespace::Server => {
            let context = ServerToolContext::new(user, agent, PersistenceHandle::detached());
            host.call_server_tool(name, &context, arguments).await
        }
        Namespace::Context => {
            let context = ContextToolContext::new(user, agent, PersistenceHandle::detached());
            host.call_context_tool(name, &context, arguments).await
        }
        Namespace::Client => {
            anyhow::bail!("client tools need a connected client and cannot be called from the command line")
        }
    };

    result.with_context(|| format!("{namespace} tool `{name}` failed"))
}

fn parse_arguments(raw: &str) -> anyhow::Result<Map<String, Value>> {
    match serde_json::from_str(raw).context("--args must be valid JSON")? {
        Value::Object(map) => Ok(map),
        other => anyhow::bail!("--args must be a JSON object, got {}", value_kind(&other)),
    }
}
