use futures_util::future::BoxFuture;
use serde_json::{Value, json};
use switchboard_core::Role;
use switchboard_tools::{ContextToolContext, PositionalArgs};

/// Per-role message counts for the conversation in context
pub(super) fn conversation_stats<'a>(
    context: &'a ContextToolContext,
    _args: PositionalArgs,
) -> BoxFuture<'a, anyhow::Result<Value>> {
    Box::pin(async move {
        let messages = &context.messages;
        let count = |role: Role| messages.iter().filter(|m| m.role() == role).count();

        Ok(json!({
            "total": messages.len(),
            "user": count(Role::User),
            "assistant": count(Role::Assistant),
            "system": count(Role::System),
            "tool": count(Role::Tool),
            "tool_calls": messages.iter().map(|m| m.tool_calls().len()).sum::<usize>(),
        }))
    })
}
