use futures_util::future::BoxFuture;
use serde_json::{Value, json};
use switchboard_tools::{ClientToolContext, ModalRequest, PositionalArgs};

/// Switch the client to one of the tasks it offers
pub(super) fn switch_task<'a>(context: &'a ClientToolContext, args: PositionalArgs) -> BoxFuture<'a, anyhow::Result<Value>> {
    Box::pin(async move {
        let name: String = args.required(0)?;

        let Some(task) = context.task(&name) else {
            let known: Vec<_> = context.tasks.iter().map(|t| t.name.as_str()).collect();
            anyhow::bail!("unknown task `{name}`, available: {}", known.join(", "));
        };

        context.surface.set_task(&task.name).await?;
        tracing::debug!(task = %task.name, user = %context.user.id, "switched task");

        Ok(json!({
            "task": task.id,
            "start_new_thread": task.start_new_thread,
        }))
    })
}

/// Show another thread in the client
pub(super) fn open_thread<'a>(context: &'a ClientToolContext, args: PositionalArgs) -> BoxFuture<'a, anyhow::Result<Value>> {
    Box::pin(async move {
        let thread_id: String = args.required(0)?;

        if thread_id.trim().is_empty() {
            anyhow::bail!("thread_id must not be empty");
        }

        context.surface.set_thread(&thread_id).await?;

        Ok(json!({ "thread_id": thread_id }))
    })
}

/// Ask the user a question in a modal and return the answer
pub(super) fn ask_user<'a>(context: &'a ClientToolContext, args: PositionalArgs) -> BoxFuture<'a, anyhow::Result<Value>> {
    Box::pin(async move {
        let title: String = args.required(0)?;
        let question: String = args.required(1)?;

        let answer = context
            .surface
            .show_modal(ModalRequest {
                title,
                content: json!({ "question": question }),
            })
            .await?;
        context.surface.hide_modal().await?;

        Ok(json!({ "answer": answer }))
    })
}
