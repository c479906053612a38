//! Context builders and a recording client surface

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use jiff::Timestamp;
use jiff::tz::TimeZone;
use serde_json::{Map, Value};
use switchboard_core::{AgentIdentity, Message, UserIdentity};
use switchboard_tools::{
    ClientSurface, ClientTask, ClientToolContext, ContextToolContext, ModalRequest, PersistenceHandle,
    ServerToolContext,
};

/// Fixed instant so time-dependent tools are deterministic
pub const NOW: &str = "2024-06-01T12:00:00Z";

pub fn user() -> UserIdentity {
    let now: Timestamp = NOW.parse().expect("valid timestamp");
    UserIdentity::at("user-1", now, TimeZone::UTC)
}

pub fn agent() -> AgentIdentity {
    AgentIdentity::new("agent-1", "Helper")
}

/// Stand-in for a database client handed to server tools
#[derive(Debug, Default)]
pub struct FakeDatabase {
    pub rows: Mutex<Vec<String>>,
}

pub fn server_context(db: Arc<FakeDatabase>) -> ServerToolContext {
    ServerToolContext::new(user(), agent(), PersistenceHandle::from_arc(db))
}

pub fn context_context(messages: Vec<Message>) -> ContextToolContext {
    ContextToolContext::new(user(), agent(), PersistenceHandle::detached()).with_messages(messages)
}

pub fn client_context(surface: Arc<RecordingSurface>) -> ClientToolContext {
    ClientToolContext::new(user(), agent(), surface).with_tasks(vec![ClientTask {
        id: "task-1".into(),
        is_system: true,
        name: "chat".into(),
        description: "General conversation".into(),
        start_new_thread: false,
        model_id: "mock-model".into(),
        theme: "dusk".into(),
    }])
}

/// Object from a `json!` literal
pub fn args(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

/// Client surface that records every UI action
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub actions: Mutex<Vec<String>>,
    pub modal_reply: Mutex<Option<String>>,
}

impl RecordingSurface {
    pub fn actions(&self) -> Vec<String> {
        self.actions.lock().expect("lock").clone()
    }

    fn record(&self, action: String) {
        self.actions.lock().expect("lock").push(action);
    }
}

#[async_trait]
impl ClientSurface for RecordingSurface {
    async fn current_task(&self) -> Option<ClientTask> {
        None
    }

    async fn set_task(&self, task_name: &str) -> anyhow::Result<()> {
        self.record(format!("set_task:{task_name}"));
        Ok(())
    }

    async fn current_thread(&self) -> Option<String> {
        None
    }

    async fn set_thread(&self, thread_id: &str) -> anyhow::Result<()> {
        self.record(format!("set_thread:{thread_id}"));
        Ok(())
    }

    async fn send_messages(&self, messages: Vec<Message>) -> anyhow::Result<()> {
        self.record(format!("send_messages:{}", messages.len()));
        Ok(())
    }

    async fn show_modal(&self, modal: ModalRequest) -> anyhow::Result<String> {
        self.record(format!("show_modal:{}", modal.title));
        Ok(self.modal_reply.lock().expect("lock").clone().unwrap_or_default())
    }

    async fn hide_modal(&self) -> anyhow::Result<()> {
        self.record("hide_modal".to_owned());
        Ok(())
    }
}
