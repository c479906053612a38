//! Per-namespace execution contexts
//!
//! Each namespace gets its own context type exposing only the capabilities
//! that namespace is trusted with: persistence for server and context tools,
//! the UI surface for client tools.

use std::any::Any;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use switchboard_core::{AgentIdentity, Message, UserIdentity};

/// Tool namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Namespace {
    /// Server-side tools with persistence access
    Server,
    /// Server-side tools supplying data/instructions to the conversation
    Context,
    /// Tools executed against the client UI
    Client,
}

impl Namespace {
    /// Lowercase name of the namespace
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Server => "server",
            Self::Context => "context",
            Self::Client => "client",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Namespace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "server" => Ok(Self::Server),
            "context" | "data" => Ok(Self::Context),
            "client" => Ok(Self::Client),
            other => Err(format!("unknown tool namespace: {other}")),
        }
    }
}

/// Context bound as the receiver of every tool call in a namespace
pub trait ToolContext: Send + Sync + 'static {
    /// Namespace this context belongs to
    const NAMESPACE: Namespace;

    /// The acting user
    fn user(&self) -> &UserIdentity;

    /// The agent the conversation is held with
    fn agent(&self) -> &AgentIdentity;
}

/// Opaque persistence capability passed through to tools untouched
///
/// Wraps whatever database client the host uses; tools downcast it to the
/// concrete type they expect.
#[derive(Clone)]
pub struct PersistenceHandle(Arc<dyn Any + Send + Sync>);

impl PersistenceHandle {
    /// Wrap a persistence client
    pub fn new<T: Any + Send + Sync>(client: T) -> Self {
        Self(Arc::new(client))
    }

    /// Wrap an already shared persistence client
    pub fn from_arc<T: Any + Send + Sync>(client: Arc<T>) -> Self {
        Self(client)
    }

    /// A handle that carries no persistence client
    pub fn detached() -> Self {
        Self(Arc::new(()))
    }

    /// Borrow the client as `T`, if that is what the handle holds
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    /// Whether the handle carries no client
    pub fn is_detached(&self) -> bool {
        self.0.is::<()>()
    }
}

impl fmt::Debug for PersistenceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PersistenceHandle")
            .field("detached", &self.is_detached())
            .finish_non_exhaustive()
    }
}

/// Context for server tools
#[derive(Debug, Clone)]
pub struct ServerToolContext {
    /// The acting user
    pub user: UserIdentity,
    /// The agent being addressed
    pub agent: AgentIdentity,
    /// Conversation so far
    pub messages: Vec<Message>,
    /// Persistence capability
    pub db: PersistenceHandle,
}

impl ServerToolContext {
    /// Create a context with an empty message history
    pub const fn new(user: UserIdentity, agent: AgentIdentity, db: PersistenceHandle) -> Self {
        Self {
            user,
            agent,
            messages: Vec::new(),
            db,
        }
    }

    /// Attach the conversation history
    #[must_use]
    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = messages;
        self
    }
}

impl ToolContext for ServerToolContext {
    const NAMESPACE: Namespace = Namespace::Server;

    fn user(&self) -> &UserIdentity {
        &self.user
    }

    fn agent(&self) -> &AgentIdentity {
        &self.agent
    }
}

/// Context for context/data tools
#[derive(Debug, Clone)]
pub struct ContextToolContext {
    /// The acting user
    pub user: UserIdentity,
    /// The agent being addressed
    pub agent: AgentIdentity,
    /// Conversation so far
    pub messages: Vec<Message>,
    /// Persistence capability
    pub db: PersistenceHandle,
}

impl ContextToolContext {
    /// Create a context with an empty message history
    pub const fn new(user: UserIdentity, agent: AgentIdentity, db: PersistenceHandle) -> Self {
        Self {
            user,
            agent,
            messages: Vec::new(),
            db,
        }
    }

    /// Attach the conversation history
    #[must_use]
    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = messages;
        self
    }
}

impl ToolContext for ContextToolContext {
    const NAMESPACE: Namespace = Namespace::Context;

    fn user(&self) -> &UserIdentity {
        &self.user
    }

    fn agent(&self) -> &AgentIdentity {
        &self.agent
    }
}

/// A task the client can switch the conversation into
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientTask {
    /// Task identifier
    pub id: String,
    /// Built-in task that users cannot edit
    #[serde(default)]
    pub is_system: bool,
    /// Task name, used for lookup
    pub name: String,
    /// What the task is for
    pub description: String,
    /// Whether switching to the task opens a fresh thread
    #[serde(default)]
    pub start_new_thread: bool,
    /// Model the task runs on
    pub model_id: String,
    /// Theme the task is rendered with
    pub theme: String,
}

/// Request to render a modal on the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModalRequest {
    /// Modal title
    pub title: String,
    /// Description of the form or content the client renders
    pub content: serde_json::Value,
}

/// UI capabilities available to client tools
#[async_trait]
pub trait ClientSurface: Send + Sync {
    /// Task currently active in the client
    async fn current_task(&self) -> Option<ClientTask>;

    /// Switch to the named task
    async fn set_task(&self, task_name: &str) -> anyhow::Result<()>;

    /// Identifier of the thread currently shown
    async fn current_thread(&self) -> Option<String>;

    /// Switch to another thread
    async fn set_thread(&self, thread_id: &str) -> anyhow::Result<()>;

    /// Append messages to the current thread and submit them
    async fn send_messages(&self, messages: Vec<Message>) -> anyhow::Result<()>;

    /// Show a modal and wait for the value the user submits
    async fn show_modal(&self, modal: ModalRequest) -> anyhow::Result<String>;

    /// Close the modal currently shown
    async fn hide_modal(&self) -> anyhow::Result<()>;
}

/// Context for client tools
#[derive(Clone)]
pub struct ClientToolContext {
    /// The acting user
    pub user: UserIdentity,
    /// The agent being addressed
    pub agent: AgentIdentity,
    /// Conversation so far
    pub messages: Vec<Message>,
    /// Tasks the client offers
    pub tasks: Vec<ClientTask>,
    /// UI capability
    pub surface: Arc<dyn ClientSurface>,
}

impl ClientToolContext {
    /// Create a client context
    pub fn new(user: UserIdentity, agent: AgentIdentity, surface: Arc<dyn ClientSurface>) -> Self {
        Self {
            user,
            agent,
            messages: Vec::new(),
            tasks: Vec::new(),
            surface,
        }
    }

    /// Attach the conversation history
    #[must_use]
    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = messages;
        self
    }

    /// Attach the tasks the client offers
    #[must_use]
    pub fn with_tasks(mut self, tasks: Vec<ClientTask>) -> Self {
        self.tasks = tasks;
        self
    }

    /// Look up a task by name
    pub fn task(&self, name: &str) -> Option<&ClientTask> {
        self.tasks.iter().find(|t| t.name == name)
    }
}

impl fmt::Debug for ClientToolContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientToolContext")
            .field("user", &self.user)
            .field("agent", &self.agent)
            .field("messages", &self.messages)
            .field("tasks", &self.tasks)
            .finish_non_exhaustive()
    }
}

impl ToolContext for ClientToolContext {
    const NAMESPACE: Namespace = Namespace::Client;

    fn user(&self) -> &UserIdentity {
        &self.user
    }

    fn agent(&self) -> &AgentIdentity {
        &self.agent
    }
}
