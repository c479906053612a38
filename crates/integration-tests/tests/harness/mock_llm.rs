//! Scripted model adapter
//!
//! Each call to `open_stream` consumes the next scripted attempt, so a test
//! can describe exactly how a provider misbehaves across retries.

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::stream;
use serde_json::{Value, json};
use switchboard_catalog::{LlmDefinition, LlmRegistration};
use switchboard_core::{Message, ToolSchema};
use switchboard_llm::{
    AdapterFactory, Chunk, ChunkStream, DynLlmAdapter, LlmAdapter, LlmError, ModelConfiguration, ResponseRequest,
    RetryReporter,
};

/// Outcome of one provider attempt
#[derive(Debug, Clone)]
pub enum Attempt {
    /// The request itself fails
    Fail(&'static str),
    /// The stream delivers these chunks, then ends
    Chunks(Vec<Chunk>),
    /// The stream delivers these chunks, then fails
    ChunksThenFail(Vec<Chunk>, &'static str),
    /// The stream never produces anything
    Hang,
}

/// Shared script and counters behind every adapter a factory builds
#[derive(Default)]
pub struct Script {
    attempts: Mutex<VecDeque<Attempt>>,
    opened: AtomicU32,
    pub reporter: Arc<CountingReporter>,
}

impl Script {
    pub fn new(attempts: impl IntoIterator<Item = Attempt>) -> Arc<Self> {
        Arc::new(Self {
            attempts: Mutex::new(attempts.into_iter().collect()),
            ..Self::default()
        })
    }

    /// Number of times a stream was opened
    pub fn opened(&self) -> u32 {
        self.opened.load(Ordering::SeqCst)
    }

    fn next(&self) -> Attempt {
        self.opened.fetch_add(1, Ordering::SeqCst);
        self.attempts
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or(Attempt::Fail("script exhausted"))
    }
}

/// Adapter replaying a [`Script`]
pub struct ScriptedAdapter {
    model_id: String,
    configuration: Option<ModelConfiguration>,
    script: Arc<Script>,
}

#[async_trait]
impl LlmAdapter for ScriptedAdapter {
    type ProviderMessage = Value;
    type ProviderTool = Value;

    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn configuration(&self) -> Option<&ModelConfiguration> {
        self.configuration.as_ref()
    }

    fn map_messages(&self, messages: &[Message]) -> Vec<Value> {
        messages
            .iter()
            .map(|m| json!({"author": m.role().as_str(), "parts": [m.content()]}))
            .collect()
    }

    fn map_tools(&self, tools: &[ToolSchema]) -> Vec<Value> {
        tools
            .iter()
            .map(|t| json!({"name": t.function.name, "description": t.function.description}))
            .collect()
    }

    fn retry_reporter(&self) -> Arc<dyn RetryReporter> {
        self.script.reporter.clone()
    }

    async fn open_stream(&self, _request: &ResponseRequest) -> Result<ChunkStream<'static>, LlmError> {
        match self.script.next() {
            Attempt::Fail(reason) => Err(LlmError::Upstream(reason.to_owned())),
            Attempt::Chunks(chunks) => Ok(Box::pin(stream::iter(chunks.into_iter().map(Ok::<_, LlmError>)))),
            Attempt::ChunksThenFail(chunks, reason) => {
                let items = chunks
                    .into_iter()
                    .map(Ok)
                    .chain(std::iter::once(Err(LlmError::Streaming(reason.to_owned()))));
                Ok(Box::pin(stream::iter(items)))
            }
            Attempt::Hang => Ok(Box::pin(stream::pending::<Result<Chunk, LlmError>>())),
        }
    }
}

/// Catalog registration whose adapters share `script`
pub fn registration(id: &str, script: &Arc<Script>) -> LlmRegistration {
    let script = Arc::clone(script);
    let factory: AdapterFactory = Arc::new(move |model_id, configuration| {
        Ok(Box::new(ScriptedAdapter {
            model_id,
            configuration,
            script: Arc::clone(&script),
        }) as Box<dyn DynLlmAdapter>)
    });

    LlmRegistration::new(
        LlmDefinition {
            id: id.to_owned(),
            name: format!("Mock {id}"),
            provider: "mock".to_owned(),
            description: format!("Scripted model {id}"),
            maximum_output_tokens: 1024,
            maximum_temperature: 2.0,
        },
        factory,
    )
}

/// Retry reporter that counts instead of logging
#[derive(Debug, Default)]
pub struct CountingReporter {
    pub warnings: Mutex<Vec<(u32, Duration)>>,
    pub errors: Mutex<Vec<String>>,
}

impl CountingReporter {
    pub fn warnings(&self) -> Vec<(u32, Duration)> {
        self.warnings.lock().expect("lock").clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().expect("lock").clone()
    }
}

impl RetryReporter for CountingReporter {
    fn retrying(&self, attempt: u32, delay: Duration, _error: &dyn fmt::Display) {
        self.warnings.lock().expect("lock").push((attempt, delay));
    }

    fn exhausted(&self, _attempts: u32, error: &dyn fmt::Display) {
        self.errors.lock().expect("lock").push(error.to_string());
    }

    fn interrupted(&self, _attempt: u32, error: &dyn fmt::Display) {
        self.errors.lock().expect("lock").push(error.to_string());
    }
}
