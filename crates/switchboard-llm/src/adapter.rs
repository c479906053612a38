//! Provider adapter contract

use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::{Stream, stream};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use switchboard_core::{Message, ToolSchema};
use tokio_util::sync::CancellationToken;

use crate::chunk::Chunk;
use crate::error::LlmError;
use crate::retry::{ResponseStream, RetryPolicy, RetryReporter, TracingReporter, retry_with_backoff};

/// Boxed stream of response chunks
pub type ChunkStream<'a> = Pin<Box<dyn Stream<Item = Result<Chunk, LlmError>> + Send + 'a>>;

/// Builds an adapter for a model id and optional configuration
pub type AdapterFactory =
    Arc<dyn Fn(String, Option<ModelConfiguration>) -> Result<Box<dyn DynLlmAdapter>, LlmError> + Send + Sync>;

/// Sampling settings for one model instance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelConfiguration {
    /// Sampling temperature
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    /// Output token cap
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    /// Nucleus sampling threshold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
    /// Provider-specific settings passed through untouched
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Input to a single response generation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseRequest {
    /// System instructions
    pub instructions: String,
    /// Conversation so far, oldest first
    pub messages: Vec<Message>,
    /// Tools the model may call
    #[serde(default)]
    pub tools: Vec<ToolSchema>,
    /// Provider-specific request options
    #[serde(default)]
    pub options: Map<String, Value>,
}

impl ResponseRequest {
    /// Request with instructions and conversation
    pub fn new(instructions: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            instructions: instructions.into(),
            messages,
            ..Self::default()
        }
    }

    /// Offer tools to the model
    #[must_use]
    pub fn with_tools(mut self, tools: Vec<ToolSchema>) -> Self {
        self.tools = tools;
        self
    }

    /// Set one provider-specific option
    #[must_use]
    pub fn with_option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.options.insert(key.into(), value);
        self
    }

    /// Check every message before it is handed to a provider
    pub fn validate(&self) -> Result<(), LlmError> {
        self.messages
            .iter()
            .try_for_each(Message::validate)
            .map_err(|e| LlmError::InvalidRequest(e.to_string()))
    }
}

/// Contract implemented by each model provider integration
///
/// `map_messages` and `map_tools` are pure translations into the provider's
/// request shape. `open_stream` performs one attempt against the provider;
/// [`generate_response`](LlmAdapter::generate_response) wraps it in retry.
#[async_trait]
pub trait LlmAdapter: Send + Sync {
    /// Provider message shape
    type ProviderMessage: Serialize + Send;

    /// Provider tool declaration shape
    type ProviderTool: Serialize + Send;

    /// Model this adapter drives
    fn model_id(&self) -> &str;

    /// Sampling settings, if any were supplied
    fn configuration(&self) -> Option<&ModelConfiguration>;

    /// Translate messages into the provider's format
    fn map_messages(&self, messages: &[Message]) -> Vec<Self::ProviderMessage>;

    /// Translate tool declarations into the provider's format
    fn map_tools(&self, tools: &[ToolSchema]) -> Vec<Self::ProviderTool>;

    /// Open one response stream without retrying
    async fn open_stream(&self, request: &ResponseRequest) -> Result<ChunkStream<'static>, LlmError>;

    /// Retry bounds applied by `generate_response`
    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::default()
    }

    /// Sink for retry warnings and terminal failures
    fn retry_reporter(&self) -> Arc<dyn RetryReporter> {
        Arc::new(TracingReporter::new(LlmAdapter::model_id(self)))
    }

    /// Stream a response, retrying failures that happen before any output
    fn generate_response<'a>(&'a self, request: &'a ResponseRequest) -> ResponseStream<'a> {
        LlmAdapter::generate_response_with(self, request, self.retry_policy())
    }

    /// Stream a response under an explicit retry policy
    ///
    /// An invalid request yields a single [`LlmError::InvalidRequest`]
    /// without contacting the provider.
    fn generate_response_with<'a>(&'a self, request: &'a ResponseRequest, policy: RetryPolicy) -> ResponseStream<'a> {
        let cancel = CancellationToken::new();

        if let Err(e) = request.validate() {
            tracing::debug!(model = LlmAdapter::model_id(self), error = %e, "rejected response request");
            return ResponseStream::new(Box::pin(stream::once(async move { Err::<Chunk, _>(e) })), cancel);
        }

        let inner = retry_with_backoff(policy, self.retry_reporter(), cancel.clone(), move || {
            self.open_stream(request)
        });

        ResponseStream::new(inner, cancel)
    }
}

/// Object-safe view of an [`LlmAdapter`], with provider shapes as JSON
pub trait DynLlmAdapter: Send + Sync {
    /// Model this adapter drives
    fn model_id(&self) -> &str;

    /// Sampling settings, if any were supplied
    fn configuration(&self) -> Option<&ModelConfiguration>;

    /// Messages in the provider's format
    fn map_messages(&self, messages: &[Message]) -> Result<Vec<Value>, LlmError>;

    /// Tool declarations in the provider's format
    fn map_tools(&self, tools: &[ToolSchema]) -> Result<Vec<Value>, LlmError>;

    /// Stream a response with the adapter's own retry policy
    fn generate_response<'a>(&'a self, request: &'a ResponseRequest) -> ResponseStream<'a>;

    /// Stream a response under an explicit retry policy
    fn generate_response_with<'a>(&'a self, request: &'a ResponseRequest, policy: RetryPolicy) -> ResponseStream<'a>;
}

impl<A: LlmAdapter> DynLlmAdapter for A {
    fn model_id(&self) -> &str {
        LlmAdapter::model_id(self)
    }

    fn configuration(&self) -> Option<&ModelConfiguration> {
        LlmAdapter::configuration(self)
    }

    fn map_messages(&self, messages: &[Message]) -> Result<Vec<Value>, LlmError> {
        to_values(LlmAdapter::map_messages(self, messages))
    }

    fn map_tools(&self, tools: &[ToolSchema]) -> Result<Vec<Value>, LlmError> {
        to_values(LlmAdapter::map_tools(self, tools))
    }

    fn generate_response<'a>(&'a self, request: &'a ResponseRequest) -> ResponseStream<'a> {
        LlmAdapter::generate_response(self, request)
    }

    fn generate_response_with<'a>(&'a self, request: &'a ResponseRequest, policy: RetryPolicy) -> ResponseStream<'a> {
        LlmAdapter::generate_response_with(self, request, policy)
    }
}

fn to_values<T: Serialize>(items: Vec<T>) -> Result<Vec<Value>, LlmError> {
    items
        .into_iter()
        .map(|item| serde_json::to_value(item).map_err(|e| LlmError::InvalidRequest(e.to_string())))
        .collect()
}
