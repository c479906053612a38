//! Language-model adapter contract for Switchboard
//!
//! Every provider integration implements [`LlmAdapter`]: pure mapping of the
//! shared message and tool schema into the provider's shape, plus a streamed
//! response. Streams are wrapped in [`retry_with_backoff`] so transient
//! provider failures before any output is delivered are retried with a
//! linearly increasing delay.

#![allow(clippy::must_use_candidate, clippy::missing_errors_doc)]

pub mod adapter;
pub mod chunk;
pub mod error;
pub mod retry;

pub use adapter::{AdapterFactory, ChunkStream, DynLlmAdapter, LlmAdapter, ModelConfiguration, ResponseRequest};
pub use chunk::{Chunk, Completion, ToolCallAccumulator, ToolCallDelta};
pub use error::LlmError;
pub use retry::{ResponseStream, RetryPolicy, RetryReporter, TracingReporter, retry_with_backoff};
