//! Retry with linear backoff for streaming operations
//!
//! An attempt is retried only while it has produced nothing: a setup error
//! or an error as the first item. Once an item has been forwarded the attempt
//! owns the output, and a later error ends the stream instead of restarting
//! it, so callers never see duplicated partial output.

use std::fmt;
use std::future::Future;
use std::pin::{Pin, pin};
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;

use futures_util::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;

use crate::adapter::ChunkStream;
use crate::chunk::{Chunk, Completion, ToolCallAccumulator};
use crate::error::LlmError;

/// Bounds on retrying a failed streaming operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt; total attempts is one more
    pub max_retries: u32,
    /// Delay unit; the wait after attempt `n` (0-based) is `(n + 1) * base_delay`
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Create a policy
    pub const fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Total number of attempts
    pub const fn attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Wait after the failed attempt at `attempt_index` (0-based)
    pub fn delay_for(&self, attempt_index: u32) -> Duration {
        self.base_delay.saturating_mul(attempt_index.saturating_add(1))
    }
}

/// Receives retry outcomes
///
/// `retrying` is a recoverable warning; `exhausted` and `interrupted` are
/// terminal errors. Attempt numbers are 1-based.
pub trait RetryReporter: Send + Sync {
    /// An attempt failed and another will follow after `delay`
    fn retrying(&self, attempt: u32, delay: Duration, error: &dyn fmt::Display);

    /// The final attempt failed
    fn exhausted(&self, attempts: u32, error: &dyn fmt::Display);

    /// An attempt failed after it had already delivered output
    fn interrupted(&self, attempt: u32, error: &dyn fmt::Display);
}

/// Reports retries through `tracing`
#[derive(Debug, Clone)]
pub struct TracingReporter {
    operation: String,
}

impl TracingReporter {
    /// Reporter labelling events with `operation` (e.g. a model id)
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
        }
    }
}

impl RetryReporter for TracingReporter {
    fn retrying(&self, attempt: u32, delay: Duration, error: &dyn fmt::Display) {
        tracing::warn!(
            operation = %self.operation,
            attempt,
            delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
            error = %error,
            "attempt failed, retrying after backoff"
        );
    }

    fn exhausted(&self, attempts: u32, error: &dyn fmt::Display) {
        tracing::error!(
            operation = %self.operation,
            attempts,
            error = %error,
            "all attempts failed"
        );
    }

    fn interrupted(&self, attempt: u32, error: &dyn fmt::Display) {
        tracing::error!(
            operation = %self.operation,
            attempt,
            error = %error,
            "stream failed after output was delivered"
        );
    }
}

/// Wrap a stream-producing operation with bounded retry
///
/// Items are forwarded as they arrive. A terminal failure is yielded as the
/// final item. Cancelling `cancel` ends the stream at the next suspension
/// point (a backoff wait, a pending setup or a pending item).
pub fn retry_with_backoff<'a, T, E, S, F, Fut>(
    policy: RetryPolicy,
    reporter: Arc<dyn RetryReporter>,
    cancel: CancellationToken,
    mut operation: F,
) -> Pin<Box<dyn Stream<Item = Result<T, E>> + Send + 'a>>
where
    T: Send + 'a,
    E: fmt::Display + Send + 'a,
    S: Stream<Item = Result<T, E>> + Send + 'a,
    F: FnMut() -> Fut + Send + 'a,
    Fut: Future<Output = Result<S, E>> + Send + 'a,
{
    Box::pin(async_stream::stream! {
        let mut attempt: u32 = 0;

        loop {
            let setup = tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                setup = operation() => setup,
            };

            let failure = match setup {
                Err(e) => e,
                Ok(inner) => {
                    let mut inner = pin!(inner);

                    let first = tokio::select! {
                        biased;
                        () = cancel.cancelled() => break,
                        first = inner.next() => first,
                    };

                    match first {
                        // Finished without output
                        None => break,
                        Some(Err(e)) => e,
                        Some(Ok(item)) => {
                            yield Ok(item);

                            loop {
                                let next = tokio::select! {
                                    biased;
                                    () = cancel.cancelled() => None,
                                    next = inner.next() => next,
                                };

                                match next {
                                    None => break,
                                    Some(Ok(item)) => yield Ok(item),
                                    Some(Err(e)) => {
                                        reporter.interrupted(attempt + 1, &e);
                                        yield Err(e);
                                        break;
                                    }
                                }
                            }

                            break;
                        }
                    }
                }
            };

            if attempt >= policy.max_retries {
                reporter.exhausted(attempt + 1, &failure);
                yield Err(failure);
                break;
            }

            let delay = policy.delay_for(attempt);
            reporter.retrying(attempt + 1, delay, &failure);

            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                () = tokio::time::sleep(delay) => {}
            }

            attempt += 1;
        }
    })
}

/// Lazy, single-pass stream of response chunks
///
/// Pull-based: nothing is buffered beyond what the provider transport holds.
/// Dropping the stream or cancelling its handle stops consumption.
pub struct ResponseStream<'a> {
    inner: ChunkStream<'a>,
    cancel: CancellationToken,
}

impl<'a> ResponseStream<'a> {
    /// Pair a chunk stream with the token that cancels it
    pub fn new(inner: ChunkStream<'a>, cancel: CancellationToken) -> Self {
        Self { inner, cancel }
    }

    /// Token that ends the stream when cancelled
    pub fn cancel_handle(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Stop the stream at its next suspension point
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Drain the stream into text and complete tool calls
    ///
    /// A cancelled stream yields [`LlmError::Cancelled`] instead of a partial
    /// completion.
    pub async fn into_completion(mut self) -> Result<Completion, LlmError> {
        let mut text = String::new();
        let mut tool_calls = ToolCallAccumulator::new();

        while let Some(chunk) = self.next().await {
            match chunk? {
                Chunk::Text(fragment) => text.push_str(&fragment),
                Chunk::ToolCall(delta) => tool_calls.push(delta),
            }
        }

        if self.cancel.is_cancelled() {
            return Err(LlmError::Cancelled);
        }

        Ok(Completion {
            text,
            tool_calls: tool_calls.finish()?,
        })
    }
}

impl Stream for ResponseStream<'_> {
    type Item = Result<Chunk, LlmError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.get_mut().inner.as_mut().poll_next(cx)
    }
}
