//! Response generation with retry through the host

mod harness;

use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use harness::mock_llm::{Attempt, Script, registration};
use switchboard_config::Config;
use switchboard_core::{Message, ToolCall};
use switchboard_host::{Host, HostBuilder};
use switchboard_llm::{Chunk, LlmError, ResponseRequest, RetryPolicy};
use tokio::time::Instant;

fn host_with(script: &Arc<Script>, config: &str) -> Host {
    let config: Config = config.parse().unwrap();
    let mut builder = HostBuilder::from_config(&config).unwrap();
    builder.registrar().register_llm(registration("mock-model", script));
    builder.build()
}

fn request() -> ResponseRequest {
    ResponseRequest::new("Answer briefly", vec![Message::user("What is 2 + 2?")])
}

#[tokio::test(start_paused = true)]
async fn two_failures_then_success_yields_third_attempt() {
    let script = Script::new([
        Attempt::Fail("connection reset"),
        Attempt::Fail("502 bad gateway"),
        Attempt::Chunks(vec![Chunk::text("4"), Chunk::text(".")]),
    ]);
    let host = host_with(&script, "");
    let model = host.instantiate_llm("mock-model", None).unwrap();
    let request = request();

    let start = Instant::now();
    let chunks: Vec<_> = model.generate_response(&request).collect().await;

    assert_eq!(chunks.len(), 2);
    assert!(matches!(&chunks[0], Ok(Chunk::Text(t)) if t == "4"));
    assert!(matches!(&chunks[1], Ok(Chunk::Text(t)) if t == "."));
    assert_eq!(script.opened(), 3);
    assert_eq!(
        script.reporter.warnings(),
        vec![(1, Duration::from_secs(1)), (2, Duration::from_secs(2))]
    );
    assert!(script.reporter.errors().is_empty());
    assert_eq!(start.elapsed(), Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn exhausted_budget_reraises_last_error_without_chunks() {
    let script = Script::new([
        Attempt::Fail("fail 1"),
        Attempt::Fail("fail 2"),
        Attempt::Fail("fail 3"),
        Attempt::Fail("fail 4"),
    ]);
    let host = host_with(&script, "");
    let model = host.instantiate_llm("mock-model", None).unwrap();
    let request = request();

    let items: Vec<_> = model.generate_response(&request).collect().await;

    assert_eq!(items.len(), 1);
    assert!(matches!(&items[0], Err(LlmError::Upstream(reason)) if reason == "fail 4"));
    assert_eq!(script.opened(), 4);
    assert_eq!(script.reporter.warnings().len(), 3);
    assert_eq!(script.reporter.errors(), ["upstream error: fail 4"]);
}

#[tokio::test(start_paused = true)]
async fn configured_policy_replaces_adapter_default() {
    let script = Script::new([Attempt::Fail("a"), Attempt::Fail("b")]);
    let host = host_with(&script, "[llm.retry]\nmax_retries = 1\nbase_delay_ms = 250\n");
    let model = host.instantiate_llm("mock-model", None).unwrap();
    let request = request();

    let start = Instant::now();
    let items: Vec<_> = model.generate_response(&request).collect().await;

    assert!(matches!(&items[..], [Err(LlmError::Upstream(reason))] if reason == "b"));
    assert_eq!(script.opened(), 2);
    assert_eq!(script.reporter.warnings(), vec![(1, Duration::from_millis(250))]);
    assert_eq!(start.elapsed(), Duration::from_millis(250));
}

#[tokio::test(start_paused = true)]
async fn failure_after_first_chunk_is_not_retried() {
    let script = Script::new([
        Attempt::ChunksThenFail(vec![Chunk::text("partial")], "connection dropped"),
        Attempt::Chunks(vec![Chunk::text("should never be requested")]),
    ]);
    let host = host_with(&script, "");
    let model = host.instantiate_llm("mock-model", None).unwrap();
    let request = request();

    let items: Vec<_> = model.generate_response(&request).collect().await;

    assert_eq!(items.len(), 2);
    assert!(matches!(&items[0], Ok(Chunk::Text(t)) if t == "partial"));
    assert!(matches!(&items[1], Err(LlmError::Streaming(_))));
    assert_eq!(script.opened(), 1);
    assert!(script.reporter.warnings().is_empty());
    assert_eq!(script.reporter.errors().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn completion_assembles_text_and_tool_calls() {
    let script = Script::new([
        Attempt::Fail("timeout"),
        Attempt::Chunks(vec![
            Chunk::text("Checking "),
            Chunk::text("the time."),
            Chunk::tool_call(0, ToolCall::function("call_1", "current_time", r#"{"format":"%H:%M"}"#)),
        ]),
    ]);
    let host = host_with(&script, "");
    let model = host.instantiate_llm("mock-model", None).unwrap();
    let request = request().with_tools(host.server_tools().schemas());

    let completion = model.generate_response(&request).into_completion().await.unwrap();

    assert_eq!(completion.text, "Checking the time.");
    assert_eq!(completion.tool_calls.len(), 1);

    let message = completion.into_message();
    assert!(message.validate().is_ok());
    assert_eq!(message.tool_calls()[0].function.name, "current_time");
}

#[tokio::test(start_paused = true)]
async fn cancelling_during_backoff_stops_retrying() {
    let script = Script::new([Attempt::Fail("overloaded"), Attempt::Chunks(vec![Chunk::text("late")])]);
    let host = host_with(&script, "");
    let model = host.instantiate_llm("mock-model", None).unwrap();
    let request = request();

    let mut response = model.generate_response(&request);
    let cancel = response.cancel_handle();

    let (first, ()) = tokio::join!(response.next(), async move {
        tokio::time::sleep(Duration::from_millis(300)).await;
        cancel.cancel();
    });

    assert!(first.is_none());
    assert_eq!(script.opened(), 1);
}

#[tokio::test(start_paused = true)]
async fn cancelled_completion_reports_cancellation() {
    let script = Script::new([Attempt::Hang]);
    let host = host_with(&script, "");
    let model = host.instantiate_llm("mock-model", None).unwrap();
    let request = request();

    let response = model.generate_response(&request);
    let cancel = response.cancel_handle();

    let (result, ()) = tokio::join!(response.into_completion(), async move {
        tokio::time::sleep(Duration::from_secs(5)).await;
        cancel.cancel();
    });

    assert!(matches!(result, Err(LlmError::Cancelled)));
}

#[tokio::test(start_paused = true)]
async fn adapters_map_provider_shapes() {
    let script = Script::new(Vec::<Attempt>::new());
    let host = host_with(&script, "");
    let model = host.instantiate_llm("mock-model", None).unwrap();

    let messages = model.map_messages(&[Message::user("hi")]).unwrap();
    assert_eq!(messages, vec![serde_json::json!({"author": "user", "parts": ["hi"]})]);

    let tools = model.map_tools(&host.server_tools().schemas()).unwrap();
    assert_eq!(tools[0]["name"], "current_time");
    assert_eq!(script.opened(), 0);
}

#[test]
fn registered_models_are_listed_and_looked_up() {
    let script = Script::new(Vec::<Attempt>::new());
    let host = host_with(&script, "");

    let listed = host.llm_list();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, "mock-model");
    assert_eq!(host.llm("mock-model").unwrap().definition.provider, "mock");
    assert!(host.llm("ghost").is_none());
    assert!(host.instantiate_llm("ghost", None).is_err());
}

#[test]
fn default_policy_matches_documented_schedule() {
    let policy = RetryPolicy::default();
    let delays: Vec<_> = (0..policy.max_retries).map(|i| policy.delay_for(i)).collect();

    assert_eq!(
        delays,
        [Duration::from_secs(1), Duration::from_secs(2), Duration::from_secs(3)]
    );
}
