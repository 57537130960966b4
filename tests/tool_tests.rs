//! Tests for tools and the resilient invocation wrapper.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Deserialize;
use serde_json::{json, Value};

use agent_relay::error::RelayError;
use agent_relay::tools::{AgentTool, ResilientTool, Tool, ToolArguments, ToolExecutionContext};
use agent_relay::util::retry::RetryPolicy;

fn quick_policy(max_retries: u32) -> RetryPolicy {
    RetryPolicy {
        max_retries,
        initial_delay: Duration::from_millis(1),
        backoff_factor: 1.0,
        timeout: None,
    }
}

/// A tool that fails with a transient error `failures` times and records the
/// arguments of every call.
fn flaky_tool(failures: usize, calls: Arc<AtomicUsize>, seen: Arc<Mutex<Vec<Value>>>) -> Arc<dyn Tool> {
    Arc::new(AgentTool::new("search", "Search the index", move |args, _ctx| {
        let calls = calls.clone();
        let seen = seen.clone();
        async move {
            seen.lock().unwrap().push(args.raw().clone());
            if calls.fetch_add(1, Ordering::SeqCst) < failures {
                Err(RelayError::transient("index busy"))
            } else {
                Ok(json!({"hits": 1}))
            }
        }
    }))
}

#[tokio::test]
async fn agent_tool_executes_handler() {
    let tool = AgentTool::new("echo", "Echo back", |args, _ctx| async move {
        Ok::<_, RelayError>(json!({"echo": args.get_str("text")?}))
    })
    .with_parameters(json!({"type": "object", "properties": {"text": {"type": "string"}}}));

    let result = tool
        .execute(&ToolArguments::new(json!({"text": "hi"})), &ToolExecutionContext::default())
        .await
        .unwrap();

    assert_eq!(result, json!({"echo": "hi"}));
    assert_eq!(tool.name(), "echo");
    assert_eq!(tool.parameters()["properties"]["text"]["type"], "string");
}

#[tokio::test]
async fn resilient_tool_retries_and_strips_plan_keys() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::new(Mutex::new(Vec::new()));
    let tool = ResilientTool::new(flaky_tool(2, calls.clone(), seen.clone()), quick_policy(0));

    let args = ToolArguments::new(json!({"q": "rust", "max_retries": 3, "backoff_seconds": 0.001}));
    let result = tool.execute(&args, &ToolExecutionContext::default()).await.unwrap();

    assert_eq!(result, json!({"hits": 1}));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
    assert!(seen.lock().unwrap().iter().all(|args| *args == json!({"q": "rust"})));
    assert_eq!(tool.policy().max_retries, 0);
}

#[tokio::test]
async fn resilient_tool_uses_default_policy_without_plan() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::new(Mutex::new(Vec::new()));
    let tool = ResilientTool::new(flaky_tool(10, calls.clone(), seen), quick_policy(1));

    let result = tool
        .execute(&ToolArguments::new(json!({"q": "rust"})), &ToolExecutionContext::default())
        .await;

    assert!(matches!(result, Err(RelayError::Transient(_))));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn plan_retries_are_clamped_to_five() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::new(Mutex::new(Vec::new()));
    let tool = ResilientTool::new(flaky_tool(100, calls.clone(), seen), quick_policy(0));

    let args = ToolArguments::new(json!({"q": "x", "max_retries": 50, "backoff_seconds": 0}));
    let result = tool.execute(&args, &ToolExecutionContext::default()).await;

    assert!(result.is_err());
    assert_eq!(calls.load(Ordering::SeqCst), 6);
}

#[tokio::test]
async fn custom_retry_predicate_replaces_default_set() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let inner: Arc<dyn Tool> = Arc::new(AgentTool::new("fetch", "Fetch a page", move |_args, _ctx| {
        let counter = counter.clone();
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
            Err::<Value, _>(RelayError::tool("fetch", "503"))
        }
    }));
    let tool = ResilientTool::new(inner, quick_policy(2))
        .retry_on(|err| matches!(err, RelayError::ToolExecution { .. }));

    let result = tool
        .execute(&ToolArguments::new(json!({})), &ToolExecutionContext::default())
        .await;

    assert!(matches!(result, Err(RelayError::ToolExecution { .. })));
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn plan_timeout_bounds_each_attempt() {
    let inner: Arc<dyn Tool> = Arc::new(AgentTool::new("slow", "Never finishes", |_args, _ctx| async {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok::<_, RelayError>(json!(null))
    }));
    let tool = ResilientTool::new(inner, quick_policy(0));

    let result = tool
        .execute(
            &ToolArguments::new(json!({"timeout_seconds": 2})),
            &ToolExecutionContext::default(),
        )
        .await;

    match result {
        Err(RelayError::Timeout(ms)) => assert_eq!(ms, 2000),
        other => panic!("expected timeout, got {other:?}"),
    }
}

#[test]
fn wrap_all_keeps_tool_identity() {
    let tools: Vec<Arc<dyn Tool>> = vec![
        Arc::new(AgentTool::new("a", "first", |_args, _ctx| async { Ok::<_, RelayError>(json!(1)) })),
        Arc::new(AgentTool::new("b", "second", |_args, _ctx| async { Ok::<_, RelayError>(json!(2)) })),
    ];

    let wrapped = ResilientTool::wrap_all(tools, &RetryPolicy::default());

    let names: Vec<&str> = wrapped.iter().map(|t| t.name()).collect();
    assert_eq!(names, vec!["a", "b"]);
    assert_eq!(wrapped[1].description(), "second");
}

#[test]
fn arguments_deserialize_from_string_payloads() {
    #[derive(Debug, Deserialize, PartialEq)]
    struct Query {
        q: String,
        #[serde(default)]
        limit: Option<u32>,
    }

    let parsed: Query = ToolArguments::new(json!("{\"q\": \"ai\", \"limit\": 3}")).deserialize().unwrap();
    assert_eq!(parsed, Query { q: "ai".to_string(), limit: Some(3) });

    let args = ToolArguments::new(json!({"q": "x", "n": 4}));
    assert_eq!(args.get_i64("n").unwrap(), 4);
    assert!(args.get_str("missing").is_err());
    assert_eq!(args.get_str_opt("q"), Some("x"));
}
