//! Tests for best-effort notification delivery.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::json;

use agent_relay::error::RelayError;
use agent_relay::notify::{emit_message, emit_status, Notification, Sink};
use agent_relay::types::Role;

#[tokio::test]
async fn missing_sink_is_a_no_op() {
    emit_status(None, "working", false, false).await;
    emit_message(None, "hello", Role::Assistant, None).await;
}

#[tokio::test]
async fn immediate_sink_receives_status_payload() {
    let received = Arc::new(Mutex::new(Vec::new()));
    let store = received.clone();
    let sink = Sink::immediate(move |notification| {
        store.lock().unwrap().push(notification);
        Ok(())
    });

    emit_status(Some(&sink), "tool: search | receiving arguments...", false, true).await;

    let received = received.lock().unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(
        serde_json::to_value(&received[0]).unwrap(),
        json!({
            "type": "status",
            "data": {"description": "tool: search | receiving arguments...", "done": false, "hidden": true}
        })
    );
}

#[tokio::test]
async fn suspending_sink_is_awaited() {
    let received = Arc::new(Mutex::new(Vec::new()));
    let store = received.clone();
    let sink = Sink::suspending(move |notification| {
        let store = store.clone();
        async move {
            tokio::task::yield_now().await;
            store.lock().unwrap().push(notification);
            Ok(())
        }
    });

    emit_message(Some(&sink), "done", Role::Assistant, Some(json!({"step": 2}))).await;

    let received = received.lock().unwrap();
    match &received[..] {
        [Notification::Message(message)] => {
            assert_eq!(message.role, Role::Assistant);
            assert_eq!(message.content, "done");
            assert_eq!(message.meta, json!({"step": 2}));
        }
        other => panic!("expected one message notification, got {other:?}"),
    }
}

#[tokio::test]
async fn failing_sinks_never_escape() {
    let calls = Arc::new(AtomicUsize::new(0));

    let counter = calls.clone();
    let erroring = Sink::immediate(move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        Err(RelayError::Sink("boom".to_string()))
    });
    let panicking = Sink::immediate(|_| panic!("sink exploded"));
    let async_failing = Sink::suspending(|_| async { Err::<(), _>(RelayError::Sink("later".to_string())) });

    for sink in [&erroring, &panicking, &async_failing] {
        emit_status(Some(sink), "x", true, false).await;
        emit_message(Some(sink), "y", Role::User, None).await;
    }

    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn deliver_reports_panics_as_sink_errors() {
    let sink = Sink::suspending(|_| async {
        if true {
            panic!("inside future");
        }
        Ok::<(), RelayError>(())
    });

    let result = sink
        .deliver(Notification::Status(agent_relay::notify::StatusNotification {
            description: "x".to_string(),
            done: false,
            hidden: false,
        }))
        .await;

    assert!(matches!(result, Err(RelayError::Sink(_))));
}
