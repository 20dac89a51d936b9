mod common;

use std::sync::Arc;

use action_primitives::{ActionError, ActionRequest, Dispatcher, ACTION_NAMES};
use cdp_adapter::{CommandTarget, InputManager};
use common::{RecordingInput, RecordingTransport, ScriptedEval};
use domdriver_core_types::{ExecCtx, RemoteObjectId, Value};
use serde_json::json;

fn dispatcher(input: Arc<RecordingInput>) -> Dispatcher {
    Dispatcher::new(RemoteObjectId::new("root"), input)
}

fn args_for(name: &str) -> Value {
    match name {
        "input" | "type" => json!("hello"),
        "press" => json!(["Enter"]),
        "select" => json!(["a"]),
        _ => Value::Null,
    }
}

#[tokio::test]
async fn valid_selector_routes_to_selector_primitive() {
    for (name, _) in ACTION_NAMES {
        let input = Arc::new(RecordingInput::default());
        let request = ActionRequest::new(*name)
            .with_args(args_for(name))
            .with_option("selector", ".target");

        dispatcher(input.clone())
            .dispatch(&ExecCtx::unbounded(), &request)
            .await
            .unwrap();

        let names = input.names();
        assert_eq!(names.len(), 1, "{name}: {names:?}");
        assert!(
            names[0].ends_with("(css:.target)"),
            "{name} should use the selector variant, got {}",
            names[0]
        );
    }
}

#[tokio::test]
async fn missing_or_blank_selector_routes_to_element_primitive() {
    for selector in [None, Some(""), Some("   ")] {
        for (name, _) in ACTION_NAMES {
            let input = Arc::new(RecordingInput::default());
            let mut request = ActionRequest::new(*name).with_args(args_for(name));
            if let Some(sel) = selector {
                request = request.with_option("selector", sel);
            }

            dispatcher(input.clone())
                .dispatch(&ExecCtx::unbounded(), &request)
                .await
                .unwrap();

            let names = input.names();
            assert_eq!(names.len(), 1);
            assert!(!names[0].contains('('), "{name} used {}", names[0]);
        }
    }
}

#[tokio::test]
async fn unknown_action_touches_no_gateway() {
    let input = Arc::new(RecordingInput::default());
    let request = ActionRequest::new("teleport").with_option("selector", ".x");

    let err = dispatcher(input.clone())
        .dispatch(&ExecCtx::unbounded(), &request)
        .await
        .unwrap_err();

    assert_eq!(err, ActionError::InvalidOperation("teleport".into()));
    assert_eq!(err.to_string(), "invalid operation: teleport");
    assert!(input.calls().is_empty());
}

#[tokio::test]
async fn count_and_delay_defaults() {
    let input = Arc::new(RecordingInput::default());
    let d = dispatcher(input.clone());
    let ctx = ExecCtx::unbounded();

    d.dispatch(&ctx, &ActionRequest::new("click")).await.unwrap();
    d.dispatch(&ctx, &ActionRequest::new("input").with_args("abc"))
        .await
        .unwrap();
    d.dispatch(&ctx, &ActionRequest::new("click").with_option("count", 3))
        .await
        .unwrap();
    d.dispatch(
        &ctx,
        &ActionRequest::new("type")
            .with_args("abc")
            .with_option("delay", 80),
    )
    .await
    .unwrap();

    let calls = input.calls();
    assert_eq!(calls[0].1, json!({ "count": 1 }));
    assert_eq!(
        calls[1].1,
        json!({ "text": "abc", "clear": false, "delay_ms": 25 })
    );
    assert_eq!(calls[2].1, json!({ "count": 3 }));
    assert_eq!(calls[3].1["delay_ms"], json!(80));
}

#[tokio::test]
async fn select_returns_applied_values() {
    let input = Arc::new(RecordingInput::selecting(&["b"]));
    let value = dispatcher(input.clone())
        .dispatch(
            &ExecCtx::unbounded(),
            &ActionRequest::new("select").with_args(json!(["a", "b"])),
        )
        .await
        .unwrap();
    assert_eq!(value, json!(["b"]));
    assert_eq!(input.calls()[0].1, json!(["a", "b"]));
}

#[tokio::test]
async fn non_select_primitives_return_null() {
    for name in ["click", "clear", "scroll", "focus", "blur", "hover"] {
        let input = Arc::new(RecordingInput::default());
        let value = dispatcher(input)
            .dispatch(&ExecCtx::unbounded(), &ActionRequest::new(name))
            .await
            .unwrap();
        assert_eq!(value, Value::Null, "{name}");
    }
}

#[tokio::test]
async fn scroll_without_selector_moves_the_window() {
    let input = Arc::new(RecordingInput::default());
    dispatcher(input.clone())
        .dispatch(
            &ExecCtx::unbounded(),
            &ActionRequest::new("scroll")
                .with_option("top", 300)
                .with_option("behavior", "smooth")
                .with_option("block", "start"),
        )
        .await
        .unwrap();

    let calls = input.calls();
    assert_eq!(calls[0].0, "scroll_by");
    assert_eq!(
        calls[0].1,
        json!({ "top": 300.0, "left": 0.0, "behavior": "smooth", "block": "start" })
    );
}

#[tokio::test]
async fn unknown_scroll_behavior_still_scrolls() {
    let input = Arc::new(RecordingInput::default());
    let value = dispatcher(input.clone())
        .dispatch(
            &ExecCtx::unbounded(),
            &ActionRequest::new("scroll")
                .with_option("top", 10)
                .with_option("behavior", "teleport"),
        )
        .await
        .unwrap();
    assert_eq!(value, Value::Null);

    let calls = input.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "scroll_by");
    assert_eq!(calls[0].1["top"], json!(10.0));
    assert_eq!(calls[0].1["behavior"], "auto");
}

#[tokio::test]
async fn malformed_args_fail_before_the_gateway() {
    let input = Arc::new(RecordingInput::default());
    let err = dispatcher(input.clone())
        .dispatch(
            &ExecCtx::unbounded(),
            &ActionRequest::new("input").with_args(json!({ "text": "x" })),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ActionError::TypeCoercion(_)));

    let err = dispatcher(input.clone())
        .dispatch(
            &ExecCtx::unbounded(),
            &ActionRequest::new("click").with_option("count", "lots"),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ActionError::TypeCoercion(_)));
    assert!(input.calls().is_empty());
}

#[tokio::test]
async fn repeated_clear_and_focus_succeed() {
    let input = Arc::new(RecordingInput::default());
    let d = dispatcher(input.clone());
    let ctx = ExecCtx::unbounded();
    for _ in 0..2 {
        d.dispatch(&ctx, &ActionRequest::new("clear")).await.unwrap();
        d.dispatch(&ctx, &ActionRequest::new("focus")).await.unwrap();
    }
    assert_eq!(input.names(), vec!["clear", "focus", "clear", "focus"]);
}

#[tokio::test]
async fn click_by_selector_end_to_end() {
    let eval = Arc::new(ScriptedEval::constant(json!({ "x": 40.0, "y": 12.0 })));
    let transport = Arc::new(RecordingTransport::default());
    let input = Arc::new(InputManager::new(
        transport.clone(),
        CommandTarget::Session("s-1".into()),
        eval.clone(),
    ));
    let dispatcher = Dispatcher::new(RemoteObjectId::new("root"), input);

    let value = dispatcher
        .dispatch(
            &ExecCtx::unbounded(),
            &ActionRequest::new("click")
                .with_option("selector", ".btn")
                .with_option("count", 2),
        )
        .await
        .unwrap();
    assert_eq!(value, Value::Null);

    let resolved: Vec<&str> = eval.calls().iter().map(|(_, name)| *name).collect();
    assert_eq!(resolved, vec!["get_click_point_by_selector"]);

    let commands = transport.commands().await;
    let presses: Vec<&Value> = commands
        .iter()
        .map(|(_, params)| params)
        .filter(|params| params["type"] == "mousePressed")
        .collect();
    assert_eq!(presses.len(), 2);
    for press in presses {
        assert_eq!(press["x"], json!(40.0));
        assert_eq!(press["y"], json!(12.0));
    }
    let releases = commands
        .iter()
        .filter(|(_, params)| params["type"] == "mouseReleased")
        .count();
    assert_eq!(releases, 2);
}

#[tokio::test]
async fn named_methods_bypass_option_resolution() {
    let input = Arc::new(RecordingInput::default());
    let d = dispatcher(input.clone());
    let ctx = ExecCtx::unbounded();

    d.scroll_top(&ctx, &Default::default()).await.unwrap();
    d.scroll_bottom(&ctx, &Default::default()).await.unwrap();
    d.scroll_into_view(&ctx, &Default::default()).await.unwrap();
    d.move_mouse_by_xy(&ctx, 5.0, 6.0).await.unwrap();

    assert_eq!(
        input.names(),
        vec!["scroll_top", "scroll_bottom", "scroll_into_view", "move_mouse"]
    );
}
