mod common;

use std::sync::Arc;

use action_primitives::{
    ActionError, ActionRequest, ConditionKind, ConditionTarget, HandleSettings, HtmlElement,
    WaitCondition,
};
use common::{RecordingInput, ScriptedEval};
use domdriver_core_types::{ExecCtx, QuerySelector, RemoteObjectId, WaitEvent};
use serde_json::{json, Value};

fn element(eval: Arc<ScriptedEval>, input: Arc<RecordingInput>) -> HtmlElement {
    HtmlElement::new(
        RemoteObjectId::new("el-1"),
        eval,
        input,
        HandleSettings::default(),
    )
}

#[tokio::test]
async fn node_type_is_read_once() {
    let eval = Arc::new(ScriptedEval::constant(json!(1)));
    let el = element(eval.clone(), Arc::new(RecordingInput::default()));
    let ctx = ExecCtx::unbounded();

    assert_eq!(el.get_node_type(&ctx).await.unwrap(), 1);
    assert_eq!(el.get_node_type(&ctx).await.unwrap(), 1);
    assert_eq!(eval.count(), 1);
}

#[tokio::test]
async fn node_name_is_cached_after_first_success() {
    let eval = Arc::new(ScriptedEval::new(
        vec![Err(common::transient()), Ok(json!("BUTTON"))],
        Ok(json!("DIV")),
    ));
    let el = element(eval.clone(), Arc::new(RecordingInput::default()));
    let ctx = ExecCtx::unbounded();

    let err = el.get_node_name(&ctx).await.unwrap_err();
    assert!(matches!(err, ActionError::Evaluation(_)));
    assert_eq!(el.get_node_name(&ctx).await.unwrap(), "BUTTON");
    assert_eq!(el.get_node_name(&ctx).await.unwrap(), "BUTTON");
    assert_eq!(eval.count(), 2);
}

#[tokio::test]
async fn selector_getters_report_missing_targets() {
    let eval = Arc::new(ScriptedEval::new(
        vec![Ok(Value::Null), Ok(json!(false)), Ok(json!("Hello"))],
        Ok(Value::Null),
    ));
    let el = element(eval, Arc::new(RecordingInput::default()));
    let ctx = ExecCtx::unbounded();
    let missing = QuerySelector::css(".missing");

    let err = el
        .get_inner_text_by_selector(&ctx, &missing)
        .await
        .unwrap_err();
    assert!(matches!(err, ActionError::TargetNotFound(_)));

    let err = el
        .set_inner_html_by_selector(&ctx, &missing, "<b>x</b>")
        .await
        .unwrap_err();
    assert!(matches!(err, ActionError::TargetNotFound(_)));

    let text = el
        .get_inner_text_by_selector(&ctx, &QuerySelector::css("h1"))
        .await
        .unwrap();
    assert_eq!(text, "Hello");
}

#[tokio::test]
async fn collections_are_decoded() {
    let eval = Arc::new(ScriptedEval::new(
        vec![
            Ok(json!({ "id": "save", "disabled": "" })),
            Ok(json!(["one", "two"])),
            Ok(json!(3)),
            Ok(json!(true)),
        ],
        Ok(Value::Null),
    ));
    let el = element(eval, Arc::new(RecordingInput::default()));
    let ctx = ExecCtx::unbounded();
    let items = QuerySelector::css("li");

    let attrs = el.get_attributes(&ctx).await.unwrap();
    assert_eq!(attrs["id"], json!("save"));
    assert_eq!(
        el.get_inner_text_by_selector_all(&ctx, &items).await.unwrap(),
        vec!["one", "two"]
    );
    assert_eq!(el.count_by_selector(&ctx, &items).await.unwrap(), 3);
    assert!(el.exists_by_selector(&ctx, &items).await.unwrap());
}

#[tokio::test]
async fn tree_navigation_adopts_new_handles() {
    let eval = Arc::new(ScriptedEval::constant(Value::Null).with_elements(vec![
        vec![RemoteObjectId::new("li-1"), RemoteObjectId::new("li-2")],
        vec![RemoteObjectId::new("ul-1")],
        vec![],
    ]));
    let el = element(eval, Arc::new(RecordingInput::default()));
    let ctx = ExecCtx::unbounded();

    let children = el.get_child_nodes(&ctx).await.unwrap();
    let ids: Vec<&str> = children.iter().map(|c| c.remote_id().as_str()).collect();
    assert_eq!(ids, vec!["li-1", "li-2"]);

    let parent = el.get_parent_element(&ctx).await.unwrap().unwrap();
    assert_eq!(parent.remote_id().as_str(), "ul-1");
    assert_eq!(parent.dispatcher().id().as_str(), "ul-1");
    assert_eq!(parent.observer().id().as_str(), "ul-1");

    assert!(el.get_next_element_sibling(&ctx).await.unwrap().is_none());
}

#[tokio::test]
async fn handle_forwards_dispatch_and_waits() {
    let eval = Arc::new(ScriptedEval::constant(json!(true)));
    let input = Arc::new(RecordingInput::default());
    let el = element(eval.clone(), input.clone());
    let ctx = ExecCtx::unbounded();

    el.dispatch(
        &ctx,
        &ActionRequest::new("press")
            .with_args("Enter")
            .with_option("count", 2),
    )
    .await
    .unwrap();
    assert_eq!(input.calls()[0], ("press".to_string(), json!({ "keys": ["Enter"], "count": 2 })));

    el.wait_for(
        &ctx,
        &WaitCondition::new(
            ConditionKind::Class {
                name: "open".into(),
            },
            ConditionTarget::Element,
            WaitEvent::Exists,
        ),
    )
    .await
    .unwrap();
    el.wait_for_attribute_by_selector_all(
        &ctx,
        &QuerySelector::css("input"),
        "required",
        &Value::Null,
        WaitEvent::Exists,
    )
    .await
    .unwrap();

    let names: Vec<&str> = eval.calls().iter().map(|(_, name)| *name).collect();
    assert_eq!(
        names,
        vec!["wait_for_class", "wait_for_attribute_by_selector_all"]
    );
}

#[tokio::test]
async fn configured_keyboard_delay_reaches_input() {
    let input = Arc::new(RecordingInput::default());
    let el = HtmlElement::new(
        RemoteObjectId::new("field"),
        Arc::new(ScriptedEval::constant(Value::Null)),
        input.clone(),
        HandleSettings {
            keyboard_delay: std::time::Duration::from_millis(5),
            ..HandleSettings::default()
        },
    );
    el.dispatch(
        &ExecCtx::unbounded(),
        &ActionRequest::new("input").with_args("hi"),
    )
    .await
    .unwrap();
    assert_eq!(input.calls()[0].1["delay_ms"], json!(5));
}
