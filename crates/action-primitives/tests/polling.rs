mod common;

use std::sync::Arc;
use std::time::Duration;

use action_primitives::{ActionError, ConditionObserver, PollOutcome, PollTask};
use cdp_adapter::{templates, AdapterError, AdapterErrorKind};
use common::{transient, ScriptedEval};
use domdriver_core_types::{ExecCtx, Interruption, QuerySelector, RemoteObjectId, WaitEvent};
use serde_json::{json, Value};
use tokio::time::Instant;

const POLL: Duration = Duration::from_millis(100);

fn probe() -> cdp_adapter::Expression {
    templates::wait_for_element(
        &RemoteObjectId::new("root"),
        &QuerySelector::css(".ready"),
        WaitEvent::Exists,
    )
}

fn not_yet(n: usize) -> Vec<Result<Value, AdapterError>> {
    (0..n).map(|_| Ok(Value::Null)).collect()
}

#[tokio::test(start_paused = true)]
async fn succeeds_after_n_plus_one_spaced_evaluations() {
    let mut script = not_yet(3);
    script.push(Ok(json!(true)));
    let eval = Arc::new(ScriptedEval::new(script, Ok(Value::Null)));
    let started = Instant::now();

    let outcome = PollTask::new(eval.clone(), probe())
        .with_polling(POLL)
        .run_outcome(&ExecCtx::with_timeout(Duration::from_secs(5)))
        .await;

    assert_eq!(
        outcome,
        PollOutcome::Satisfied {
            value: json!(true),
            attempts: 4
        }
    );
    let instants: Vec<Instant> = eval.calls().into_iter().map(|(at, _)| at).collect();
    assert_eq!(instants.len(), 4);
    assert_eq!(instants[0], started);
    for pair in instants.windows(2) {
        assert_eq!(pair[1] - pair[0], POLL);
    }
}

#[tokio::test(start_paused = true)]
async fn deadline_before_success_times_out() {
    let mut script = not_yet(5);
    script.push(Ok(json!(true)));
    let eval = Arc::new(ScriptedEval::new(script, Ok(json!(true))));

    let result = PollTask::new(eval.clone(), probe())
        .with_polling(POLL)
        .with_description("presence exists on css:.ready")
        .run(&ExecCtx::with_timeout(Duration::from_millis(250)))
        .await;

    let err = result.unwrap_err();
    assert!(err.is_timeout(), "{err:?}");
    assert!(err.to_string().contains("presence exists on css:.ready"));
    assert_eq!(eval.count(), 3);
}

#[tokio::test(start_paused = true)]
async fn transient_errors_do_not_end_the_loop() {
    let eval = Arc::new(ScriptedEval::new(
        vec![Err(transient()), Err(transient()), Ok(json!("done"))],
        Ok(Value::Null),
    ));

    let value = PollTask::new(eval.clone(), probe())
        .with_polling(POLL)
        .run(&ExecCtx::with_timeout(Duration::from_secs(1)))
        .await
        .unwrap();

    assert_eq!(value, json!("done"));
    assert_eq!(eval.count(), 3);
}

#[tokio::test(start_paused = true)]
async fn false_is_not_satisfied() {
    let eval = Arc::new(ScriptedEval::new(
        vec![Ok(json!(false)), Ok(json!(0))],
        Ok(Value::Null),
    ));
    let outcome = PollTask::new(eval, probe())
        .run_outcome(&ExecCtx::with_timeout(Duration::from_secs(1)))
        .await;
    assert_eq!(
        outcome,
        PollOutcome::Satisfied {
            value: json!(0),
            attempts: 2
        }
    );
}

#[tokio::test(start_paused = true)]
async fn stale_reference_fails_immediately() {
    let stale = AdapterError::new(AdapterErrorKind::TargetInvalid)
        .with_hint("Could not find object with given id");
    let eval = Arc::new(ScriptedEval::new(vec![Err(stale.clone())], Ok(json!(true))));

    let task = PollTask::new(eval.clone(), probe()).with_polling(POLL);
    let outcome = task
        .run_outcome(&ExecCtx::with_timeout(Duration::from_secs(1)))
        .await;
    assert_eq!(
        outcome,
        PollOutcome::Failed {
            error: stale,
            attempts: 1
        }
    );

    let eval = Arc::new(ScriptedEval::new(
        vec![Err(AdapterError::new(AdapterErrorKind::TargetInvalid))],
        Ok(json!(true)),
    ));
    let err = PollTask::new(eval, probe())
        .run(&ExecCtx::with_timeout(Duration::from_secs(1)))
        .await
        .unwrap_err();
    assert!(matches!(err, ActionError::TargetInvalid(_)));
}

#[tokio::test(start_paused = true)]
async fn cancelled_context_evaluates_at_most_once() {
    let eval = Arc::new(ScriptedEval::constant(Value::Null));
    let ctx = ExecCtx::with_timeout(Duration::from_secs(5));
    ctx.cancel_token.cancel();

    let outcome = PollTask::new(eval.clone(), probe()).run_outcome(&ctx).await;

    assert!(matches!(
        outcome,
        PollOutcome::TimedOut {
            cause: Interruption::Cancelled,
            ..
        }
    ));
    assert!(eval.count() <= 1);
}

#[tokio::test(start_paused = true)]
async fn cancellation_interrupts_the_sleep() {
    let eval = Arc::new(ScriptedEval::constant(Value::Null));
    let ctx = ExecCtx::unbounded();
    let token = ctx.cancel_token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(150)).await;
        token.cancel();
    });

    let started = Instant::now();
    let outcome = PollTask::new(eval.clone(), probe())
        .with_polling(POLL)
        .run_outcome(&ctx)
        .await;

    assert_eq!(
        outcome,
        PollOutcome::TimedOut {
            cause: Interruption::Cancelled,
            attempts: 2
        }
    );
    assert_eq!(started.elapsed(), Duration::from_millis(150));
}

#[tokio::test(start_paused = true)]
async fn attribute_wait_that_never_holds_times_out() {
    // `disabled` never goes away, so the NotExists predicate keeps returning null.
    let eval = Arc::new(ScriptedEval::constant(Value::Null));
    let observer = ConditionObserver::new(RemoteObjectId::new("button-1"), eval.clone());
    let started = Instant::now();

    let err = observer
        .wait_for_attribute(
            &ExecCtx::with_timeout(Duration::from_millis(500)),
            "disabled",
            &json!(true),
            WaitEvent::NotExists,
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ActionError::Timeout(_)), "{err:?}");
    let message = err.to_string();
    assert!(message.contains("attribute 'disabled'"), "{message}");
    assert!(message.contains("button-1"), "{message}");
    assert_eq!(started.elapsed(), Duration::from_millis(500));
    assert!(eval
        .calls()
        .iter()
        .all(|(_, name)| *name == "wait_for_attribute"));
}

#[tokio::test(start_paused = true)]
async fn observer_bounds_unbounded_contexts() {
    let eval = Arc::new(ScriptedEval::constant(Value::Null));
    let observer = ConditionObserver::new(RemoteObjectId::new("root"), eval)
        .with_wait_timeout(Duration::from_millis(300));
    let started = Instant::now();

    let err = observer
        .wait_for_element(
            &ExecCtx::unbounded(),
            &QuerySelector::css(".never"),
            WaitEvent::Exists,
        )
        .await
        .unwrap_err();

    assert!(err.is_timeout());
    assert_eq!(started.elapsed(), Duration::from_millis(300));
}

#[tokio::test(start_paused = true)]
async fn observer_compiles_all_variants() {
    let eval = Arc::new(ScriptedEval::constant(json!(true)));
    let observer = ConditionObserver::new(RemoteObjectId::new("list"), eval.clone());
    let ctx = ExecCtx::with_timeout(Duration::from_secs(1));
    let items = QuerySelector::css("li");

    observer
        .wait_for_element_all(&ctx, &items, WaitEvent::NotExists)
        .await
        .unwrap();
    observer
        .wait_for_class_by_selector_all(&ctx, &items, "done", WaitEvent::Exists)
        .await
        .unwrap();
    observer
        .wait_for_style_by_selector(&ctx, &items, "display", &json!("none"), WaitEvent::Exists)
        .await
        .unwrap();
    observer
        .wait_for_presence(&ctx, WaitEvent::Exists)
        .await
        .unwrap();

    let names: Vec<&str> = eval.calls().iter().map(|(_, name)| *name).collect();
    assert_eq!(
        names,
        vec![
            "wait_for_element_all",
            "wait_for_class_by_selector_all",
            "wait_for_style_by_selector",
            "wait_for_connected"
        ]
    );
}
