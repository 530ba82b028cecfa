//! Concurrency admission properties: exclusivity, ceilings, and the
//! guarantee that every granted slot is released whatever the handler does.

mod common;

use common::{HarnessBuilder, command};
use gatehouse::testing::{CountingHandler, FailingHandler, GatedHandler, PanickingHandler};
use gatehouse::{CommandRegistry, CommandRegistryBuilder};
use gatehouse_core::{CommandSpec, DynCommandHandler, Notice, ScopeId};
use std::sync::Arc;
use std::time::Duration;

fn registry_with<H: DynCommandHandler>(spec: CommandSpec, handler: H) -> CommandRegistry {
    let mut builder = CommandRegistryBuilder::new();
    builder.register(spec, handler).unwrap();
    builder.build()
}

#[tokio::test]
async fn overlapping_exclusive_runs_never_execute_concurrently() {
    let handler = GatedHandler::new();
    let harness = HarnessBuilder::new()
        .commands(registry_with(
            CommandSpec::builder("sweep", "sweep").build(),
            handler.clone(),
        ))
        .build();

    let dispatcher = Arc::clone(&harness.dispatcher);
    let first = tokio::spawn(async move {
        dispatcher.dispatch(command("sweep", 7, None)).await;
    });
    handler.wait_started().await;

    // Second invocation by the same user while the first is parked.
    harness.dispatcher.dispatch(command("sweep", 7, None)).await;
    assert!(matches!(
        harness.responder.last_notice(),
        Some(Notice::AlreadyRunning)
    ));
    assert_eq!(handler.runs(), 1, "second run must never start");

    handler.open_gate();
    first.await.unwrap();
    assert_eq!(harness.dispatcher.active_runs().occupancy("sweep", None), 0);
}

#[tokio::test]
async fn ceiling_rejects_the_next_overlapping_run_in_scope() {
    let handler = GatedHandler::new();
    let harness = HarnessBuilder::new()
        .commands(registry_with(
            CommandSpec::builder("sweep", "sweep")
                .max_concurrent_per_scope(2)
                .build(),
            handler.clone(),
        ))
        .build();

    let mut running = Vec::new();
    for user in [1, 2] {
        let dispatcher = Arc::clone(&harness.dispatcher);
        running.push(tokio::spawn(async move {
            dispatcher.dispatch(command("sweep", user, Some(40))).await;
        }));
        handler.wait_started().await;
    }

    harness.dispatcher.dispatch(command("sweep", 3, Some(40))).await;
    assert!(matches!(
        harness.responder.last_notice(),
        Some(Notice::TooManyConcurrent { limit: 2 })
    ));
    assert_eq!(handler.runs(), 2);

    // Another scope has its own bucket.
    let dispatcher = Arc::clone(&harness.dispatcher);
    running.push(tokio::spawn(async move {
        dispatcher.dispatch(command("sweep", 3, Some(41))).await;
    }));
    handler.wait_started().await;
    assert_eq!(handler.runs(), 3);

    for _ in 0..3 {
        handler.open_gate();
    }
    for task in running {
        task.await.unwrap();
    }
    let active = harness.dispatcher.active_runs();
    assert_eq!(active.occupancy("sweep", Some(ScopeId(40))), 0);
    assert_eq!(active.occupancy("sweep", Some(ScopeId(41))), 0);
}

#[tokio::test]
async fn slot_is_released_when_the_handler_fails() {
    let harness = HarnessBuilder::new()
        .commands(registry_with(
            CommandSpec::builder("sweep", "sweep")
                .max_concurrent_per_scope(1)
                .build(),
            FailingHandler,
        ))
        .build();

    // Two sequential invocations: if the failed first run leaked its slot,
    // the second would bounce off the ceiling.
    harness.dispatcher.dispatch(command("sweep", 7, Some(40))).await;
    harness.dispatcher.dispatch(command("sweep", 7, Some(40))).await;

    assert_eq!(harness.dispatcher.active_runs().occupancy("sweep", Some(ScopeId(40))), 0);
    // Handler faults are contained silently; no notice reaches the caller.
    assert!(harness.responder.notices().is_empty());
}

#[tokio::test]
async fn slot_is_released_when_the_handler_panics() {
    let harness = HarnessBuilder::new()
        .commands(registry_with(
            CommandSpec::builder("sweep", "sweep")
                .max_concurrent_per_scope(1)
                .build(),
            PanickingHandler,
        ))
        .build();

    harness.dispatcher.dispatch(command("sweep", 7, None)).await;
    harness.dispatcher.dispatch(command("sweep", 7, None)).await;

    assert_eq!(harness.dispatcher.active_runs().occupancy("sweep", None), 0);
    assert!(harness.responder.notices().is_empty());
}

#[tokio::test]
async fn completed_run_is_followed_by_cooldown_not_exclusivity() {
    let handler = GatedHandler::new();
    let harness = HarnessBuilder::new()
        .commands(registry_with(
            CommandSpec::builder("raid", "raid")
                .cooldown(Duration::from_secs(3))
                .max_concurrent_per_scope(1)
                .build(),
            handler.clone(),
        ))
        .build();

    let dispatcher = Arc::clone(&harness.dispatcher);
    let first = tokio::spawn(async move {
        dispatcher.dispatch(command("raid", 7, Some(40))).await;
    });
    handler.wait_started().await;

    // While running: the same caller occupies the only slot, and the answer
    // is the exclusivity rejection, not the ceiling one.
    harness.dispatcher.dispatch(command("raid", 7, Some(40))).await;
    assert!(matches!(
        harness.responder.last_notice(),
        Some(Notice::AlreadyRunning)
    ));

    handler.open_gate();
    first.await.unwrap();

    // Immediately after completion: the cooldown armed at admission is what
    // rejects the retry.
    harness.dispatcher.dispatch(command("raid", 7, Some(40))).await;
    match harness.responder.last_notice() {
        Some(Notice::Cooldown { remaining }) => {
            assert!(remaining > Duration::from_millis(2500));
            assert!(remaining <= Duration::from_secs(3));
        }
        other => panic!("expected a cooldown notice, got {other:?}"),
    }
    assert_eq!(handler.runs(), 1);
}

#[tokio::test]
async fn non_exclusive_command_admits_repeat_runs_by_one_user() {
    let handler = GatedHandler::new();
    let harness = HarnessBuilder::new()
        .commands(registry_with(
            CommandSpec::builder("watch", "watch").allow_multiple_runs().build(),
            handler.clone(),
        ))
        .build();

    let mut running = Vec::new();
    for _ in 0..2 {
        let dispatcher = Arc::clone(&harness.dispatcher);
        running.push(tokio::spawn(async move {
            dispatcher.dispatch(command("watch", 7, None)).await;
        }));
        handler.wait_started().await;
    }
    assert_eq!(handler.runs(), 2);
    assert!(harness.responder.notices().is_empty());

    handler.open_gate();
    handler.open_gate();
    for task in running {
        task.await.unwrap();
    }
    assert_eq!(harness.dispatcher.active_runs().occupancy("watch", None), 0);
}

#[tokio::test]
async fn successful_run_invokes_the_handler_once() {
    let handler = CountingHandler::new();
    let harness = HarnessBuilder::new()
        .commands(registry_with(
            CommandSpec::builder("ping", "ping").build(),
            handler.clone(),
        ))
        .build();

    harness.dispatcher.dispatch(command("ping", 7, None)).await;
    assert_eq!(handler.count(), 1);
    assert!(harness.responder.notices().is_empty());
}
