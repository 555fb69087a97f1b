//! Initialization outcomes and the inert/live contract

use std::sync::Arc;
use std::time::Duration;

use faultgate_core::config::{BackendOptions, SampledErrorConfig};
use faultgate_core::domain::{Breadcrumb, CaptureOptions, ReportedError, Severity};
use faultgate_telemetry::{TelemetryGateway, SAMPLE_RATE, SENTRY_DSN};

use crate::common::{enabled_init, live_gateway, Recorded, RecordingBackend, ScriptedRandom};

async fn exercise_all_operations(gateway: &TelemetryGateway) {
    gateway.capture_message("message", Some(Severity::Error));
    gateway.capture_breadcrumb(Breadcrumb::new("crumb"));
    gateway
        .capture_exception(Some(&ReportedError::new("boom")), &CaptureOptions::new())
        .await;
}

#[tokio::test]
async fn test_calls_before_initialize_are_inert() {
    let backend = Arc::new(RecordingBackend::new());
    let gateway = TelemetryGateway::with_random(backend.clone(), Arc::new(ScriptedRandom::new(&[])));

    exercise_all_operations(&gateway).await;
    assert!(gateway.get_context().is_none());

    gateway.initialize(&enabled_init()).await;
    assert!(gateway.is_live());

    // Only the context publication from initialize reached the client.
    let calls = backend.client.calls();
    assert_eq!(calls.len(), 1);
    assert!(matches!(calls[0], Recorded::Context(_)));
}

#[tokio::test]
async fn test_opt_out_stays_inert() {
    let backend = Arc::new(RecordingBackend::new());
    let gateway = TelemetryGateway::with_random(backend.clone(), Arc::new(ScriptedRandom::new(&[])));

    gateway.initialize(&enabled_init().with_enabled(false)).await;
    exercise_all_operations(&gateway).await;

    assert!(gateway.is_initialized());
    assert!(!gateway.is_live());
    assert!(gateway.get_context().is_none());
    assert!(backend.connects.lock().unwrap().is_empty());
    assert!(backend.client.calls().is_empty());
}

#[tokio::test]
async fn test_sample_miss_stays_inert() {
    let backend = Arc::new(RecordingBackend::new());
    let gateway =
        TelemetryGateway::with_random(backend.clone(), Arc::new(ScriptedRandom::new(&[0.5])));

    gateway.initialize(&enabled_init()).await;
    exercise_all_operations(&gateway).await;

    assert!(!gateway.is_live());
    assert!(backend.connects.lock().unwrap().is_empty());
    assert!(backend.client.calls().is_empty());
}

#[tokio::test]
async fn test_draw_equal_to_rate_is_selected() {
    let backend = Arc::new(RecordingBackend::new());
    let gateway = TelemetryGateway::with_random(
        backend.clone(),
        Arc::new(ScriptedRandom::new(&[SAMPLE_RATE])),
    );

    gateway.initialize(&enabled_init()).await;
    assert!(gateway.is_live());
}

#[tokio::test]
async fn test_should_sample_boundaries() {
    let backend = Arc::new(RecordingBackend::new());
    let gateway = TelemetryGateway::with_random(
        backend,
        Arc::new(ScriptedRandom::new(&[0.0, SAMPLE_RATE, SAMPLE_RATE + 1e-9, 0.999])),
    );

    assert!(gateway.should_sample());
    assert!(gateway.should_sample());
    assert!(!gateway.should_sample());
    assert!(!gateway.should_sample());
}

#[tokio::test]
async fn test_construction_failure_stays_inert() {
    let backend = Arc::new(RecordingBackend::failing());
    let gateway = TelemetryGateway::with_random(backend.clone(), Arc::new(ScriptedRandom::new(&[])));

    gateway.initialize(&enabled_init()).await;
    exercise_all_operations(&gateway).await;

    assert!(gateway.is_initialized());
    assert!(!gateway.is_live());
    assert!(gateway.get_context().is_none());
    assert_eq!(backend.connects.lock().unwrap().len(), 1);
    assert!(backend.client.calls().is_empty());
}

#[tokio::test]
async fn test_invalid_sampled_pattern_stays_inert() {
    let backend = Arc::new(RecordingBackend::new());
    let gateway = TelemetryGateway::with_random(backend.clone(), Arc::new(ScriptedRandom::new(&[])));
    let mut init = enabled_init();
    init.sampled_errors.push(SampledErrorConfig {
        pattern: "(unclosed".to_string(),
        rate: 0.5,
    });

    gateway.initialize(&init).await;

    assert!(!gateway.is_live());
    assert!(backend.connects.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_connect_receives_options_and_fixed_dsn() {
    let mut init = enabled_init();
    init.backend = BackendOptions {
        environment: Some("staging".to_string()),
        release: Some("4.5.6".to_string()),
        server_name: None,
        max_breadcrumbs: 10,
        debug: false,
    };
    let (_gateway, backend) = live_gateway(init.clone(), &[]).await;

    let connects = backend.connects.lock().unwrap();
    assert_eq!(connects.len(), 1);
    assert_eq!(connects[0].0, init.backend);
    assert_eq!(connects[0].1, SENTRY_DSN);
}

#[tokio::test]
async fn test_context_is_same_snapshot_every_call() {
    let init = enabled_init();
    let (gateway, backend) = live_gateway(init.clone(), &[]).await;

    let first = gateway.get_context().expect("context when live");
    let second = gateway.get_context().expect("context when live");
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(*first, init.context());
    assert_eq!(backend.client.calls(), vec![Recorded::Context(init.context())]);
}

#[tokio::test]
async fn test_live_forwards_messages_and_breadcrumbs() {
    let (gateway, backend) = live_gateway(enabled_init(), &[]).await;
    let crumb = Breadcrumb::new("loaded").with_category("navigation");

    gateway.capture_message("hello", None);
    gateway.capture_message("bad", Some(Severity::Error));
    gateway.capture_breadcrumb(crumb.clone());

    let calls = backend.client.calls();
    assert_eq!(
        calls[1..],
        [
            Recorded::Message("hello".to_string(), Severity::Info),
            Recorded::Message("bad".to_string(), Severity::Error),
            Recorded::Breadcrumb(crumb),
        ]
    );
}

#[tokio::test]
async fn test_reinitialize_does_not_rebind() {
    let (gateway, backend) = live_gateway(enabled_init(), &[]).await;

    gateway
        .initialize(&enabled_init().with_enabled(false))
        .await;

    assert!(gateway.is_live());
    assert_eq!(backend.connects.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_concurrent_initialize_connects_once() {
    let backend = Arc::new(RecordingBackend::new());
    let gateway = Arc::new(TelemetryGateway::with_random(
        backend.clone(),
        Arc::new(ScriptedRandom::new(&[])),
    ));
    let init = enabled_init();

    tokio::join!(gateway.initialize(&init), gateway.initialize(&init));

    assert!(gateway.is_live());
    assert_eq!(backend.connects.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_flush_succeeds_in_both_modes() {
    let inert = TelemetryGateway::with_random(
        Arc::new(RecordingBackend::new()),
        Arc::new(ScriptedRandom::new(&[0.9])),
    );
    inert.initialize(&enabled_init()).await;
    assert!(inert.flush(Duration::from_millis(10)).await);

    let (live, _backend) = live_gateway(enabled_init(), &[]).await;
    assert!(live.flush(Duration::from_millis(10)).await);
}
