//! Exception capture: filtering, de-duplication, sampling and fingerprinting

use faultgate_core::config::SampledErrorConfig;
use faultgate_core::domain::{CaptureOptions, ReportedError, Severity};

use crate::common::{enabled_init, live_gateway};

fn init_with_sampled(pattern: &str, rate: f64) -> faultgate_core::config::ReportingInit {
    let mut init = enabled_init();
    init.sampled_errors.push(SampledErrorConfig {
        pattern: pattern.to_string(),
        rate,
    });
    init
}

#[tokio::test]
async fn test_missing_error_is_ignored() {
    let (gateway, backend) = live_gateway(enabled_init(), &[]).await;

    gateway.capture_exception(None, &CaptureOptions::audit("a11y")).await;

    assert!(backend.client.exceptions().is_empty());
}

#[tokio::test]
async fn test_expected_error_is_never_forwarded() {
    let (gateway, backend) = live_gateway(enabled_init(), &[]).await;
    let error = ReportedError::new("page refused to load")
        .with_protocol("Page.navigate", "net::ERR_NAME_NOT_RESOLVED")
        .expected();

    gateway.capture_exception(Some(&error), &CaptureOptions::new()).await;
    gateway
        .capture_exception(Some(&error), &CaptureOptions::audit("a11y"))
        .await;

    assert!(backend.client.exceptions().is_empty());
}

#[tokio::test]
async fn test_expected_error_does_not_consume_dedup_key() {
    let (gateway, backend) = live_gateway(enabled_init(), &[]).await;
    let options = CaptureOptions::audit("a11y");

    gateway
        .capture_exception(Some(&ReportedError::new("boom").expected()), &options)
        .await;
    gateway
        .capture_exception(Some(&ReportedError::new("boom")), &options)
        .await;

    assert_eq!(backend.client.exceptions().len(), 1);
}

#[tokio::test]
async fn test_audit_duplicate_reported_once() {
    let (gateway, backend) = live_gateway(enabled_init(), &[]).await;
    let error = ReportedError::new("Cannot read property 'x' of undefined");
    let options = CaptureOptions::audit("a11y");

    gateway.capture_exception(Some(&error), &options).await;
    gateway.capture_exception(Some(&error), &options).await;

    assert_eq!(backend.client.exceptions().len(), 1);
}

#[tokio::test]
async fn test_dedup_distinguishes_message_and_source() {
    let (gateway, backend) = live_gateway(enabled_init(), &[]).await;

    gateway
        .capture_exception(Some(&ReportedError::new("boom")), &CaptureOptions::audit("a11y"))
        .await;
    gateway
        .capture_exception(Some(&ReportedError::new("bang")), &CaptureOptions::audit("a11y"))
        .await;
    gateway
        .capture_exception(Some(&ReportedError::new("boom")), &CaptureOptions::audit("seo"))
        .await;
    gateway
        .capture_exception(Some(&ReportedError::new("boom")), &CaptureOptions::gatherer("a11y"))
        .await;
    gateway
        .capture_exception(Some(&ReportedError::new("boom")), &CaptureOptions::gatherer("a11y"))
        .await;

    assert_eq!(backend.client.exceptions().len(), 4);
}

#[tokio::test]
async fn test_untagged_errors_are_always_reported() {
    let (gateway, backend) = live_gateway(enabled_init(), &[]).await;
    let error = ReportedError::new("boom");

    gateway.capture_exception(Some(&error), &CaptureOptions::new()).await;
    gateway.capture_exception(Some(&error), &CaptureOptions::new()).await;

    assert_eq!(backend.client.exceptions().len(), 2);
}

#[tokio::test]
async fn test_concurrent_duplicates_report_once() {
    let (gateway, backend) = live_gateway(enabled_init(), &[]).await;
    let error = ReportedError::new("boom");
    let options = CaptureOptions::gatherer("Trace");

    tokio::join!(
        gateway.capture_exception(Some(&error), &options),
        gateway.capture_exception(Some(&error), &options),
    );

    assert_eq!(backend.client.exceptions().len(), 1);
}

#[tokio::test]
async fn test_protocol_method_alone_still_groups_by_method() {
    let (gateway, backend) = live_gateway(enabled_init(), &[]).await;
    let error = ReportedError::new("Protocol error").with_protocol_method("Network.enable");

    gateway.capture_exception(Some(&error), &CaptureOptions::new()).await;

    let exceptions = backend.client.exceptions();
    assert_eq!(exceptions.len(), 1);
    let (_, scope) = &exceptions[0];
    assert_eq!(
        scope.fingerprint,
        Some(vec![
            "{{ default }}".to_string(),
            "Network.enable".to_string(),
        ])
    );
    assert_eq!(
        scope.tags.get("protocolMethod").map(String::as_str),
        Some("Network.enable")
    );
}

#[tokio::test]
async fn test_protocol_error_fingerprint_and_tag() {
    let (gateway, backend) = live_gateway(enabled_init(), &[]).await;
    let error = ReportedError::new("Protocol error").with_protocol("Page.navigate", "X");

    gateway.capture_exception(Some(&error), &CaptureOptions::new()).await;

    let exceptions = backend.client.exceptions();
    assert_eq!(exceptions.len(), 1);
    let (_, scope) = &exceptions[0];
    assert_eq!(
        scope.fingerprint,
        Some(vec![
            "{{ default }}".to_string(),
            "Page.navigate".to_string(),
            "X".to_string(),
        ])
    );
    assert_eq!(
        scope.tags.get("protocolMethod").map(String::as_str),
        Some("Page.navigate")
    );
}

#[tokio::test]
async fn test_plain_error_keeps_default_grouping() {
    let (gateway, backend) = live_gateway(enabled_init(), &[]).await;

    gateway
        .capture_exception(Some(&ReportedError::new("boom")), &CaptureOptions::new())
        .await;

    let exceptions = backend.client.exceptions();
    let (_, scope) = &exceptions[0];
    assert!(scope.fingerprint.is_none());
    assert!(!scope.tags.contains_key("protocolMethod"));
}

#[tokio::test]
async fn test_scope_carries_level_tags_and_extras() {
    let (gateway, backend) = live_gateway(enabled_init(), &[]).await;
    let options = CaptureOptions::gatherer("Trace")
        .with_level(Severity::Fatal)
        .with_tag("phase", "load")
        .with_extra("attempt", serde_json::json!(3));
    let error = ReportedError::new("trace buffer overflow").with_kind("TraceError");

    gateway.capture_exception(Some(&error), &options).await;

    let exceptions = backend.client.exceptions();
    let (forwarded, scope) = &exceptions[0];
    assert_eq!(forwarded, &error);
    assert_eq!(scope.level, Some(Severity::Fatal));
    assert_eq!(scope.tags.get("gatherer").map(String::as_str), Some("Trace"));
    assert_eq!(scope.tags.get("phase").map(String::as_str), Some("load"));
    assert_eq!(scope.extra.get("attempt"), Some(&serde_json::json!(3)));
}

#[tokio::test]
async fn test_sampled_pattern_drops_when_draw_exceeds_rate() {
    let (gateway, backend) =
        live_gateway(init_with_sampled("Navigation timed out", 0.01), &[0.5]).await;

    gateway
        .capture_exception(
            Some(&ReportedError::new("Navigation timed out after 30s")),
            &CaptureOptions::new(),
        )
        .await;

    assert!(backend.client.exceptions().is_empty());
}

#[tokio::test]
async fn test_sampled_pattern_reports_when_rate_exceeds_draw() {
    let (gateway, backend) =
        live_gateway(init_with_sampled("Navigation timed out", 0.01), &[0.001]).await;

    gateway
        .capture_exception(
            Some(&ReportedError::new("Navigation timed out after 30s")),
            &CaptureOptions::new(),
        )
        .await;

    assert_eq!(backend.client.exceptions().len(), 1);
}

#[tokio::test]
async fn test_sampled_pattern_draw_equal_to_rate_drops() {
    let (gateway, backend) = live_gateway(init_with_sampled("timed out", 0.25), &[0.25]).await;

    gateway
        .capture_exception(Some(&ReportedError::new("timed out")), &CaptureOptions::new())
        .await;

    assert!(backend.client.exceptions().is_empty());
}

#[tokio::test]
async fn test_unmatched_error_skips_sampling() {
    // A draw of 0.99 would drop a matched error.
    let (gateway, backend) = live_gateway(init_with_sampled("timed out", 0.01), &[0.99]).await;

    gateway
        .capture_exception(Some(&ReportedError::new("disk full")), &CaptureOptions::new())
        .await;

    assert_eq!(backend.client.exceptions().len(), 1);
}

#[tokio::test]
async fn test_sampled_out_error_still_consumes_dedup_key() {
    let (gateway, backend) =
        live_gateway(init_with_sampled("timed out", 0.01), &[0.5, 0.001]).await;
    let error = ReportedError::new("timed out");
    let options = CaptureOptions::audit("perf");

    gateway.capture_exception(Some(&error), &options).await;
    gateway.capture_exception(Some(&error), &options).await;

    assert!(backend.client.exceptions().is_empty());
}
