use std::sync::Arc;
use std::time::Duration;

use coalesce::{
    CoalesceConfig, CoalesceError, Coalescer, DEFAULT_PROVIDER_TIMEOUT, EndpointTemplate,
    FailurePolicy,
};
use coalesce_mock::MockProvider;

use crate::helpers::names;

#[test]
fn build_without_providers_is_rejected() {
    let err = Coalescer::builder().build().err().unwrap();
    assert!(matches!(err, CoalesceError::InvalidArgument(_)));
}

#[test]
fn zero_timeout_is_rejected() {
    let err = Coalescer::builder()
        .with_provider(Arc::new(MockProvider::new("api1.com")))
        .provider_timeout(Duration::ZERO)
        .build()
        .err()
        .unwrap();
    assert!(matches!(err, CoalesceError::InvalidArgument(_)));
}

#[test]
fn defaults_are_sixty_seconds_and_propagate() {
    let c = Coalescer::builder()
        .with_provider(Arc::new(MockProvider::new("api1.com")))
        .build()
        .unwrap();
    assert_eq!(c.provider_timeout(), DEFAULT_PROVIDER_TIMEOUT);
    assert_eq!(c.provider_timeout(), Duration::from_secs(60));
    assert_eq!(c.failure_policy(), FailurePolicy::Propagate);
}

#[test]
fn registration_order_is_preserved_across_kinds() {
    let c = Coalescer::builder()
        .with_provider(Arc::new(MockProvider::new("first")))
        .with_endpoint(EndpointTemplate::parse("https://second.example?member_id={}").unwrap())
        .with_provider(Arc::new(MockProvider::new("third")))
        .with_endpoint(EndpointTemplate::parse("https://fourth.example/m/{}").unwrap())
        .build()
        .unwrap();
    assert_eq!(
        names(c.providers()),
        vec!["first", "second.example", "third", "fourth.example"]
    );
}

#[test]
fn duplicate_registrations_are_kept() {
    let p = Arc::new(MockProvider::new("api1.com"));
    let c = Coalescer::builder()
        .with_provider(p.clone())
        .with_provider(p)
        .build()
        .unwrap();
    assert_eq!(c.providers().len(), 2);
}

#[tokio::test]
async fn default_config_targets_the_three_member_apis() {
    let c = Coalescer::from_config(CoalesceConfig::default()).unwrap();
    assert_eq!(
        names(c.providers()),
        vec!["api1.com", "api2.com", "api3.com"]
    );
    let urls: Vec<_> = c
        .providers()
        .iter()
        .map(|p| p.locate(&crate::helpers::id("7")).unwrap())
        .collect();
    assert_eq!(
        urls,
        vec![
            "https://api1.com?member_id=7",
            "https://api2.com?member_id=7",
            "https://api3.com?member_id=7",
        ]
    );
}

#[tokio::test]
async fn config_sets_timeout_and_policy() {
    let cfg = CoalesceConfig::from_json_str(
        r#"{
            "endpoints": ["https://a.example?member_id={}"],
            "provider_timeout_ms": 1500,
            "failure_policy": "skip"
        }"#,
    )
    .unwrap();
    let c = Coalescer::from_config(cfg).unwrap();
    assert_eq!(c.provider_timeout(), Duration::from_millis(1500));
    assert_eq!(c.failure_policy(), FailurePolicy::Skip);
    assert_eq!(names(c.providers()), vec!["a.example"]);
}

#[test]
fn config_without_endpoints_is_rejected() {
    let cfg = CoalesceConfig {
        endpoints: vec![],
        ..CoalesceConfig::default()
    };
    let err = Coalescer::from_config(cfg).err().unwrap();
    assert!(matches!(err, CoalesceError::InvalidArgument(_)));
}
