use coalesce::{CoalesceError, Coalescer, FailurePolicy, Sum};
use coalesce_mock::MockBehavior;

use crate::helpers::{MEMBER, calls, capture_logs, member_records, rec, scripted};

fn second_fails(err: CoalesceError) -> Vec<MockBehavior> {
    let [r1, _, r3] = member_records();
    vec![
        MockBehavior::Return(r1),
        MockBehavior::Fail(err),
        MockBehavior::Return(r3),
    ]
}

#[tokio::test]
async fn missing_entity_is_rejected_before_any_call() {
    let (c, ctl) = scripted(
        Coalescer::builder(),
        member_records().into_iter().map(MockBehavior::Return).collect(),
    )
    .await;

    for err in [
        c.coalesce(None::<&str>).await.unwrap_err(),
        c.coalesce("").await.unwrap_err(),
        c.coalesce("   ").await.unwrap_err(),
        c.coalesce_with(None::<String>, &Sum).await.unwrap_err(),
    ] {
        assert!(matches!(err, CoalesceError::InvalidArgument(_)), "{err:?}");
    }
    assert!(c.records(None::<&str>).is_err());
    assert_eq!(calls(&ctl).await, vec![0, 0, 0]);
}

#[tokio::test]
async fn failure_propagates_and_stops_enumeration() {
    let (c, ctl) = scripted(
        Coalescer::builder(),
        second_fails(CoalesceError::transport("api2.com", "status 503")),
    )
    .await;

    let err = c.coalesce_with(MEMBER, &Sum).await.unwrap_err();

    assert_eq!(err, CoalesceError::transport("api2.com", "status 503"));
    assert_eq!(calls(&ctl).await, vec![1, 1, 0]);
}

#[tokio::test]
async fn untagged_failures_are_attributed_to_their_provider() {
    let (c, _) = scripted(
        Coalescer::builder(),
        second_fails(CoalesceError::Other("boom".into())),
    )
    .await;

    let err = c.coalesce(MEMBER).await.unwrap_err();
    assert_eq!(err.provider(), Some("api2.com"));
    assert!(err.to_string().contains("boom"), "{err}");
}

#[tokio::test]
async fn validation_errors_from_providers_are_attributed_to_them() {
    let (c, _) = scripted(
        Coalescer::builder(),
        second_fails(CoalesceError::invalid_argument(
            "upstream rejected member id format",
        )),
    )
    .await;

    let err = c.coalesce(MEMBER).await.unwrap_err();

    assert!(matches!(err, CoalesceError::Transport { .. }), "{err:?}");
    assert_eq!(err.provider(), Some("api2.com"));
    assert!(err.to_string().contains("upstream rejected member id format"));
}

#[tokio::test]
async fn skip_policy_drops_the_failure_and_warns() {
    let (logs, _guard) = capture_logs();
    let (c, ctl) = scripted(
        Coalescer::builder().failure_policy(FailurePolicy::Skip),
        second_fails(CoalesceError::data("api2.com", "invalid JSON")),
    )
    .await;

    let out = c.coalesce(MEMBER).await.unwrap();

    assert_eq!(out, rec(1000, 10000, 5500));
    assert_eq!(calls(&ctl).await, vec![1, 1, 1]);
    let out = logs.contents();
    let warned = out
        .lines()
        .find(|l| l.contains("WARN"))
        .unwrap_or_else(|| panic!("no warning in: {out}"));
    assert!(warned.contains("api2.com"));
    assert!(!out.contains("ERROR"));
}

#[tokio::test]
async fn strategy_errors_surface_unchanged() {
    let (c, _) = scripted(
        Coalescer::builder().failure_policy(FailurePolicy::Skip),
        vec![MockBehavior::Fail(CoalesceError::transport("api1.com", "down"))],
    )
    .await;

    let err = c.coalesce(MEMBER).await.unwrap_err();
    assert_eq!(
        err,
        CoalesceError::invalid_input("mean requires at least one record")
    );
}
