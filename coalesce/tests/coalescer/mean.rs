use std::sync::Arc;

use coalesce::{Coalescer, Mean, Sum};
use coalesce_mock::MockBehavior;

use crate::helpers::{MEMBER, SPARSE_MEMBER, fixture_coalescer, member_records, rec, scripted};

#[tokio::test]
async fn mean_truncates_toward_zero() {
    let (c, _) = fixture_coalescer(Coalescer::builder());
    let out = c.coalesce(MEMBER).await.unwrap();
    assert_eq!(out, rec(1066, 11000, 5666));
}

#[tokio::test]
async fn sum_strategy_adds_every_record() {
    let (c, _) = fixture_coalescer(Coalescer::builder());
    let out = c.coalesce_with(MEMBER, &Sum).await.unwrap();
    assert_eq!(out, rec(3200, 33000, 17000));
}

#[tokio::test]
async fn explicit_mean_matches_default() {
    let (c, _) = fixture_coalescer(Coalescer::builder());
    let default = c.coalesce(MEMBER).await.unwrap();
    let explicit = c.coalesce_with(MEMBER, &Mean::new()).await.unwrap();
    assert_eq!(default, explicit);
}

#[tokio::test]
async fn single_provider_returns_its_record() {
    let [first, ..] = member_records();
    let (c, _) = scripted(Coalescer::builder(), vec![MockBehavior::Return(first.clone())]).await;
    assert_eq!(c.coalesce(MEMBER).await.unwrap(), first);
}

#[tokio::test]
async fn numeric_entity_ids_are_accepted() {
    let (c, _) = fixture_coalescer(Coalescer::builder());
    assert_eq!(c.coalesce(1_u64).await.unwrap(), rec(1066, 11000, 5666));
}

#[tokio::test]
async fn strategy_trait_objects_are_accepted() {
    let (c, _) = fixture_coalescer(Coalescer::builder());
    let strategies: Vec<Box<dyn coalesce::Strategy>> = vec![Box::new(Mean::new()), Box::new(Sum)];
    let mut outs = Vec::new();
    for s in &strategies {
        outs.push(c.coalesce_with(MEMBER, s).await.unwrap());
    }
    assert_eq!(outs, vec![rec(1066, 11000, 5666), rec(3200, 33000, 17000)]);
}

#[tokio::test]
async fn shared_and_borrowed_strategies_are_accepted() {
    let (c, _) = fixture_coalescer(Coalescer::builder());
    let shared = Arc::new(Sum);
    let borrowed: &dyn coalesce::Strategy = &Mean::new();

    assert_eq!(
        c.coalesce_with(MEMBER, &shared).await.unwrap(),
        rec(3200, 33000, 17000)
    );
    assert_eq!(
        c.coalesce_with(MEMBER, &borrowed).await.unwrap(),
        rec(1066, 11000, 5666)
    );
}

#[tokio::test]
async fn missing_member_at_one_provider_fails_by_default() {
    // api2.com has no record for member 2; the fixture reports that as a transport error.
    let (c, providers) = fixture_coalescer(Coalescer::builder());
    let err = c.coalesce(SPARSE_MEMBER).await.unwrap_err();
    assert_eq!(err.provider(), Some("api2.com"));
    assert_eq!(providers[2].calls(), 0, "enumeration stops at the failure");
}
