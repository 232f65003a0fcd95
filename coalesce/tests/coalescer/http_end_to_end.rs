use std::time::Duration;

use coalesce::{CoalesceConfig, Coalescer};
use httpmock::prelude::*;
use serde_json::json;

use crate::helpers::rec;

fn config_for(server: &MockServer, timeout_ms: u64) -> CoalesceConfig {
    let endpoints: Vec<String> = ["/api1", "/api2", "/api3"]
        .iter()
        .map(|p| server.url(format!("{p}?member_id={{}}")))
        .collect();
    CoalesceConfig::from_json_str(
        &json!({ "endpoints": endpoints, "provider_timeout_ms": timeout_ms }).to_string(),
    )
    .unwrap()
}

async fn serve(server: &MockServer, path: &str, body: serde_json::Value, delay: Option<Duration>) {
    server
        .mock_async(|when, then| {
            when.method(GET).path(path).query_param("member_id", "1");
            let then = then.status(200).json_body(body);
            if let Some(d) = delay {
                then.delay(d);
            }
        })
        .await;
}

#[tokio::test]
async fn averages_three_http_endpoints() {
    let server = MockServer::start_async().await;
    serve(&server, "/api1", json!({"deductible": 1000, "stop_loss": 10000, "oop_max": 5000}), None).await;
    serve(&server, "/api2", json!({"deductible": 1200, "stop_loss": 13000, "oop_max": 6000}), None).await;
    serve(&server, "/api3", json!({"deductible": 1000, "stop_loss": 10000, "oop_max": 6000}), None).await;

    let c = Coalescer::from_config(config_for(&server, 5_000)).unwrap();
    let out = c.coalesce("1").await.unwrap();

    assert_eq!(out, rec(1066, 11000, 5666));
}

#[tokio::test]
async fn slow_http_endpoint_is_skipped() {
    let server = MockServer::start_async().await;
    serve(&server, "/api1", json!({"deductible": 1000, "stop_loss": 10000, "oop_max": 5000}), None).await;
    serve(
        &server,
        "/api2",
        json!({"deductible": 1200, "stop_loss": 13000, "oop_max": 6000}),
        Some(Duration::from_secs(3)),
    )
    .await;
    serve(&server, "/api3", json!({"deductible": 1000, "stop_loss": 10000, "oop_max": 6000}), None).await;

    let c = Coalescer::from_config(config_for(&server, 300)).unwrap();
    let report = c
        .coalesce_report("1", &coalesce::Mean::new())
        .await
        .unwrap();

    assert_eq!(report.aggregate, rec(1000, 10000, 5500));
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].is_timeout());
}
