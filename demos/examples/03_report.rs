use std::time::Duration;

use coalesce::{FailurePolicy, Mean};
use coalesce_demos::common::providers;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Skip failing providers instead of aborting, and give each one five seconds.
    let coalescer = providers()
        .failure_policy(FailurePolicy::Skip)
        .provider_timeout(Duration::from_secs(5))
        .build()?;

    // Member 2 has no record at the second provider, so it is skipped with a warning.
    let report = coalescer
        .coalesce_report("2", &Mean::with_scale(2))
        .await?;

    println!("entity:       {}", report.entity);
    println!("contributors: {}", report.contributors.join(", "));
    for w in &report.warnings {
        println!("skipped:      {w}");
    }
    println!("aggregate:    {:?}", report.aggregate);

    Ok(())
}
