use async_trait::async_trait;
use coalesce::{AggregateRecord, CoalesceError, RecordStream, Strategy, Sum};
use coalesce_demos::common::coalescer;
use futures::StreamExt;

/// Keeps the highest value seen for every field.
struct Max;

#[async_trait]
impl Strategy for Max {
    fn name(&self) -> &'static str {
        "max"
    }

    async fn reduce(&self, mut records: RecordStream) -> Result<AggregateRecord, CoalesceError> {
        let mut out = AggregateRecord::new();
        let mut seen = false;
        while let Some(record) = records.next().await {
            seen = true;
            for (field, value) in record {
                out.entry(field)
                    .and_modify(|v| *v = (*v).max(value))
                    .or_insert(value);
            }
        }
        if !seen {
            return Err(CoalesceError::invalid_input("max requires at least one record"));
        }
        Ok(out)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let coalescer = coalescer()?;

    // Built-in alternative to the mean.
    let totals = coalescer.coalesce_with("1", &Sum).await?;
    println!("sum: {totals:?}");

    // Any type implementing `Strategy` can be passed in.
    let highest = coalescer.coalesce_with("1", &Max).await?;
    println!("max: {highest:?}");

    Ok(())
}
