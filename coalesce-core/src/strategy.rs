use std::sync::Arc;

use async_trait::async_trait;
use futures::StreamExt;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::{AggregateRecord, CoalesceError, Record, RecordStream};

/// Reduction from a sequence of records to one aggregate record.
///
/// Strategies must not assume how many records arrive: any provider may have been
/// skipped, so the stream holds between zero and the number of providers.
#[async_trait]
pub trait Strategy: Send + Sync {
    /// Short label used in tracing spans.
    fn name(&self) -> &'static str {
        "custom"
    }

    /// Consume `records` and produce the aggregate.
    async fn reduce(&self, records: RecordStream) -> Result<AggregateRecord, CoalesceError>;
}

#[async_trait]
impl<S: Strategy + ?Sized> Strategy for &S {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    async fn reduce(&self, records: RecordStream) -> Result<AggregateRecord, CoalesceError> {
        (**self).reduce(records).await
    }
}

#[async_trait]
impl<S: Strategy + ?Sized> Strategy for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    async fn reduce(&self, records: RecordStream) -> Result<AggregateRecord, CoalesceError> {
        (**self).reduce(records).await
    }
}

#[async_trait]
impl<S: Strategy + ?Sized> Strategy for Arc<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    async fn reduce(&self, records: RecordStream) -> Result<AggregateRecord, CoalesceError> {
        (**self).reduce(records).await
    }
}

/// Running record count and per-field sums.
///
/// Fields are summed independently; a field missing from a record simply does not
/// receive a contribution from it, while the record still counts once.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    count: usize,
    sums: AggregateRecord,
}

impl Tally {
    /// Empty tally.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count `record` once and add each of its fields to the running sums.
    ///
    /// # Errors
    /// Returns `InvalidInput` if a field sum leaves the `Decimal` range.
    pub fn add(&mut self, record: Record) -> Result<(), CoalesceError> {
        self.count += 1;
        for (field, value) in record {
            let sum = self.sums.entry(field).or_insert(Decimal::ZERO);
            *sum = sum.checked_add(value).ok_or_else(|| {
                CoalesceError::invalid_input("field sum exceeds the representable range")
            })?;
        }
        Ok(())
    }

    /// Drain `records` into a fresh tally.
    ///
    /// # Errors
    /// Propagates overflow from [`add`](Self::add).
    pub async fn collect(mut records: RecordStream) -> Result<Self, CoalesceError> {
        let mut tally = Self::new();
        while let Some(record) = records.next().await {
            tally.add(record)?;
        }
        Ok(tally)
    }

    /// Number of records counted.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.count
    }

    /// True when no record has been counted.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Per-field running sums.
    #[must_use]
    pub const fn sums(&self) -> &AggregateRecord {
        &self.sums
    }

    /// Take the per-field sums.
    #[must_use]
    pub fn into_sums(self) -> AggregateRecord {
        self.sums
    }

    fn require_records(self, strategy: &str) -> Result<Self, CoalesceError> {
        if self.is_empty() {
            return Err(CoalesceError::invalid_input(format!(
                "{strategy} requires at least one record"
            )));
        }
        Ok(self)
    }
}

/// Field-wise arithmetic mean, the default strategy.
///
/// Every field sum is divided by the total number of records, including records
/// that lack the field. Quotients are truncated toward zero to `scale` decimal
/// places; the default scale of 0 gives integer-truncating division.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Mean {
    scale: u32,
}

impl Mean {
    /// Mean truncated to whole units.
    #[must_use]
    pub const fn new() -> Self {
        Self { scale: 0 }
    }

    /// Mean truncated to `scale` decimal places.
    #[must_use]
    pub const fn with_scale(scale: u32) -> Self {
        Self { scale }
    }

    /// Decimal places kept in each quotient.
    #[must_use]
    pub const fn scale(&self) -> u32 {
        self.scale
    }
}

#[async_trait]
impl Strategy for Mean {
    fn name(&self) -> &'static str {
        "mean"
    }

    async fn reduce(&self, records: RecordStream) -> Result<AggregateRecord, CoalesceError> {
        let tally = Tally::collect(records).await?.require_records("mean")?;
        let n = Decimal::from(tally.count());
        Ok(tally
            .into_sums()
            .into_iter()
            .map(|(field, sum)| (field, truncated_quotient(sum, n, self.scale)))
            .collect())
    }
}

/// `sum / n` truncated toward zero at `scale` places, without the 28-digit
/// rounding `Decimal` division applies to the full quotient.
fn truncated_quotient(sum: Decimal, n: Decimal, scale: u32) -> Decimal {
    let rem = sum % n;
    let whole = (sum - rem) / n;
    if rem.is_zero() {
        return whole;
    }
    // |rem / n| < 1, so the division keeps every digit up to `scale`; it may
    // still round the last kept place up by one step.
    let mut frac = (rem / n).round_dp_with_strategy(scale, RoundingStrategy::ToZero);
    if (frac * n).abs() > rem.abs() {
        let step = Decimal::new(1, scale.min(28));
        if rem.is_sign_negative() {
            frac += step;
        } else {
            frac -= step;
        }
    }
    whole + frac
}

/// Field-wise sum.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sum;

#[async_trait]
impl Strategy for Sum {
    fn name(&self) -> &'static str {
        "sum"
    }

    async fn reduce(&self, records: RecordStream) -> Result<AggregateRecord, CoalesceError> {
        Ok(Tally::collect(records)
            .await?
            .require_records("sum")?
            .into_sums())
    }
}
