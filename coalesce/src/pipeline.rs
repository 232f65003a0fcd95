use coalesce_core::{
    AggregateRecord, CoalesceError, CoalesceReport, EntityId, IntoEntityId, Mean, Strategy,
};

use crate::Coalescer;

impl Coalescer {
    /// Average every field across the providers' records for `entity`.
    ///
    /// Equivalent to [`coalesce_with`](Self::coalesce_with) with [`Mean::new`]: each
    /// field sum is divided by the number of records that arrived and truncated
    /// toward zero.
    ///
    /// # Errors
    /// - `InvalidArgument` if `entity` is missing or blank.
    /// - `InvalidInput` if no provider produced a record.
    /// - The first non-timeout provider failure under [`FailurePolicy::Propagate`](coalesce_core::FailurePolicy::Propagate).
    pub async fn coalesce(
        &self,
        entity: impl IntoEntityId,
    ) -> Result<AggregateRecord, CoalesceError> {
        self.coalesce_with(entity, &Mean::new()).await
    }

    /// Reduce the providers' records for `entity` with `strategy`.
    ///
    /// # Errors
    /// As [`coalesce`](Self::coalesce), plus any error returned by `strategy`.
    pub async fn coalesce_with<S>(
        &self,
        entity: impl IntoEntityId,
        strategy: &S,
    ) -> Result<AggregateRecord, CoalesceError>
    where
        S: Strategy + ?Sized,
    {
        self.coalesce_report(entity, strategy)
            .await
            .map(|report| report.aggregate)
    }

    /// Like [`coalesce_with`](Self::coalesce_with), but also return which providers
    /// contributed and which problems were skipped over.
    ///
    /// # Errors
    /// As [`coalesce_with`](Self::coalesce_with).
    pub async fn coalesce_report<S>(
        &self,
        entity: impl IntoEntityId,
        strategy: &S,
    ) -> Result<CoalesceReport, CoalesceError>
    where
        S: Strategy + ?Sized,
    {
        let entity = entity.into_entity_id()?;
        self.run(entity, strategy).await
    }

    #[tracing::instrument(
        name = "coalesce::pipeline::run",
        skip(self, entity, strategy),
        fields(
            entity = %entity,
            strategy = strategy.name(),
            providers = self.providers.len(),
        ),
    )]
    async fn run<S>(&self, entity: EntityId, strategy: &S) -> Result<CoalesceReport, CoalesceError>
    where
        S: Strategy + ?Sized,
    {
        let (records, log) = self.enumerate(entity.clone());
        let reduced = strategy.reduce(records).await;
        let summary = log.summary();

        // A propagated provider failure outranks whatever the strategy made of the
        // truncated stream.
        if let Some(fault) = summary.fault {
            return Err(fault);
        }
        let aggregate = reduced?;

        tracing::info!(
            contributors = summary.contributors.len(),
            skipped = summary.warnings.len(),
            "coalesced"
        );
        Ok(CoalesceReport {
            entity,
            aggregate,
            contributors: summary.contributors,
            warnings: summary.warnings,
        })
    }
}
