//! Compare Strategies Use Case

use std::sync::Arc;

use tracing::debug;

use crate::application::errors::AnalysisError;
use crate::application::ports::{PositionRepositoryPort, PriceHistoryPort, StrategyCatalogPort};
use crate::domain::comparison::{Comparator, StrategyComparison};
use crate::domain::exit_strategy::ExitStrategy;
use crate::domain::shared::{PositionId, StrategyId};
use crate::domain::simulation::SimulationDriver;

/// Use case for ranking several strategies on one position.
pub struct CompareStrategiesUseCase<P, S, H>
where
    P: PositionRepositoryPort,
    S: StrategyCatalogPort,
    H: PriceHistoryPort,
{
    positions: Arc<P>,
    strategies: Arc<S>,
    history: Arc<H>,
    driver: SimulationDriver,
}

impl<P, S, H> CompareStrategiesUseCase<P, S, H>
where
    P: PositionRepositoryPort,
    S: StrategyCatalogPort,
    H: PriceHistoryPort,
{
    /// Create a new `CompareStrategiesUseCase`.
    pub const fn new(
        positions: Arc<P>,
        strategies: Arc<S>,
        history: Arc<H>,
        driver: SimulationDriver,
    ) -> Self {
        Self {
            positions,
            strategies,
            history,
            driver,
        }
    }

    /// Execute the use case.
    ///
    /// With no `strategy_ids`, every active strategy is compared.
    pub async fn execute(
        &self,
        position_id: &PositionId,
        strategy_ids: Option<&[StrategyId]>,
    ) -> Result<StrategyComparison, AnalysisError> {
        let position = self
            .positions
            .find_by_id(position_id)
            .await?
            .ok_or_else(|| AnalysisError::PositionNotFound {
                position_id: position_id.clone(),
            })?;

        let strategies = resolve_strategies(self.strategies.as_ref(), strategy_ids).await?;

        let history = self
            .history
            .price_history(position_id)
            .await?
            .unwrap_or_default();

        let results = strategies
            .iter()
            .map(|strategy| self.driver.simulate(strategy, &position.entry, &history))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            position_id = %position_id,
            strategies = results.len(),
            "Compared strategies"
        );

        Ok(Comparator::compare(&position, results))
    }
}

/// Resolve requested strategies, or every active one when none are named.
pub(crate) async fn resolve_strategies<S>(
    catalog: &S,
    strategy_ids: Option<&[StrategyId]>,
) -> Result<Vec<ExitStrategy>, AnalysisError>
where
    S: StrategyCatalogPort + ?Sized,
{
    let strategies = match strategy_ids {
        Some(ids) => {
            let mut found = Vec::with_capacity(ids.len());
            for id in ids {
                let strategy = catalog.find_by_id(id).await?.ok_or_else(|| {
                    AnalysisError::StrategyNotFound {
                        strategy_id: id.clone(),
                    }
                })?;
                found.push(strategy);
            }
            found
        }
        None => catalog.list_active().await?,
    };

    if strategies.is_empty() {
        return Err(AnalysisError::NoStrategies);
    }
    Ok(strategies)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{
        InMemoryPositionRepository, InMemoryPriceHistory, InMemoryStrategyCatalog,
    };
    use crate::domain::exit_strategy::ExitRule;
    use crate::domain::position::PositionRecord;
    use crate::domain::shared::Timestamp;
    use crate::domain::simulation::{PositionEntry, PricePoint};
    use chrono::Duration;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn start() -> Timestamp {
        Timestamp::parse("2026-01-01T00:00:00Z").unwrap()
    }

    fn setup(
        prices: &[Decimal],
    ) -> CompareStrategiesUseCase<InMemoryPositionRepository, InMemoryStrategyCatalog, InMemoryPriceHistory>
    {
        let positions = InMemoryPositionRepository::new();
        let mut record = PositionRecord::new("pos-1", "TOKEN", PositionEntry::new(dec!(1), start(), dec!(100)));
        record.actual_pnl_pct = Some(dec!(5));
        positions.insert(record);

        let catalog = InMemoryStrategyCatalog::new();
        catalog.insert(
            ExitStrategy::builder("quick", "Quick")
                .rule(ExitRule::take_profit(dec!(10), dec!(100), 1))
                .build()
                .unwrap(),
        );
        catalog.insert(
            ExitStrategy::builder("patient", "Patient")
                .rule(ExitRule::take_profit(dec!(40), dec!(100), 1))
                .build()
                .unwrap(),
        );
        catalog.insert(ExitStrategy::builder("off", "Off").inactive().build().unwrap());

        let history = InMemoryPriceHistory::new();
        history.insert(
            "pos-1".into(),
            prices
                .iter()
                .enumerate()
                .map(|(i, p)| {
                    PricePoint::new(
                        Timestamp::new(start().as_datetime() + Duration::hours(i as i64 + 1)),
                        *p,
                    )
                })
                .collect(),
        );

        CompareStrategiesUseCase::new(
            Arc::new(positions),
            Arc::new(catalog),
            Arc::new(history),
            SimulationDriver::new(),
        )
    }

    #[tokio::test]
    async fn compares_active_strategies_by_default() {
        let comparison = setup(&[dec!(1.1), dec!(1.5)])
            .execute(&"pos-1".into(), None)
            .await
            .unwrap();

        assert_eq!(comparison.rankings.len(), 2);
        let best = comparison.best().unwrap();
        assert_eq!(best.result.strategy_id.as_str(), "patient");
        assert_eq!(best.delta_vs_actual_pct, Some(dec!(45)));
    }

    #[tokio::test]
    async fn explicit_ids_include_inactive_strategies() {
        let ids = vec![StrategyId::new("off"), StrategyId::new("quick")];
        let comparison = setup(&[dec!(1.2)])
            .execute(&"pos-1".into(), Some(&ids))
            .await
            .unwrap();

        let order: Vec<&str> = comparison
            .rankings
            .iter()
            .map(|r| r.result.strategy_id.as_str())
            .collect();
        assert_eq!(order, vec!["off", "quick"]);
    }

    #[tokio::test]
    async fn unknown_strategy_is_reported() {
        let ids = vec![StrategyId::new("ghost")];
        let err = setup(&[])
            .execute(&"pos-1".into(), Some(&ids))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            AnalysisError::StrategyNotFound {
                strategy_id: "ghost".into()
            }
        );
    }

    #[tokio::test]
    async fn empty_selection_is_rejected() {
        let err = setup(&[])
            .execute(&"pos-1".into(), Some(&[]))
            .await
            .unwrap_err();
        assert_eq!(err, AnalysisError::NoStrategies);
    }
}
