//! Simulate Position Use Case

use std::sync::Arc;

use crate::application::errors::AnalysisError;
use crate::application::ports::{PositionRepositoryPort, PriceHistoryPort, StrategyCatalogPort};
use crate::domain::shared::{PositionId, StrategyId};
use crate::domain::simulation::{SimulationDriver, SimulationResult};

/// Use case for replaying one strategy on one position.
pub struct SimulatePositionUseCase<P, S, H>
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

impl<P, S, H> SimulatePositionUseCase<P, S, H>
where
    P: PositionRepositoryPort,
    S: StrategyCatalogPort,
    H: PriceHistoryPort,
{
    /// Create a new `SimulatePositionUseCase`.
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
    /// A position without collected history simulates to `no_history`.
    pub async fn execute(
        &self,
        position_id: &PositionId,
        strategy_id: &StrategyId,
    ) -> Result<SimulationResult, AnalysisError> {
        let position = self
            .positions
            .find_by_id(position_id)
            .await?
            .ok_or_else(|| AnalysisError::PositionNotFound {
                position_id: position_id.clone(),
            })?;

        let strategy = self
            .strategies
            .find_by_id(strategy_id)
            .await?
            .ok_or_else(|| AnalysisError::StrategyNotFound {
                strategy_id: strategy_id.clone(),
            })?;

        let history = self
            .history
            .price_history(position_id)
            .await?
            .unwrap_or_default();

        Ok(self.driver.simulate(&strategy, &position.entry, &history)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{
        MockPositionRepositoryPort, MockPriceHistoryPort, MockStrategyCatalogPort, PortError,
    };
    use crate::domain::exit_strategy::{ExitRule, ExitStrategy};
    use crate::domain::position::PositionRecord;
    use crate::domain::shared::Timestamp;
    use crate::domain::simulation::{PositionEntry, PricePoint, SimulationOutcome};
    use rust_decimal_macros::dec;

    fn position() -> PositionRecord {
        PositionRecord::new(
            "pos-1",
            "TOKEN",
            PositionEntry::new(dec!(1), Timestamp::parse("2026-01-01T00:00:00Z").unwrap(), dec!(100)),
        )
    }

    fn strategy() -> ExitStrategy {
        ExitStrategy::builder("tp", "TP")
            .rule(ExitRule::take_profit(dec!(20), dec!(100), 1))
            .build()
            .unwrap()
    }

    fn use_case(
        positions: MockPositionRepositoryPort,
        strategies: MockStrategyCatalogPort,
        history: MockPriceHistoryPort,
    ) -> SimulatePositionUseCase<MockPositionRepositoryPort, MockStrategyCatalogPort, MockPriceHistoryPort>
    {
        SimulatePositionUseCase::new(
            Arc::new(positions),
            Arc::new(strategies),
            Arc::new(history),
            SimulationDriver::new(),
        )
    }

    #[tokio::test]
    async fn simulates_resolved_inputs() {
        let mut positions = MockPositionRepositoryPort::new();
        positions.expect_find_by_id().returning(|_| Ok(Some(position())));
        let mut strategies = MockStrategyCatalogPort::new();
        strategies.expect_find_by_id().returning(|_| Ok(Some(strategy())));
        let mut history = MockPriceHistoryPort::new();
        history.expect_price_history().returning(|_| {
            Ok(Some(vec![PricePoint::new(
                Timestamp::parse("2026-01-01T02:00:00Z").unwrap(),
                dec!(1.25),
            )]))
        });

        let result = use_case(positions, strategies, history)
            .execute(&"pos-1".into(), &"tp".into())
            .await
            .unwrap();

        assert_eq!(result.outcome, SimulationOutcome::Exited);
        assert_eq!(result.final_pnl_pct, dec!(25));
    }

    #[tokio::test]
    async fn missing_history_is_no_history() {
        let mut positions = MockPositionRepositoryPort::new();
        positions.expect_find_by_id().returning(|_| Ok(Some(position())));
        let mut strategies = MockStrategyCatalogPort::new();
        strategies.expect_find_by_id().returning(|_| Ok(Some(strategy())));
        let mut history = MockPriceHistoryPort::new();
        history.expect_price_history().returning(|_| Ok(None));

        let result = use_case(positions, strategies, history)
            .execute(&"pos-1".into(), &"tp".into())
            .await
            .unwrap();

        assert_eq!(result.outcome, SimulationOutcome::NoHistory);
        assert_eq!(result.remaining_pct, dec!(100));
    }

    #[tokio::test]
    async fn unknown_position_is_reported() {
        let mut positions = MockPositionRepositoryPort::new();
        positions.expect_find_by_id().returning(|_| Ok(None));

        let err = use_case(positions, MockStrategyCatalogPort::new(), MockPriceHistoryPort::new())
            .execute(&"pos-404".into(), &"tp".into())
            .await
            .unwrap_err();

        assert_eq!(
            err,
            AnalysisError::PositionNotFound {
                position_id: "pos-404".into()
            }
        );
    }

    #[tokio::test]
    async fn port_failures_propagate() {
        let mut positions = MockPositionRepositoryPort::new();
        positions.expect_find_by_id().returning(|_| Ok(Some(position())));
        let mut strategies = MockStrategyCatalogPort::new();
        strategies.expect_find_by_id().returning(|_| {
            Err(PortError::Unavailable {
                message: "catalog offline".to_string(),
            })
        });

        let err = use_case(positions, strategies, MockPriceHistoryPort::new())
            .execute(&"pos-1".into(), &"tp".into())
            .await
            .unwrap_err();

        assert!(matches!(err, AnalysisError::Port(PortError::Unavailable { .. })));
    }
}
