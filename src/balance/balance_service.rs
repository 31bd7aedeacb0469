use async_trait::async_trait;
use log::error;
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::balance::balance_model::BalanceCandlestick;
use crate::balance::balance_traits::BalanceServiceTrait;
use crate::balance::replay_calculator::{replay, ReplayOutcome};
use crate::errors::Result;
use crate::intervals::{self, IntervalPeriod, EPOCH};
use crate::messages::MessageEmitter;
use crate::saving_goals::SavingGoal;
use crate::store::{LedgerStore, UserId};

/// Read side of the ledger: interval-bucketed balance history and the
/// current-balance helper used by the posting chain. Every call performs a
/// full replay against the latest persisted snapshot; nothing is cached, so
/// reads are always consistent with the most recent write.
pub struct BalanceService<S> {
    store: Arc<S>,
    emitter: MessageEmitter<S>,
}

impl<S: LedgerStore> BalanceService<S> {
    pub fn new(store: Arc<S>) -> Self {
        BalanceService {
            emitter: MessageEmitter::new(store.clone()),
            store,
        }
    }

    /// Runs the replay anchored at the user's latest transaction date.
    fn replay_snapshot(
        &self,
        user: UserId,
        period: IntervalPeriod,
        count: usize,
    ) -> Result<ReplayOutcome> {
        let until = self.store.latest_transaction_date(user)?.unwrap_or(EPOCH);
        let boundaries = intervals::boundaries(period, count, until)?;
        let transactions = self.store.transactions_ascending(user)?;
        let goals = self.store.saving_goals(user)?;
        Ok(replay(&transactions, goals, &boundaries))
    }

    /// Saving goals with their balances derived by replay; the same engine
    /// as the candlestick path, so the two views can never drift apart.
    pub fn replayed_goals(&self, user: UserId) -> Result<Vec<SavingGoal>> {
        Ok(self.replay_snapshot(user, IntervalPeriod::Hour, 1)?.goals)
    }
}

#[async_trait]
impl<S: LedgerStore> BalanceServiceTrait for BalanceService<S> {
    async fn get_balance_history(
        &self,
        user: UserId,
        period: IntervalPeriod,
        count: usize,
    ) -> Result<Vec<BalanceCandlestick>> {
        let outcome = self.replay_snapshot(user, period, count)?;

        // Goal-reached notifications are a side effect of replay. A failure
        // to persist one must not invalidate the already computed history.
        for goal in &outcome.goals {
            if goal.deletion_date.is_none() && goal.is_reached() {
                if let Err(err) = self
                    .emitter
                    .saving_goal_reached(user, goal.id, &goal.name)
                    .await
                {
                    error!(
                        "failed to persist goal-reached message for user {} goal {}: {}",
                        user, goal.id, err
                    );
                }
            }
        }

        Ok(outcome.candlesticks)
    }

    async fn current_balance(&self, user: UserId) -> Result<Decimal> {
        let candlesticks = self
            .get_balance_history(user, IntervalPeriod::Hour, 1)
            .await?;
        Ok(candlesticks
            .last()
            .map(|candle| candle.close)
            .unwrap_or(Decimal::ZERO))
    }
}
