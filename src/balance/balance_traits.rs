use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::balance::balance_model::BalanceCandlestick;
use crate::errors::Result;
use crate::intervals::IntervalPeriod;
use crate::store::UserId;

#[async_trait]
pub trait BalanceServiceTrait: Send + Sync {
    /// Returns exactly `count` candlesticks, oldest first, anchored at the
    /// user's latest transaction date (or the epoch without history). May
    /// emit goal-reached messages as a side effect of the replay.
    async fn get_balance_history(
        &self,
        user: UserId,
        period: IntervalPeriod,
        count: usize,
    ) -> Result<Vec<BalanceCandlestick>>;

    /// The running balance after the full history, i.e. the close of a
    /// single-interval replay.
    async fn current_balance(&self, user: UserId) -> Result<Decimal>;
}
