use chrono::NaiveDateTime;
use log::debug;
use rust_decimal::Decimal;

use crate::balance::balance_model::BalanceCandlestick;
use crate::saving_goals::SavingGoal;
use crate::transactions::Transaction;

/// Result of one full replay of a user's transaction history.
#[derive(Debug, Clone)]
pub struct ReplayOutcome {
    /// One candlestick per requested interval, oldest first. The synthetic
    /// all-time-before-range interval has already been discarded.
    pub candlesticks: Vec<BalanceCandlestick>,
    /// Saving goals that survived the replay, with their derived balances.
    /// Goals whose deletion date was crossed have been flushed and dropped;
    /// deletion-marked goals whose date was not yet crossed are still here.
    pub goals: Vec<SavingGoal>,
    /// The running balance after the full stream was consumed.
    pub closing_balance: Decimal,
}

/// Deterministically replays the ordered transaction history against the
/// given interval boundaries.
///
/// `transactions` must be ascending by date and `boundaries` must be the
/// output of [`crate::intervals::boundaries`]: the leading edge is the start
/// of UNIX time and the trailing edge is the anchor date. Each boundary pair
/// opens a candlestick at the carried-in balance; a transaction belongs to
/// the current candle while its date does not exceed the candle's end
/// boundary. Saving-goal set-asides are folded in once per elapsed calendar
/// month, gated on the running balance meeting the goal's minimum; goals
/// whose deletion date has been crossed flush their accumulated balance back
/// in a single mutation and drop out of the replay.
///
/// Pure function of its inputs: same snapshot, same boundaries, identical
/// output.
pub fn replay(
    transactions: &[Transaction],
    mut goals: Vec<SavingGoal>,
    boundaries: &[NaiveDateTime],
) -> ReplayOutcome {
    debug!(
        "replaying {} transactions across {} boundaries with {} goals",
        transactions.len(),
        boundaries.len(),
        goals.len()
    );

    let mut candlesticks = Vec::with_capacity(boundaries.len().saturating_sub(1));
    let mut previous_month = transactions
        .first()
        .map(|t| t.month_identifier())
        .unwrap_or(0);
    let mut balance = Decimal::ZERO;
    let mut index = 0;

    for window in boundaries.windows(2) {
        let (start, end) = (window[0], window[1]);
        let mut candle = BalanceCandlestick::new(balance, start);

        while index < transactions.len() && transactions[index].date <= end {
            let transaction = &transactions[index];

            // One set-aside step per calendar month elapsed since the
            // previous transaction.
            for _ in previous_month..transaction.month_identifier() {
                let mut remaining = Vec::with_capacity(goals.len());
                for mut goal in goals {
                    let mutation;
                    if matches!(goal.deletion_date, Some(deleted) if deleted < transaction.date) {
                        // Deletion crossed: flush the whole accumulated
                        // balance back and drop the goal.
                        mutation = goal.balance;
                    } else {
                        if transaction.month_identifier() > goal.month_identifier()
                            && balance >= goal.min_balance_required
                        {
                            mutation = -goal.set_aside();
                        } else {
                            mutation = Decimal::ZERO;
                        }
                        remaining.push(goal);
                    }
                    balance += mutation;
                    candle.mutate(mutation);
                }
                goals = remaining;
            }
            previous_month = transaction.month_identifier();

            // Goals deleted before this candle closes flush here even when
            // no month boundary was crossed.
            let mut remaining = Vec::with_capacity(goals.len());
            for goal in goals {
                if matches!(goal.deletion_date, Some(deleted) if deleted < end) {
                    let mutation = goal.balance;
                    balance += mutation;
                    candle.mutate(mutation);
                } else {
                    remaining.push(goal);
                }
            }
            goals = remaining;

            candle.mutate(transaction.signed_amount());
            balance = candle.close;
            index += 1;
        }

        candlesticks.push(candle);
    }

    // The first candle spans all time before the requested range.
    if !candlesticks.is_empty() {
        candlesticks.remove(0);
    }

    ReplayOutcome {
        candlesticks,
        goals,
        closing_balance: balance,
    }
}
