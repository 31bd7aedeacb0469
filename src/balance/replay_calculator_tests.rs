use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::balance::replay_calculator::replay;
use crate::intervals::{self, IntervalPeriod, EPOCH};
use crate::saving_goals::SavingGoal;
use crate::transactions::{Transaction, TransactionKind};

fn dt(y: i32, mo: u32, d: u32, h: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, mo, d)
        .unwrap()
        .and_hms_opt(h, 0, 0)
        .unwrap()
}

fn transaction(id: i64, date: NaiveDateTime, amount: Decimal, kind: TransactionKind) -> Transaction {
    Transaction {
        id,
        date,
        amount,
        description: "test".to_string(),
        external_iban: "NL39RABO0300065264".to_string(),
        kind,
        category: None,
    }
}

fn deposit(id: i64, date: NaiveDateTime, amount: Decimal) -> Transaction {
    transaction(id, date, amount, TransactionKind::Deposit)
}

fn withdrawal(id: i64, date: NaiveDateTime, amount: Decimal) -> Transaction {
    transaction(id, date, amount, TransactionKind::Withdrawal)
}

fn goal(
    id: i64,
    creation_date: NaiveDateTime,
    target: Decimal,
    save_per_month: Decimal,
    min_balance_required: Decimal,
) -> SavingGoal {
    SavingGoal {
        id,
        creation_date,
        deletion_date: None,
        name: format!("goal-{}", id),
        goal: target,
        save_per_month,
        min_balance_required,
        balance: Decimal::ZERO,
    }
}

fn day_boundaries(count: usize, until: NaiveDateTime) -> Vec<NaiveDateTime> {
    intervals::boundaries(IntervalPeriod::Day, count, until).unwrap()
}

#[test]
fn empty_history_yields_flat_candles_at_zero() {
    let boundaries = day_boundaries(3, dt(2018, 5, 13, 0));
    let outcome = replay(&[], Vec::new(), &boundaries);

    assert_eq!(outcome.candlesticks.len(), 3);
    for candle in &outcome.candlesticks {
        assert_eq!(candle.open, Decimal::ZERO);
        assert_eq!(candle.close, Decimal::ZERO);
        assert_eq!(candle.high, Decimal::ZERO);
        assert_eq!(candle.low, Decimal::ZERO);
        assert_eq!(candle.volume, Decimal::ZERO);
    }
    assert_eq!(outcome.closing_balance, Decimal::ZERO);
}

#[test]
fn single_deposit_lands_in_its_day_and_carries_forward() {
    // Window: (5-10, 5-11], (5-11, 5-12], (5-12, 5-13].
    let boundaries = day_boundaries(3, dt(2018, 5, 13, 0));
    let transactions = vec![deposit(1, dt(2018, 5, 11, 12), dec!(100))];
    let outcome = replay(&transactions, Vec::new(), &boundaries);

    let candles = &outcome.candlesticks;
    assert_eq!(candles.len(), 3);

    assert_eq!(candles[0].close, Decimal::ZERO);
    assert_eq!(candles[0].volume, Decimal::ZERO);

    assert_eq!(candles[1].open, Decimal::ZERO);
    assert_eq!(candles[1].close, dec!(100));
    assert_eq!(candles[1].high, dec!(100));
    assert_eq!(candles[1].low, Decimal::ZERO);
    assert_eq!(candles[1].volume, dec!(100));

    assert_eq!(candles[2].open, dec!(100));
    assert_eq!(candles[2].close, dec!(100));
    assert_eq!(candles[2].high, dec!(100));
    assert_eq!(candles[2].low, dec!(100));
    assert_eq!(candles[2].volume, Decimal::ZERO);
}

#[test]
fn transaction_on_the_end_boundary_is_included() {
    let until = dt(2018, 5, 13, 0);
    let boundaries = day_boundaries(1, until);
    let transactions = vec![deposit(1, until, dec!(42))];
    let outcome = replay(&transactions, Vec::new(), &boundaries);

    assert_eq!(outcome.candlesticks.len(), 1);
    assert_eq!(outcome.candlesticks[0].close, dec!(42));
    assert_eq!(outcome.closing_balance, dec!(42));
}

#[test]
fn replay_is_deterministic() {
    let boundaries = intervals::boundaries(IntervalPeriod::Month, 6, dt(2018, 6, 15, 10)).unwrap();
    let transactions = vec![
        deposit(1, dt(2018, 1, 15, 10), dec!(250.75)),
        withdrawal(2, dt(2018, 2, 3, 8), dec!(99.99)),
        deposit(3, dt(2018, 4, 20, 16), dec!(1200)),
        withdrawal(4, dt(2018, 6, 15, 10), dec!(40.50)),
    ];
    let goals = vec![goal(1, EPOCH, dec!(300), dec!(50), Decimal::ZERO)];

    let first = replay(&transactions, goals.clone(), &boundaries);
    let second = replay(&transactions, goals, &boundaries);
    assert_eq!(first.candlesticks, second.candlesticks);
    assert_eq!(first.goals, second.goals);
    assert_eq!(first.closing_balance, second.closing_balance);
}

#[test]
fn candlestick_invariants_hold_under_mixed_stream() {
    let boundaries = intervals::boundaries(IntervalPeriod::Week, 8, dt(2018, 3, 30, 0)).unwrap();
    let transactions = vec![
        deposit(1, dt(2018, 2, 1, 9), dec!(500)),
        withdrawal(2, dt(2018, 2, 10, 9), dec!(700)),
        deposit(3, dt(2018, 3, 1, 9), dec!(900)),
        withdrawal(4, dt(2018, 3, 2, 9), dec!(100)),
        withdrawal(5, dt(2018, 3, 29, 9), dec!(250)),
    ];
    let goals = vec![goal(1, EPOCH, dec!(1000), dec!(75), dec!(100))];
    let outcome = replay(&transactions, goals, &boundaries);

    assert_eq!(outcome.candlesticks.len(), 8);
    let mut previous_close = None;
    for candle in &outcome.candlesticks {
        assert!(candle.low <= candle.open && candle.open <= candle.high);
        assert!(candle.low <= candle.close && candle.close <= candle.high);
        assert!(candle.volume >= Decimal::ZERO);
        // Each candle opens at the previous close.
        if let Some(previous) = previous_close {
            assert_eq!(candle.open, previous);
        }
        previous_close = Some(candle.close);
    }
}

#[test]
fn monthly_set_aside_caps_at_goal_target() {
    // goal = 500, savePerMonth = 100: five contributions across six months
    // of deposits, never exceeding the target.
    let goals = vec![goal(1, EPOCH, dec!(500), dec!(100), Decimal::ZERO)];
    let mut transactions = Vec::new();
    for month in 1..=6 {
        transactions.push(deposit(
            month as i64,
            dt(2018, month, 15, 10),
            dec!(200),
        ));
    }
    let until = dt(2018, 6, 15, 10);
    let boundaries = intervals::boundaries(IntervalPeriod::Hour, 1, until).unwrap();
    let outcome = replay(&transactions, goals, &boundaries);

    assert_eq!(outcome.goals.len(), 1);
    assert_eq!(outcome.goals[0].balance, dec!(500));
    assert!(outcome.goals[0].is_reached());
    // 6 * 200 deposited, 500 set aside.
    assert_eq!(outcome.closing_balance, dec!(700));
}

#[test]
fn set_aside_respects_min_balance_gate() {
    let goals = vec![goal(1, EPOCH, dec!(500), dec!(100), dec!(10_000))];
    let transactions = vec![
        deposit(1, dt(2018, 1, 15, 10), dec!(200)),
        deposit(2, dt(2018, 2, 15, 10), dec!(200)),
    ];
    let boundaries = intervals::boundaries(IntervalPeriod::Hour, 1, dt(2018, 2, 15, 10)).unwrap();
    let outcome = replay(&transactions, goals, &boundaries);

    assert_eq!(outcome.goals[0].balance, Decimal::ZERO);
    assert_eq!(outcome.closing_balance, dec!(400));
}

#[test]
fn goal_created_after_month_does_not_contribute_for_it() {
    // Creation month equals the second transaction's month: the elapsed
    // month between the two transactions must not contribute.
    let goals = vec![goal(1, dt(2018, 2, 1, 0), dec!(500), dec!(100), Decimal::ZERO)];
    let transactions = vec![
        deposit(1, dt(2018, 1, 15, 10), dec!(200)),
        deposit(2, dt(2018, 2, 15, 10), dec!(200)),
    ];
    let boundaries = intervals::boundaries(IntervalPeriod::Hour, 1, dt(2018, 2, 15, 10)).unwrap();
    let outcome = replay(&transactions, goals, &boundaries);

    assert_eq!(outcome.goals[0].balance, Decimal::ZERO);
    assert_eq!(outcome.closing_balance, dec!(400));
}

#[test]
fn deleted_goal_flushes_its_balance_back() {
    let mut flushed = goal(1, EPOCH, dec!(500), dec!(100), Decimal::ZERO);
    flushed.deletion_date = Some(dt(2018, 2, 15, 10));
    let transactions = vec![
        deposit(1, dt(2018, 1, 15, 10), dec!(200)),
        deposit(2, dt(2018, 2, 15, 10), dec!(200)),
        deposit(3, dt(2018, 3, 15, 10), dec!(200)),
    ];
    let boundaries = intervals::boundaries(IntervalPeriod::Hour, 1, dt(2018, 3, 15, 10)).unwrap();
    let outcome = replay(&transactions, vec![flushed], &boundaries);

    // The February contribution flushed back; nothing stays set aside.
    assert!(outcome.goals.is_empty());
    assert_eq!(outcome.closing_balance, dec!(600));
}

#[test]
fn balance_is_conserved_across_goals_and_flushes() {
    let active = goal(1, EPOCH, dec!(10_000), dec!(150), Decimal::ZERO);
    let mut deleted = goal(2, EPOCH, dec!(10_000), dec!(50), Decimal::ZERO);
    deleted.deletion_date = Some(dt(2018, 3, 1, 0));

    let transactions = vec![
        deposit(1, dt(2018, 1, 10, 0), dec!(1000)),
        withdrawal(2, dt(2018, 2, 10, 0), dec!(300)),
        deposit(3, dt(2018, 3, 10, 0), dec!(400)),
        deposit(4, dt(2018, 4, 10, 0), dec!(250)),
    ];
    let boundaries = intervals::boundaries(IntervalPeriod::Hour, 1, dt(2018, 4, 10, 0)).unwrap();
    let outcome = replay(&transactions, vec![active, deleted], &boundaries);

    let deposits = dec!(1000) + dec!(400) + dec!(250);
    let withdrawals = dec!(300);
    let still_set_aside: Decimal = outcome.goals.iter().map(|g| g.balance).sum();
    assert_eq!(
        outcome.closing_balance,
        deposits - withdrawals - still_set_aside
    );
    // Only the active goal survives the replay.
    assert_eq!(outcome.goals.len(), 1);
    assert_eq!(outcome.goals[0].id, 1);
}

#[test]
fn future_dated_transaction_is_replayed_in_order() {
    // The anchor is the latest known date, so a "future" entry simply is
    // the last one consumed.
    let far_out = dt(2030, 1, 1, 0);
    let transactions = vec![
        deposit(1, dt(2018, 1, 1, 0), dec!(100)),
        deposit(2, far_out, dec!(50)),
    ];
    let boundaries = intervals::boundaries(IntervalPeriod::Hour, 1, far_out).unwrap();
    let outcome = replay(&transactions, Vec::new(), &boundaries);
    assert_eq!(outcome.closing_balance, dec!(150));
}
