use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An OHLC + volume summary of balance movement within one interval.
///
/// A candlestick opens at the running balance carried in from the previous
/// interval and is then updated through `mutate`; `volume` accumulates the
/// absolute magnitude of every mutation. Invariants: `low <= open <= high`,
/// `low <= close <= high`, `volume >= 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceCandlestick {
    pub open: Decimal,
    pub close: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub volume: Decimal,
    /// Start of the interval, as seconds since the UNIX epoch.
    pub timestamp: i64,
}

impl BalanceCandlestick {
    pub fn new(open: Decimal, interval_start: NaiveDateTime) -> Self {
        BalanceCandlestick {
            open,
            close: open,
            high: open,
            low: open,
            volume: Decimal::ZERO,
            timestamp: interval_start.and_utc().timestamp(),
        }
    }

    /// Applies one balance mutation, updating close, high, low and volume.
    pub fn mutate(&mut self, delta: Decimal) {
        self.close += delta;
        if self.close > self.high {
            self.high = self.close;
        } else if self.close < self.low {
            self.low = self.close;
        }
        self.volume += delta.abs();
    }
}
