use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, ValidationError};
use crate::intervals;

/// A saving goal: a monthly set-aside of spendable balance towards a target.
///
/// The creation date is pinned by the service to the latest transaction date
/// at creation time (or the epoch when the user has no history), so that the
/// deterministic replay can decide which calendar months contribute. The
/// accumulated balance is derived state: it starts at zero on every replay
/// and never exceeds `goal`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingGoal {
    pub id: i64,
    pub creation_date: NaiveDateTime,
    pub deletion_date: Option<NaiveDateTime>,
    pub name: String,
    pub goal: Decimal,
    pub save_per_month: Decimal,
    pub min_balance_required: Decimal,
    pub balance: Decimal,
}

impl SavingGoal {
    /// One monthly set-aside step: moves at most `save_per_month` from the
    /// spendable balance into the goal, capped at the remaining headroom to
    /// the target. Returns the amount actually set aside (zero once the
    /// target is reached).
    pub fn set_aside(&mut self) -> Decimal {
        let headroom = self.goal - self.balance;
        let saved = headroom.min(self.save_per_month);
        self.balance += saved;
        saved
    }

    pub fn month_identifier(&self) -> i32 {
        intervals::month_identifier(self.creation_date)
    }

    pub fn is_reached(&self) -> bool {
        self.balance >= self.goal
    }
}

/// Input model for creating a new saving goal
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSavingGoal {
    pub name: String,
    pub goal: Decimal,
    pub save_per_month: Decimal,
    pub min_balance_required: Decimal,
}

impl NewSavingGoal {
    pub fn validate(&self) -> crate::errors::Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "name".to_string(),
            )));
        }
        if self.goal < Decimal::ZERO
            || self.save_per_month < Decimal::ZERO
            || self.min_balance_required < Decimal::ZERO
        {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Saving goal amounts must be non-negative".to_string(),
            )));
        }
        Ok(())
    }
}
