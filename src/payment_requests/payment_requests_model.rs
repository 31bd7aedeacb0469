use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, ValidationError};
use crate::transactions::Transaction;

/// A request for a number of equal incoming payments before a due date.
///
/// Invariant: `filled` implies the number of linked transactions reached
/// `number_of_requests`, or the request was created with zero requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub id: i64,
    pub description: String,
    pub due_date: NaiveDateTime,
    pub amount: Decimal,
    pub number_of_requests: u32,
    pub filled: bool,
    pub transactions: Vec<Transaction>,
}

/// Input model for creating a new payment request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPaymentRequest {
    pub description: String,
    pub due_date: NaiveDateTime,
    pub amount: Decimal,
    pub number_of_requests: u32,
}

impl NewPaymentRequest {
    pub fn validate(&self) -> crate::errors::Result<()> {
        if self.amount < Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Payment request amount must be non-negative".to_string(),
            )));
        }
        Ok(())
    }
}
