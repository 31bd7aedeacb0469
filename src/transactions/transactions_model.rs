use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::categories::Category;
use crate::errors::{Error, ValidationError};
use crate::intervals;

/// Direction of a transaction; determines the sign of its balance mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Deposit => "deposit",
            TransactionKind::Withdrawal => "withdrawal",
        }
    }
}

impl FromStr for TransactionKind {
    type Err = Error;

    fn from_str(s: &str) -> crate::errors::Result<Self> {
        match s {
            "deposit" => Ok(TransactionKind::Deposit),
            "withdrawal" => Ok(TransactionKind::Withdrawal),
            other => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown transaction type: {}",
                other
            )))),
        }
    }
}

/// A posted monetary transaction. The date is the immutable ordering key of
/// the replay; the amount is a non-negative magnitude whose sign is carried
/// by `kind`. The category is a weak reference resolved at read time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    pub date: NaiveDateTime,
    pub amount: Decimal,
    pub description: String,
    pub external_iban: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub category: Option<Category>,
}

impl Transaction {
    /// The balance mutation this transaction applies during replay.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionKind::Deposit => self.amount,
            TransactionKind::Withdrawal => -self.amount,
        }
    }

    pub fn month_identifier(&self) -> i32 {
        intervals::month_identifier(self.date)
    }
}

/// Input model for posting a new transaction
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    pub date: NaiveDateTime,
    pub amount: Decimal,
    pub description: String,
    pub external_iban: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub category_id: Option<i64>,
}

impl NewTransaction {
    pub fn validate(&self) -> crate::errors::Result<()> {
        if self.amount < Decimal::ZERO {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Transaction amount must be non-negative".to_string(),
            )));
        }
        if self.external_iban.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "externalIBAN".to_string(),
            )));
        }
        Ok(())
    }
}

/// Partial update for an existing transaction. `None` means "leave the field
/// unchanged", so a legitimate update to an empty description stays
/// distinguishable from no change at all.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionUpdate {
    pub date: Option<NaiveDateTime>,
    pub amount: Option<Decimal>,
    pub description: Option<String>,
    pub external_iban: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<TransactionKind>,
    pub category_id: Option<i64>,
}

impl TransactionUpdate {
    pub fn validate(&self) -> crate::errors::Result<()> {
        if let Some(amount) = self.amount {
            if amount < Decimal::ZERO {
                return Err(Error::Validation(ValidationError::InvalidInput(
                    "Transaction amount must be non-negative".to_string(),
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn sample(kind: TransactionKind) -> Transaction {
        Transaction {
            id: 1,
            date: NaiveDate::from_ymd_opt(2018, 4, 2)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
            amount: dec!(25.50),
            description: "Groceries".to_string(),
            external_iban: "NL39RABO0300065264".to_string(),
            kind,
            category: None,
        }
    }

    #[test]
    fn signed_amount_follows_kind() {
        assert_eq!(sample(TransactionKind::Deposit).signed_amount(), dec!(25.50));
        assert_eq!(
            sample(TransactionKind::Withdrawal).signed_amount(),
            dec!(-25.50)
        );
    }

    #[test]
    fn new_transaction_rejects_negative_amount() {
        let new = NewTransaction {
            date: sample(TransactionKind::Deposit).date,
            amount: dec!(-1),
            description: String::new(),
            external_iban: "NL39RABO0300065264".to_string(),
            kind: TransactionKind::Deposit,
            category_id: None,
        };
        assert!(new.validate().is_err());
    }

    #[test]
    fn serializes_kind_as_lowercase_type() {
        let json = serde_json::to_value(sample(TransactionKind::Deposit)).unwrap();
        assert_eq!(json["type"], "deposit");
        assert_eq!(json["externalIBAN"].as_str(), None); // camelCase keeps IBAN capitalized only in the middle
        assert_eq!(json["externalIban"], "NL39RABO0300065264");
    }
}
