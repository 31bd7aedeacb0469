use serde::{Deserialize, Serialize};

use crate::transactions::Transaction;

/// An auto-categorization rule. All three patterns are substring matches
/// against the transaction's fields; an empty pattern matches everything.
/// Rules are evaluated in creation order and the first full match wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRule {
    pub id: i64,
    pub description: String,
    #[serde(rename = "iBAN")]
    pub iban: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub category_id: i64,
    pub apply_on_history: bool,
}

impl CategoryRule {
    /// The single match predicate, shared by live categorization at posting
    /// time and the retroactive scan when a rule is created with
    /// `apply_on_history`. Whether the target category exists is checked by
    /// the caller, not here.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        transaction.description.contains(&self.description)
            && transaction.external_iban.contains(&self.iban)
            && transaction.kind.as_str().contains(&self.kind)
    }
}

/// Input model for creating a new category rule
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategoryRule {
    pub description: String,
    #[serde(rename = "iBAN")]
    pub iban: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub category_id: i64,
    pub apply_on_history: bool,
}

/// Partial update for an existing category rule; `None` leaves a field as is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryRuleUpdate {
    pub description: Option<String>,
    #[serde(rename = "iBAN")]
    pub iban: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub category_id: Option<i64>,
}
