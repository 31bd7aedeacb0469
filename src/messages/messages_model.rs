use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Severity of a user message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Info,
    Warning,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Info => "info",
            MessageKind::Warning => "warning",
        }
    }
}

/// A notification emitted for a financial event. Messages are append-only;
/// the only permitted mutation is flipping the read flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserMessage {
    pub id: i64,
    pub message: String,
    pub date: NaiveDateTime,
    pub read: bool,
    #[serde(rename = "type")]
    pub kind: MessageKind,
}

/// A user-defined threshold on 30-day withdrawals within one category.
/// `kind` is the severity of the message emitted when the threshold is
/// crossed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRule {
    pub id: i64,
    pub category_id: i64,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub value: Decimal,
}

/// Input model for creating a new message rule
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessageRule {
    pub category_id: i64,
    #[serde(rename = "type")]
    pub kind: MessageKind,
    pub value: Decimal,
}
