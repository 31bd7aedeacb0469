use std::fmt;
use thiserror::Error;

// Create a type alias for Result using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the ledger engine
#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown user")]
    UnknownUser,

    #[error("{0} with id {1} not found")]
    NotFound(EntityKind, i64),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Store operation failed: {0}")]
    Store(String),
}

/// Entity kinds addressable by id, used in not-found errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Transaction,
    Category,
    CategoryRule,
    SavingGoal,
    PaymentRequest,
    UserMessage,
    MessageRule,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Transaction => "Transaction",
            EntityKind::Category => "Category",
            EntityKind::CategoryRule => "CategoryRule",
            EntityKind::SavingGoal => "SavingGoal",
            EntityKind::PaymentRequest => "PaymentRequest",
            EntityKind::UserMessage => "UserMessage",
            EntityKind::MessageRule => "MessageRule",
        };
        write!(f, "{}", name)
    }
}

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Failed to parse decimal number: {0}")]
    DecimalParse(#[from] rust_decimal::Error),

    #[error("Date out of supported range: {0}")]
    DateOutOfRange(String),
}

// Add From implementation for rust_decimal::Error
impl From<rust_decimal::Error> for Error {
    fn from(err: rust_decimal::Error) -> Self {
        Error::Validation(ValidationError::DecimalParse(err))
    }
}

// Add From implementation for serde_json::Error
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}
