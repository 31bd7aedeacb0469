pub mod errors;
pub mod intervals;
pub mod store;

pub mod balance;
pub mod categories;
pub mod category_rules;
pub mod messages;
pub mod payment_requests;
pub mod saving_goals;
pub mod transactions;

pub use errors::{Error, Result};
pub use store::{LedgerStore, MemoryStore, UserId};
