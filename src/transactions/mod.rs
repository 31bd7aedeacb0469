pub(crate) mod transactions_model;
pub(crate) mod transactions_service;
pub(crate) mod transactions_traits;


pub use transactions_model::{NewTransaction, Transaction, TransactionKind, TransactionUpdate};
pub use transactions_service::TransactionService;
pub use transactions_traits::TransactionServiceTrait;
