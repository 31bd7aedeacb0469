pub(crate) mod memory_store;
pub(crate) mod store_traits;

#[cfg(test)]
mod memory_store_tests;

pub use memory_store::MemoryStore;
pub use store_traits::{
    CategoryRuleStore, CategoryStore, LedgerStore, MessageStore, PaymentRequestStore,
    SavingGoalStore, TransactionStore, UserId, UserStore,
};
