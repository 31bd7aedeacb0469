use async_trait::async_trait;

use crate::errors::Result;
use crate::store::UserId;
use crate::transactions::transactions_model::{NewTransaction, Transaction, TransactionUpdate};

#[async_trait]
pub trait TransactionServiceTrait: Send + Sync {
    /// Persists a transaction and runs the full side-effect chain: rule
    /// categorization, payment-request matching, overdue detection,
    /// balance-threshold notifications and category-limit rules. Returns the
    /// persisted, categorized transaction.
    async fn post_transaction(
        &self,
        user: UserId,
        new_transaction: NewTransaction,
    ) -> Result<Transaction>;

    fn get_transactions(
        &self,
        user: UserId,
        category_name: Option<&str>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Transaction>>;

    fn get_transaction(&self, user: UserId, id: i64) -> Result<Transaction>;

    async fn update_transaction(
        &self,
        user: UserId,
        id: i64,
        update: TransactionUpdate,
    ) -> Result<Transaction>;

    async fn delete_transaction(&self, user: UserId, id: i64) -> Result<()>;

    async fn assign_category(
        &self,
        user: UserId,
        transaction_id: i64,
        category_id: i64,
    ) -> Result<Transaction>;
}
