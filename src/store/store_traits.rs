use async_trait::async_trait;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::categories::Category;
use crate::category_rules::{CategoryRule, CategoryRuleUpdate, NewCategoryRule};
use crate::errors::Result;
use crate::messages::{MessageKind, MessageRule, NewMessageRule, UserMessage};
use crate::payment_requests::{NewPaymentRequest, PaymentRequest};
use crate::saving_goals::{NewSavingGoal, SavingGoal};
use crate::transactions::{NewTransaction, Transaction, TransactionUpdate};

/// Opaque identity of a ledger owner, issued by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(Uuid);

impl UserId {
    pub(crate) fn generate() -> Self {
        UserId(Uuid::new_v4())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// User lifecycle and per-user scalar state.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn create_user(&self) -> Result<UserId>;

    fn highest_lifetime_balance(&self, user: UserId) -> Result<Decimal>;

    /// Stores `max(current, candidate)` and returns the stored value.
    async fn record_lifetime_balance(&self, user: UserId, candidate: Decimal) -> Result<Decimal>;
}

/// Transaction reads and writes. Insertion allocates the next transaction id
/// and persists the record in one atomic unit, so concurrent posts for the
/// same user can neither duplicate nor skip ids.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// All transactions of the user, ascending by date (ties by id), with
    /// categories resolved.
    fn transactions_ascending(&self, user: UserId) -> Result<Vec<Transaction>>;

    /// Paged read, optionally filtered by category name.
    fn transactions_page(
        &self,
        user: UserId,
        category_name: Option<&str>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Transaction>>;

    fn transaction(&self, user: UserId, id: i64) -> Result<Option<Transaction>>;

    /// Date of the most recent transaction; `None` when the user has no
    /// history. This is the anchor for interval generation and message dates.
    fn latest_transaction_date(&self, user: UserId) -> Result<Option<NaiveDateTime>>;

    async fn insert_transaction(&self, user: UserId, new: &NewTransaction) -> Result<Transaction>;

    /// Applies the scalar fields of a partial update; category assignment
    /// goes through `set_transaction_category`. Returns `None` when the
    /// transaction does not exist.
    async fn apply_transaction_update(
        &self,
        user: UserId,
        id: i64,
        update: &TransactionUpdate,
    ) -> Result<Option<Transaction>>;

    /// Assigns or clears the category of a transaction. Returns `false` when
    /// the transaction does not exist.
    async fn set_transaction_category(
        &self,
        user: UserId,
        transaction_id: i64,
        category_id: Option<i64>,
    ) -> Result<bool>;

    async fn delete_transaction(&self, user: UserId, id: i64) -> Result<bool>;
}

#[async_trait]
pub trait CategoryStore: Send + Sync {
    fn categories(&self, user: UserId) -> Result<Vec<Category>>;

    fn category(&self, user: UserId, id: i64) -> Result<Option<Category>>;

    async fn insert_category(&self, user: UserId, name: &str) -> Result<Category>;

    async fn rename_category(&self, user: UserId, id: i64, name: &str)
        -> Result<Option<Category>>;

    /// Deletes a category after unlinking it from every transaction.
    async fn delete_category(&self, user: UserId, id: i64) -> Result<bool>;
}

#[async_trait]
pub trait CategoryRuleStore: Send + Sync {
    /// Rules in creation order; first full match wins.
    fn category_rules(&self, user: UserId) -> Result<Vec<CategoryRule>>;

    fn category_rule(&self, user: UserId, id: i64) -> Result<Option<CategoryRule>>;

    async fn insert_category_rule(
        &self,
        user: UserId,
        new: &NewCategoryRule,
    ) -> Result<CategoryRule>;

    async fn apply_category_rule_update(
        &self,
        user: UserId,
        id: i64,
        update: &CategoryRuleUpdate,
    ) -> Result<Option<CategoryRule>>;

    async fn delete_category_rule(&self, user: UserId, id: i64) -> Result<bool>;
}

#[async_trait]
pub trait SavingGoalStore: Send + Sync {
    /// Every goal ever created, including deletion-marked ones, in creation
    /// order and with the accumulated balance zeroed: goal balances are
    /// derived state, recomputed by replay.
    fn saving_goals(&self, user: UserId) -> Result<Vec<SavingGoal>>;

    fn saving_goal(&self, user: UserId, id: i64) -> Result<Option<SavingGoal>>;

    async fn insert_saving_goal(
        &self,
        user: UserId,
        new: &NewSavingGoal,
        creation_date: NaiveDateTime,
    ) -> Result<SavingGoal>;

    /// Marks a goal deleted as of `deletion_date`; the record is kept so the
    /// replay can flush its accumulated balance back. Returns `false` when
    /// the goal does not exist.
    async fn mark_saving_goal_deleted(
        &self,
        user: UserId,
        id: i64,
        deletion_date: NaiveDateTime,
    ) -> Result<bool>;
}

#[async_trait]
pub trait PaymentRequestStore: Send + Sync {
    /// Requests in creation order, with linked transactions resolved.
    fn payment_requests(&self, user: UserId) -> Result<Vec<PaymentRequest>>;

    async fn insert_payment_request(
        &self,
        user: UserId,
        new: &NewPaymentRequest,
    ) -> Result<PaymentRequest>;

    /// Links a transaction to a request and returns the new link count.
    async fn link_transaction_to_request(
        &self,
        user: UserId,
        request_id: i64,
        transaction_id: i64,
    ) -> Result<usize>;

    async fn mark_payment_request_filled(&self, user: UserId, request_id: i64) -> Result<bool>;
}

#[async_trait]
pub trait MessageStore: Send + Sync {
    fn all_messages(&self, user: UserId) -> Result<Vec<UserMessage>>;

    fn unread_messages(&self, user: UserId) -> Result<Vec<UserMessage>>;

    fn user_message(&self, user: UserId, id: i64) -> Result<Option<UserMessage>>;

    /// Appends a message; messages are never deleted.
    async fn append_message(
        &self,
        user: UserId,
        kind: MessageKind,
        text: &str,
        date: NaiveDateTime,
    ) -> Result<UserMessage>;

    async fn mark_message_read(&self, user: UserId, id: i64) -> Result<bool>;

    fn message_rules(&self, user: UserId) -> Result<Vec<MessageRule>>;

    async fn insert_message_rule(&self, user: UserId, new: &NewMessageRule)
        -> Result<MessageRule>;
}

/// Everything the engine needs from a backing store, as a single bound.
pub trait LedgerStore:
    UserStore
    + TransactionStore
    + CategoryStore
    + CategoryRuleStore
    + SavingGoalStore
    + PaymentRequestStore
    + MessageStore
{
}

impl<T> LedgerStore for T where
    T: UserStore
        + TransactionStore
        + CategoryStore
        + CategoryRuleStore
        + SavingGoalStore
        + PaymentRequestStore
        + MessageStore
{
}
