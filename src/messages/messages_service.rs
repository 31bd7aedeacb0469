use async_trait::async_trait;
use chrono::{Months, NaiveDateTime};
use log::debug;
use std::sync::Arc;

use crate::categories::Category;
use crate::errors::{EntityKind, Error, Result};
use crate::intervals::EPOCH;
use crate::messages::messages_model::{MessageKind, MessageRule, NewMessageRule, UserMessage};
use crate::messages::messages_traits::MessageServiceTrait;
use crate::store::{CategoryStore, MessageStore, TransactionStore, UserId};

const EVENT_BALANCE_BELOW_ZERO: &str = "Balance drop below zero.";
const EVENT_BALANCE_NEW_HIGH: &str = "Balance reach new high.";
const EVENT_PAYMENT_REQUEST_FILLED: &str = "Payment request filled: ";
const EVENT_PAYMENT_REQUEST_NOT_FILLED: &str = "Payment request not filled: ";
const EVENT_SAVING_GOAL_REACHED: &str = "Saving goal reached: ";
const RULE_CATEGORY_LIMIT_REACHED: &str = "Category limit reached: ";

/// Emits the typed, deduplicated user messages for financial events.
///
/// Message dates are pinned to the user's latest transaction date (or the
/// epoch without history), never to the wall clock, so replays stay
/// deterministic.
pub struct MessageEmitter<S> {
    store: Arc<S>,
}

impl<S> Clone for MessageEmitter<S> {
    fn clone(&self) -> Self {
        MessageEmitter {
            store: self.store.clone(),
        }
    }
}

impl<S: MessageStore + TransactionStore> MessageEmitter<S> {
    pub fn new(store: Arc<S>) -> Self {
        MessageEmitter { store }
    }

    fn anchor_date(&self, user: UserId) -> Result<NaiveDateTime> {
        Ok(self.store.latest_transaction_date(user)?.unwrap_or(EPOCH))
    }

    /// Not deduplicated: fires on every crossing from non-negative to
    /// negative.
    pub async fn balance_below_zero(&self, user: UserId) -> Result<()> {
        self.emit(user, MessageKind::Warning, EVENT_BALANCE_BELOW_ZERO.to_string())
            .await
    }

    /// Skipped while an identical unread message exists, and gated on the
    /// history spanning at least three calendar months.
    pub async fn balance_new_high(&self, user: UserId) -> Result<()> {
        for message in self.store.unread_messages(user)? {
            if message.message == EVENT_BALANCE_NEW_HIGH {
                return Ok(());
            }
        }
        let transactions = self.store.transactions_ascending(user)?;
        let Some(first) = transactions.first() else {
            return Ok(());
        };
        let Some(eligible_from) = first.date.checked_add_months(Months::new(3)) else {
            return Ok(());
        };
        if eligible_from <= self.anchor_date(user)? {
            self.emit(user, MessageKind::Info, EVENT_BALANCE_NEW_HIGH.to_string())
                .await?;
        }
        Ok(())
    }

    /// At most one per payment request, ever; the request id is embedded in
    /// the message text used for deduplication.
    pub async fn payment_request_filled(
        &self,
        user: UserId,
        request_id: i64,
        request_name: &str,
    ) -> Result<()> {
        let message = format!(
            "{}{} (ID = {}).",
            EVENT_PAYMENT_REQUEST_FILLED, request_name, request_id
        );
        self.emit_once(user, MessageKind::Info, message).await
    }

    /// At most one per payment request, even though the overdue check re-runs
    /// on every post.
    pub async fn payment_request_not_filled(
        &self,
        user: UserId,
        request_id: i64,
        request_name: &str,
    ) -> Result<()> {
        let message = format!(
            "{}{} (ID = {}).",
            EVENT_PAYMENT_REQUEST_NOT_FILLED, request_name, request_id
        );
        self.emit_once(user, MessageKind::Warning, message).await
    }

    /// At most one per saving goal, ever.
    pub async fn saving_goal_reached(
        &self,
        user: UserId,
        goal_id: i64,
        goal_name: &str,
    ) -> Result<()> {
        let message = format!("{}{} (ID = {}).", EVENT_SAVING_GOAL_REACHED, goal_name, goal_id);
        self.emit_once(user, MessageKind::Info, message).await
    }

    /// Not deduplicated by text; the caller only invokes this when the just
    /// posted transaction caused the crossing, which prevents replay repeats.
    pub async fn category_limit_reached(
        &self,
        user: UserId,
        kind: MessageKind,
        category: &Category,
    ) -> Result<()> {
        let message = format!(
            "{}{} (ID = {}).",
            RULE_CATEGORY_LIMIT_REACHED, category.name, category.id
        );
        self.emit(user, kind, message).await
    }

    async fn emit_once(&self, user: UserId, kind: MessageKind, message: String) -> Result<()> {
        for existing in self.store.all_messages(user)? {
            if existing.message == message {
                return Ok(());
            }
        }
        self.emit(user, kind, message).await
    }

    async fn emit(&self, user: UserId, kind: MessageKind, message: String) -> Result<()> {
        let date = self.anchor_date(user)?;
        debug!("emitting {} message for user {}: {}", kind.as_str(), user, message);
        self.store.append_message(user, kind, &message, date).await?;
        Ok(())
    }
}

pub struct MessageService<S> {
    store: Arc<S>,
}

impl<S: MessageStore + CategoryStore + TransactionStore> MessageService<S> {
    pub fn new(store: Arc<S>) -> Self {
        MessageService { store }
    }
}

#[async_trait]
impl<S: MessageStore + CategoryStore + TransactionStore> MessageServiceTrait
    for MessageService<S>
{
    fn get_unread_messages(&self, user: UserId) -> Result<Vec<UserMessage>> {
        self.store.unread_messages(user)
    }

    fn get_all_messages(&self, user: UserId) -> Result<Vec<UserMessage>> {
        self.store.all_messages(user)
    }

    async fn mark_read(&self, user: UserId, message_id: i64) -> Result<()> {
        if self.store.user_message(user, message_id)?.is_none() {
            return Err(Error::NotFound(EntityKind::UserMessage, message_id));
        }
        self.store.mark_message_read(user, message_id).await?;
        Ok(())
    }

    async fn create_message_rule(
        &self,
        user: UserId,
        new_rule: NewMessageRule,
    ) -> Result<MessageRule> {
        if self.store.category(user, new_rule.category_id)?.is_none() {
            return Err(Error::NotFound(EntityKind::Category, new_rule.category_id));
        }
        self.store.insert_message_rule(user, &new_rule).await
    }
}
