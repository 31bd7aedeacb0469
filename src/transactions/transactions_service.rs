use async_trait::async_trait;
use chrono::Duration;
use log::{debug, error};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

use crate::balance::{BalanceService, BalanceServiceTrait};
use crate::errors::{EntityKind, Error, Result};
use crate::intervals::EPOCH;
use crate::messages::{MessageEmitter, MessageKind};
use crate::store::{LedgerStore, UserId};
use crate::transactions::transactions_model::{
    NewTransaction, Transaction, TransactionKind, TransactionUpdate,
};
use crate::transactions::transactions_traits::TransactionServiceTrait;

/// Orchestrates the posting side-effect chain: rule categorization, payment
/// request matching, overdue detection, balance-threshold notifications and
/// category-limit message rules. Reads go straight to the store.
pub struct TransactionService<S> {
    store: Arc<S>,
    balance: BalanceService<S>,
    emitter: MessageEmitter<S>,
}

impl<S: LedgerStore> TransactionService<S> {
    pub fn new(store: Arc<S>) -> Self {
        TransactionService {
            balance: BalanceService::new(store.clone()),
            emitter: MessageEmitter::new(store.clone()),
            store,
        }
    }

    /// First category rule (in creation order) whose three patterns match
    /// and whose target category still exists; the shared predicate keeps
    /// this consistent with the retroactive scan.
    async fn categorize_by_rules(&self, user: UserId, transaction: &Transaction) -> Result<()> {
        for rule in self.store.category_rules(user)? {
            if rule.matches(transaction) && self.store.category(user, rule.category_id)?.is_some() {
                debug!(
                    "rule {} categorizes transaction {} into category {}",
                    rule.id, transaction.id, rule.category_id
                );
                self.store
                    .set_transaction_category(user, transaction.id, Some(rule.category_id))
                    .await?;
                break;
            }
        }
        Ok(())
    }

    /// Links a deposit to the first open payment request with the exact
    /// amount and an unexpired due date, then flags overdue requests. The
    /// request snapshot is taken once; a request filled by this very deposit
    /// cannot also be overdue, since matching required its due date to lie
    /// ahead of the transaction.
    async fn match_payment_requests(&self, user: UserId, transaction: &Transaction) -> Result<()> {
        let requests = self.store.payment_requests(user)?;

        if transaction.kind == TransactionKind::Deposit {
            for request in &requests {
                if !request.filled
                    && transaction.amount == request.amount
                    && transaction.date < request.due_date
                {
                    let linked = self
                        .store
                        .link_transaction_to_request(user, request.id, transaction.id)
                        .await?;
                    if linked >= request.number_of_requests as usize {
                        self.store
                            .mark_payment_request_filled(user, request.id)
                            .await?;
                        if let Err(err) = self
                            .emitter
                            .payment_request_filled(user, request.id, &request.description)
                            .await
                        {
                            error!(
                                "failed to persist request-filled message for user {} request {}: {}",
                                user, request.id, err
                            );
                        }
                    }
                    break;
                }
            }
        }

        for request in &requests {
            if !request.filled && request.due_date < transaction.date {
                if let Err(err) = self
                    .emitter
                    .payment_request_not_filled(user, request.id, &request.description)
                    .await
                {
                    error!(
                        "failed to persist request-overdue message for user {} request {}: {}",
                        user, request.id, err
                    );
                }
            }
        }

        Ok(())
    }

    /// Scans the 30-day trailing window of categorized withdrawals against
    /// every message rule. A message fires only when the crossing withdrawal
    /// is the transaction just posted, so full-history rescans on later
    /// posts cannot repeat it.
    async fn check_category_limits(&self, user: UserId, transaction: &Transaction) -> Result<()> {
        let rules = self.store.message_rules(user)?;
        if rules.is_empty() {
            return Ok(());
        }

        // Last rule wins when several share a category.
        let mut limits: HashMap<i64, (MessageKind, Decimal)> = HashMap::new();
        for rule in rules {
            limits.insert(rule.category_id, (rule.kind, rule.value));
        }

        let Some(window_start) = transaction.date.checked_sub_signed(Duration::days(30)) else {
            return Ok(());
        };

        for candidate in self.store.transactions_ascending(user)? {
            if candidate.kind != TransactionKind::Withdrawal || candidate.date <= window_start {
                continue;
            }
            let Some(ref category) = candidate.category else {
                continue;
            };
            let mut crossed = None;
            if let Some(entry) = limits.get_mut(&category.id) {
                entry.1 -= candidate.amount;
                if entry.1 < Decimal::ZERO {
                    crossed = Some(entry.0);
                }
            }
            if let Some(kind) = crossed {
                limits.remove(&category.id);
                if candidate.id == transaction.id {
                    if let Err(err) = self
                        .emitter
                        .category_limit_reached(user, kind, category)
                        .await
                    {
                        error!(
                            "failed to persist category-limit message for user {} category {}: {}",
                            user, category.id, err
                        );
                    }
                }
            }
        }

        Ok(())
    }
}

#[async_trait]
impl<S: LedgerStore> TransactionServiceTrait for TransactionService<S> {
    async fn post_transaction(
        &self,
        user: UserId,
        new_transaction: NewTransaction,
    ) -> Result<Transaction> {
        new_transaction.validate()?;

        // An explicitly referenced category must exist before anything is
        // persisted.
        if let Some(category_id) = new_transaction.category_id {
            if self.store.category(user, category_id)?.is_none() {
                return Err(Error::NotFound(EntityKind::Category, category_id));
            }
        }

        let old_balance = self.balance.current_balance(user).await?;
        let old_anchor = self.store.latest_transaction_date(user)?.unwrap_or(EPOCH);

        let transaction = self
            .store
            .insert_transaction(user, &new_transaction)
            .await?;

        match new_transaction.category_id {
            Some(category_id) => {
                self.store
                    .set_transaction_category(user, transaction.id, Some(category_id))
                    .await?;
            }
            None => self.categorize_by_rules(user, &transaction).await?,
        }

        self.match_payment_requests(user, &transaction).await?;

        let new_balance = self.balance.current_balance(user).await?;
        if old_balance >= Decimal::ZERO && new_balance < Decimal::ZERO {
            if let Err(err) = self.emitter.balance_below_zero(user).await {
                error!(
                    "failed to persist below-zero message for user {}: {}",
                    user, err
                );
            }
        }

        let old_high = self.store.highest_lifetime_balance(user)?;
        let new_high = self
            .store
            .record_lifetime_balance(user, new_balance)
            .await?;
        if new_high > old_high {
            if let Err(err) = self.emitter.balance_new_high(user).await {
                error!(
                    "failed to persist new-high message for user {}: {}",
                    user, err
                );
            }
        }

        // Category limits are only re-evaluated when the posted transaction
        // is the user's new latest one; the 30-day window is anchored to it.
        if old_anchor < transaction.date {
            self.check_category_limits(user, &transaction).await?;
        }

        self.store
            .transaction(user, transaction.id)?
            .ok_or(Error::NotFound(EntityKind::Transaction, transaction.id))
    }

    fn get_transactions(
        &self,
        user: UserId,
        category_name: Option<&str>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Transaction>> {
        self.store
            .transactions_page(user, category_name, limit, offset)
    }

    fn get_transaction(&self, user: UserId, id: i64) -> Result<Transaction> {
        self.store
            .transaction(user, id)?
            .ok_or(Error::NotFound(EntityKind::Transaction, id))
    }

    async fn update_transaction(
        &self,
        user: UserId,
        id: i64,
        update: TransactionUpdate,
    ) -> Result<Transaction> {
        update.validate()?;
        if let Some(category_id) = update.category_id {
            if self.store.category(user, category_id)?.is_none() {
                return Err(Error::NotFound(EntityKind::Category, category_id));
            }
        }

        let updated = self
            .store
            .apply_transaction_update(user, id, &update)
            .await?
            .ok_or(Error::NotFound(EntityKind::Transaction, id))?;

        if let Some(category_id) = update.category_id {
            self.store
                .set_transaction_category(user, id, Some(category_id))
                .await?;
            return self
                .store
                .transaction(user, id)?
                .ok_or(Error::NotFound(EntityKind::Transaction, id));
        }
        Ok(updated)
    }

    async fn delete_transaction(&self, user: UserId, id: i64) -> Result<()> {
        if !self.store.delete_transaction(user, id).await? {
            return Err(Error::NotFound(EntityKind::Transaction, id));
        }
        Ok(())
    }

    async fn assign_category(
        &self,
        user: UserId,
        transaction_id: i64,
        category_id: i64,
    ) -> Result<Transaction> {
        if self.store.transaction(user, transaction_id)?.is_none() {
            return Err(Error::NotFound(EntityKind::Transaction, transaction_id));
        }
        if self.store.category(user, category_id)?.is_none() {
            return Err(Error::NotFound(EntityKind::Category, category_id));
        }
        self.store
            .set_transaction_category(user, transaction_id, Some(category_id))
            .await?;
        self.store
            .transaction(user, transaction_id)?
            .ok_or(Error::NotFound(EntityKind::Transaction, transaction_id))
    }
}
