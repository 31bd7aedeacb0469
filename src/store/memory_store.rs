use async_trait::async_trait;
use chrono::NaiveDateTime;
use dashmap::DashMap;
use rust_decimal::Decimal;

use crate::categories::Category;
use crate::category_rules::{CategoryRule, CategoryRuleUpdate, NewCategoryRule};
use crate::errors::{Error, Result};
use crate::messages::{MessageKind, MessageRule, NewMessageRule, UserMessage};
use crate::payment_requests::{NewPaymentRequest, PaymentRequest};
use crate::saving_goals::{NewSavingGoal, SavingGoal};
use crate::store::store_traits::{
    CategoryRuleStore, CategoryStore, MessageStore, PaymentRequestStore, SavingGoalStore,
    TransactionStore, UserId, UserStore,
};
use crate::transactions::{NewTransaction, Transaction, TransactionKind, TransactionUpdate};

#[derive(Debug, Clone)]
struct TransactionRecord {
    id: i64,
    date: NaiveDateTime,
    amount: Decimal,
    description: String,
    external_iban: String,
    kind: TransactionKind,
    category_id: Option<i64>,
}

impl TransactionRecord {
    fn materialize(&self, categories: &[Category]) -> Transaction {
        Transaction {
            id: self.id,
            date: self.date,
            amount: self.amount,
            description: self.description.clone(),
            external_iban: self.external_iban.clone(),
            kind: self.kind,
            category: self
                .category_id
                .and_then(|id| categories.iter().find(|c| c.id == id).cloned()),
        }
    }
}

#[derive(Debug, Clone)]
struct RequestRecord {
    id: i64,
    description: String,
    due_date: NaiveDateTime,
    amount: Decimal,
    number_of_requests: u32,
    filled: bool,
    transaction_ids: Vec<i64>,
}

impl RequestRecord {
    fn materialize(&self, ledger: &UserLedger) -> PaymentRequest {
        let transactions = self
            .transaction_ids
            .iter()
            .filter_map(|id| ledger.transactions.iter().find(|t| t.id == *id))
            .map(|record| record.materialize(&ledger.categories))
            .collect();
        PaymentRequest {
            id: self.id,
            description: self.description.clone(),
            due_date: self.due_date,
            amount: self.amount,
            number_of_requests: self.number_of_requests,
            filled: self.filled,
            transactions,
        }
    }
}

#[derive(Debug, Default)]
struct Counters {
    transactions: i64,
    categories: i64,
    category_rules: i64,
    saving_goals: i64,
    payment_requests: i64,
    messages: i64,
    message_rules: i64,
}

#[derive(Debug, Default)]
struct UserLedger {
    counters: Counters,
    // Kept ascending by (date, id) at all times.
    transactions: Vec<TransactionRecord>,
    categories: Vec<Category>,
    category_rules: Vec<CategoryRule>,
    saving_goals: Vec<SavingGoal>,
    payment_requests: Vec<RequestRecord>,
    messages: Vec<UserMessage>,
    message_rules: Vec<MessageRule>,
    highest_balance: Decimal,
}

impl UserLedger {
    fn insert_transaction_sorted(&mut self, record: TransactionRecord) {
        let pos = self
            .transactions
            .partition_point(|t| (t.date, t.id) <= (record.date, record.id));
        self.transactions.insert(pos, record);
    }
}

/// Concurrent in-memory implementation of the ledger store.
///
/// Each user's ledger lives in its own map entry: operations for different
/// users proceed independently, while the exclusive entry guard serializes
/// writes for a single user. Id allocation and the insert happen under one
/// guard, so concurrent posts can neither duplicate nor skip ids.
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: DashMap<UserId, UserLedger>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    fn read<T>(&self, user: UserId, f: impl FnOnce(&UserLedger) -> T) -> Result<T> {
        let ledger = self.users.get(&user).ok_or(Error::UnknownUser)?;
        Ok(f(ledger.value()))
    }

    fn write<T>(&self, user: UserId, f: impl FnOnce(&mut UserLedger) -> T) -> Result<T> {
        let mut ledger = self.users.get_mut(&user).ok_or(Error::UnknownUser)?;
        Ok(f(ledger.value_mut()))
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create_user(&self) -> Result<UserId> {
        let user = UserId::generate();
        self.users.insert(user, UserLedger::default());
        Ok(user)
    }

    fn highest_lifetime_balance(&self, user: UserId) -> Result<Decimal> {
        self.read(user, |ledger| ledger.highest_balance)
    }

    async fn record_lifetime_balance(&self, user: UserId, candidate: Decimal) -> Result<Decimal> {
        self.write(user, |ledger| {
            if candidate > ledger.highest_balance {
                ledger.highest_balance = candidate;
            }
            ledger.highest_balance
        })
    }
}

#[async_trait]
impl TransactionStore for MemoryStore {
    fn transactions_ascending(&self, user: UserId) -> Result<Vec<Transaction>> {
        self.read(user, |ledger| {
            ledger
                .transactions
                .iter()
                .map(|record| record.materialize(&ledger.categories))
                .collect()
        })
    }

    fn transactions_page(
        &self,
        user: UserId,
        category_name: Option<&str>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Transaction>> {
        self.read(user, |ledger| {
            ledger
                .transactions
                .iter()
                .map(|record| record.materialize(&ledger.categories))
                .filter(|transaction| match category_name {
                    Some(name) => transaction
                        .category
                        .as_ref()
                        .is_some_and(|category| category.name == name),
                    None => true,
                })
                .skip(offset)
                .take(limit)
                .collect()
        })
    }

    fn transaction(&self, user: UserId, id: i64) -> Result<Option<Transaction>> {
        self.read(user, |ledger| {
            ledger
                .transactions
                .iter()
                .find(|record| record.id == id)
                .map(|record| record.materialize(&ledger.categories))
        })
    }

    fn latest_transaction_date(&self, user: UserId) -> Result<Option<NaiveDateTime>> {
        self.read(user, |ledger| {
            ledger.transactions.last().map(|record| record.date)
        })
    }

    async fn insert_transaction(&self, user: UserId, new: &NewTransaction) -> Result<Transaction> {
        self.write(user, |ledger| {
            ledger.counters.transactions += 1;
            let record = TransactionRecord {
                id: ledger.counters.transactions,
                date: new.date,
                amount: new.amount,
                description: new.description.clone(),
                external_iban: new.external_iban.clone(),
                kind: new.kind,
                // Categorization is a separate step in the posting chain.
                category_id: None,
            };
            let transaction = record.materialize(&ledger.categories);
            ledger.insert_transaction_sorted(record);
            transaction
        })
    }

    async fn apply_transaction_update(
        &self,
        user: UserId,
        id: i64,
        update: &TransactionUpdate,
    ) -> Result<Option<Transaction>> {
        self.write(user, |ledger| {
            let index = ledger.transactions.iter().position(|t| t.id == id)?;
            {
                let record = &mut ledger.transactions[index];
                if let Some(date) = update.date {
                    record.date = date;
                }
                if let Some(amount) = update.amount {
                    record.amount = amount;
                }
                if let Some(ref description) = update.description {
                    record.description = description.clone();
                }
                if let Some(ref external_iban) = update.external_iban {
                    record.external_iban = external_iban.clone();
                }
                if let Some(kind) = update.kind {
                    record.kind = kind;
                }
            }
            if update.date.is_some() {
                ledger.transactions.sort_by_key(|t| (t.date, t.id));
            }
            let record = ledger.transactions.iter().find(|t| t.id == id)?;
            Some(record.materialize(&ledger.categories))
        })
    }

    async fn set_transaction_category(
        &self,
        user: UserId,
        transaction_id: i64,
        category_id: Option<i64>,
    ) -> Result<bool> {
        self.write(user, |ledger| {
            match ledger
                .transactions
                .iter_mut()
                .find(|t| t.id == transaction_id)
            {
                Some(record) => {
                    record.category_id = category_id;
                    true
                }
                None => false,
            }
        })
    }

    async fn delete_transaction(&self, user: UserId, id: i64) -> Result<bool> {
        self.write(user, |ledger| {
            let before = ledger.transactions.len();
            ledger.transactions.retain(|t| t.id != id);
            ledger.transactions.len() < before
        })
    }
}

#[async_trait]
impl CategoryStore for MemoryStore {
    fn categories(&self, user: UserId) -> Result<Vec<Category>> {
        self.read(user, |ledger| ledger.categories.clone())
    }

    fn category(&self, user: UserId, id: i64) -> Result<Option<Category>> {
        self.read(user, |ledger| {
            ledger.categories.iter().find(|c| c.id == id).cloned()
        })
    }

    async fn insert_category(&self, user: UserId, name: &str) -> Result<Category> {
        self.write(user, |ledger| {
            ledger.counters.categories += 1;
            let category = Category {
                id: ledger.counters.categories,
                name: name.to_string(),
            };
            ledger.categories.push(category.clone());
            category
        })
    }

    async fn rename_category(
        &self,
        user: UserId,
        id: i64,
        name: &str,
    ) -> Result<Option<Category>> {
        self.write(user, |ledger| {
            let category = ledger.categories.iter_mut().find(|c| c.id == id)?;
            category.name = name.to_string();
            Some(category.clone())
        })
    }

    async fn delete_category(&self, user: UserId, id: i64) -> Result<bool> {
        self.write(user, |ledger| {
            let before = ledger.categories.len();
            ledger.categories.retain(|c| c.id != id);
            if ledger.categories.len() == before {
                return false;
            }
            for record in &mut ledger.transactions {
                if record.category_id == Some(id) {
                    record.category_id = None;
                }
            }
            true
        })
    }
}

#[async_trait]
impl CategoryRuleStore for MemoryStore {
    fn category_rules(&self, user: UserId) -> Result<Vec<CategoryRule>> {
        self.read(user, |ledger| ledger.category_rules.clone())
    }

    fn category_rule(&self, user: UserId, id: i64) -> Result<Option<CategoryRule>> {
        self.read(user, |ledger| {
            ledger.category_rules.iter().find(|r| r.id == id).cloned()
        })
    }

    async fn insert_category_rule(
        &self,
        user: UserId,
        new: &NewCategoryRule,
    ) -> Result<CategoryRule> {
        self.write(user, |ledger| {
            ledger.counters.category_rules += 1;
            let rule = CategoryRule {
                id: ledger.counters.category_rules,
                description: new.description.clone(),
                iban: new.iban.clone(),
                kind: new.kind.clone(),
                category_id: new.category_id,
                apply_on_history: new.apply_on_history,
            };
            ledger.category_rules.push(rule.clone());
            rule
        })
    }

    async fn apply_category_rule_update(
        &self,
        user: UserId,
        id: i64,
        update: &CategoryRuleUpdate,
    ) -> Result<Option<CategoryRule>> {
        self.write(user, |ledger| {
            let rule = ledger.category_rules.iter_mut().find(|r| r.id == id)?;
            if let Some(ref description) = update.description {
                rule.description = description.clone();
            }
            if let Some(ref iban) = update.iban {
                rule.iban = iban.clone();
            }
            if let Some(ref kind) = update.kind {
                rule.kind = kind.clone();
            }
            if let Some(category_id) = update.category_id {
                rule.category_id = category_id;
            }
            Some(rule.clone())
        })
    }

    async fn delete_category_rule(&self, user: UserId, id: i64) -> Result<bool> {
        self.write(user, |ledger| {
            let before = ledger.category_rules.len();
            ledger.category_rules.retain(|r| r.id != id);
            ledger.category_rules.len() < before
        })
    }
}

#[async_trait]
impl SavingGoalStore for MemoryStore {
    fn saving_goals(&self, user: UserId) -> Result<Vec<SavingGoal>> {
        self.read(user, |ledger| ledger.saving_goals.clone())
    }

    fn saving_goal(&self, user: UserId, id: i64) -> Result<Option<SavingGoal>> {
        self.read(user, |ledger| {
            ledger.saving_goals.iter().find(|g| g.id == id).cloned()
        })
    }

    async fn insert_saving_goal(
        &self,
        user: UserId,
        new: &NewSavingGoal,
        creation_date: NaiveDateTime,
    ) -> Result<SavingGoal> {
        self.write(user, |ledger| {
            ledger.counters.saving_goals += 1;
            let goal = SavingGoal {
                id: ledger.counters.saving_goals,
                creation_date,
                deletion_date: None,
                name: new.name.clone(),
                goal: new.goal,
                save_per_month: new.save_per_month,
                min_balance_required: new.min_balance_required,
                balance: Decimal::ZERO,
            };
            ledger.saving_goals.push(goal.clone());
            goal
        })
    }

    async fn mark_saving_goal_deleted(
        &self,
        user: UserId,
        id: i64,
        deletion_date: NaiveDateTime,
    ) -> Result<bool> {
        self.write(user, |ledger| {
            match ledger.saving_goals.iter_mut().find(|g| g.id == id) {
                Some(goal) => {
                    goal.deletion_date = Some(deletion_date);
                    true
                }
                None => false,
            }
        })
    }
}

#[async_trait]
impl PaymentRequestStore for MemoryStore {
    fn payment_requests(&self, user: UserId) -> Result<Vec<PaymentRequest>> {
        self.read(user, |ledger| {
            ledger
                .payment_requests
                .iter()
                .map(|record| record.materialize(ledger))
                .collect()
        })
    }

    async fn insert_payment_request(
        &self,
        user: UserId,
        new: &NewPaymentRequest,
    ) -> Result<PaymentRequest> {
        self.write(user, |ledger| {
            ledger.counters.payment_requests += 1;
            let record = RequestRecord {
                id: ledger.counters.payment_requests,
                description: new.description.clone(),
                due_date: new.due_date,
                amount: new.amount,
                number_of_requests: new.number_of_requests,
                // A request for zero payments is trivially filled.
                filled: new.number_of_requests == 0,
                transaction_ids: Vec::new(),
            };
            let request = record.materialize(ledger);
            ledger.payment_requests.push(record);
            request
        })
    }

    async fn link_transaction_to_request(
        &self,
        user: UserId,
        request_id: i64,
        transaction_id: i64,
    ) -> Result<usize> {
        self.write(user, |ledger| {
            match ledger
                .payment_requests
                .iter_mut()
                .find(|r| r.id == request_id)
            {
                Some(record) => {
                    record.transaction_ids.push(transaction_id);
                    record.transaction_ids.len()
                }
                None => 0,
            }
        })
    }

    async fn mark_payment_request_filled(&self, user: UserId, request_id: i64) -> Result<bool> {
        self.write(user, |ledger| {
            match ledger
                .payment_requests
                .iter_mut()
                .find(|r| r.id == request_id)
            {
                Some(record) => {
                    record.filled = true;
                    true
                }
                None => false,
            }
        })
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    fn all_messages(&self, user: UserId) -> Result<Vec<UserMessage>> {
        self.read(user, |ledger| ledger.messages.clone())
    }

    fn unread_messages(&self, user: UserId) -> Result<Vec<UserMessage>> {
        self.read(user, |ledger| {
            ledger
                .messages
                .iter()
                .filter(|m| !m.read)
                .cloned()
                .collect()
        })
    }

    fn user_message(&self, user: UserId, id: i64) -> Result<Option<UserMessage>> {
        self.read(user, |ledger| {
            ledger.messages.iter().find(|m| m.id == id).cloned()
        })
    }

    async fn append_message(
        &self,
        user: UserId,
        kind: MessageKind,
        text: &str,
        date: NaiveDateTime,
    ) -> Result<UserMessage> {
        self.write(user, |ledger| {
            ledger.counters.messages += 1;
            let message = UserMessage {
                id: ledger.counters.messages,
                message: text.to_string(),
                date,
                read: false,
                kind,
            };
            ledger.messages.push(message.clone());
            message
        })
    }

    async fn mark_message_read(&self, user: UserId, id: i64) -> Result<bool> {
        self.write(user, |ledger| {
            match ledger.messages.iter_mut().find(|m| m.id == id) {
                Some(message) => {
                    message.read = true;
                    true
                }
                None => false,
            }
        })
    }

    fn message_rules(&self, user: UserId) -> Result<Vec<MessageRule>> {
        self.read(user, |ledger| ledger.message_rules.clone())
    }

    async fn insert_message_rule(
        &self,
        user: UserId,
        new: &NewMessageRule,
    ) -> Result<MessageRule> {
        self.write(user, |ledger| {
            ledger.counters.message_rules += 1;
            let rule = MessageRule {
                id: ledger.counters.message_rules,
                category_id: new.category_id,
                kind: new.kind,
                value: new.value,
            };
            ledger.message_rules.push(rule.clone());
            rule
        })
    }
}
