use async_trait::async_trait;
use log::debug;
use std::sync::Arc;

use crate::category_rules::category_rules_model::{
    CategoryRule, CategoryRuleUpdate, NewCategoryRule,
};
use crate::category_rules::category_rules_traits::CategoryRuleServiceTrait;
use crate::errors::{EntityKind, Error, Result};
use crate::store::{CategoryRuleStore, CategoryStore, TransactionStore, UserId};

pub struct CategoryRuleService<S> {
    store: Arc<S>,
}

impl<S: CategoryRuleStore + CategoryStore + TransactionStore> CategoryRuleService<S> {
    pub fn new(store: Arc<S>) -> Self {
        CategoryRuleService { store }
    }
}

#[async_trait]
impl<S: CategoryRuleStore + CategoryStore + TransactionStore> CategoryRuleServiceTrait
    for CategoryRuleService<S>
{
    fn get_rules(&self, user: UserId) -> Result<Vec<CategoryRule>> {
        self.store.category_rules(user)
    }

    fn get_rule(&self, user: UserId, id: i64) -> Result<CategoryRule> {
        self.store
            .category_rule(user, id)?
            .ok_or(Error::NotFound(EntityKind::CategoryRule, id))
    }

    async fn create_rule(&self, user: UserId, new_rule: NewCategoryRule) -> Result<CategoryRule> {
        let rule = self.store.insert_category_rule(user, &new_rule).await?;

        // Retroactive application: same predicate as live matching, and a
        // match always overwrites any category assigned earlier.
        if rule.apply_on_history && self.store.category(user, rule.category_id)?.is_some() {
            let mut reassigned = 0usize;
            for transaction in self.store.transactions_ascending(user)? {
                if rule.matches(&transaction) {
                    self.store
                        .set_transaction_category(user, transaction.id, Some(rule.category_id))
                        .await?;
                    reassigned += 1;
                }
            }
            debug!(
                "rule {} retroactively categorized {} transactions for user {}",
                rule.id, reassigned, user
            );
        }

        Ok(rule)
    }

    async fn update_rule(
        &self,
        user: UserId,
        id: i64,
        update: CategoryRuleUpdate,
    ) -> Result<CategoryRule> {
        self.store
            .apply_category_rule_update(user, id, &update)
            .await?
            .ok_or(Error::NotFound(EntityKind::CategoryRule, id))
    }

    async fn delete_rule(&self, user: UserId, id: i64) -> Result<()> {
        if !self.store.delete_category_rule(user, id).await? {
            return Err(Error::NotFound(EntityKind::CategoryRule, id));
        }
        Ok(())
    }
}
