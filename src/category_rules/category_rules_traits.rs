use async_trait::async_trait;

use crate::category_rules::category_rules_model::{
    CategoryRule, CategoryRuleUpdate, NewCategoryRule,
};
use crate::errors::Result;
use crate::store::UserId;

#[async_trait]
pub trait CategoryRuleServiceTrait: Send + Sync {
    fn get_rules(&self, user: UserId) -> Result<Vec<CategoryRule>>;
    fn get_rule(&self, user: UserId, id: i64) -> Result<CategoryRule>;
    /// Creates a rule; when `apply_on_history` is set and the target
    /// category exists, re-scans the full history and reassigns every match.
    async fn create_rule(&self, user: UserId, new_rule: NewCategoryRule) -> Result<CategoryRule>;
    async fn update_rule(
        &self,
        user: UserId,
        id: i64,
        update: CategoryRuleUpdate,
    ) -> Result<CategoryRule>;
    async fn delete_rule(&self, user: UserId, id: i64) -> Result<()>;
}
