use async_trait::async_trait;

use crate::categories::categories_model::{Category, NewCategory};
use crate::errors::Result;
use crate::store::UserId;

#[async_trait]
pub trait CategoryServiceTrait: Send + Sync {
    fn get_categories(&self, user: UserId, limit: usize, offset: usize) -> Result<Vec<Category>>;
    fn get_category(&self, user: UserId, id: i64) -> Result<Category>;
    async fn create_category(&self, user: UserId, new_category: NewCategory) -> Result<Category>;
    async fn rename_category(&self, user: UserId, id: i64, name: &str) -> Result<Category>;
    async fn delete_category(&self, user: UserId, id: i64) -> Result<()>;
}
