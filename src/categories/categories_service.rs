use async_trait::async_trait;
use std::sync::Arc;

use crate::categories::categories_model::{Category, NewCategory};
use crate::categories::categories_traits::CategoryServiceTrait;
use crate::errors::{EntityKind, Error, Result, ValidationError};
use crate::store::{CategoryStore, UserId};

pub struct CategoryService<S> {
    store: Arc<S>,
}

impl<S: CategoryStore> CategoryService<S> {
    pub fn new(store: Arc<S>) -> Self {
        CategoryService { store }
    }
}

#[async_trait]
impl<S: CategoryStore> CategoryServiceTrait for CategoryService<S> {
    fn get_categories(&self, user: UserId, limit: usize, offset: usize) -> Result<Vec<Category>> {
        Ok(self
            .store
            .categories(user)?
            .into_iter()
            .skip(offset)
            .take(limit)
            .collect())
    }

    fn get_category(&self, user: UserId, id: i64) -> Result<Category> {
        self.store
            .category(user, id)?
            .ok_or(Error::NotFound(EntityKind::Category, id))
    }

    async fn create_category(&self, user: UserId, new_category: NewCategory) -> Result<Category> {
        if new_category.name.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "name".to_string(),
            )));
        }
        self.store.insert_category(user, &new_category.name).await
    }

    async fn rename_category(&self, user: UserId, id: i64, name: &str) -> Result<Category> {
        self.store
            .rename_category(user, id, name)
            .await?
            .ok_or(Error::NotFound(EntityKind::Category, id))
    }

    async fn delete_category(&self, user: UserId, id: i64) -> Result<()> {
        if !self.store.delete_category(user, id).await? {
            return Err(Error::NotFound(EntityKind::Category, id));
        }
        Ok(())
    }
}
