use async_trait::async_trait;

use crate::errors::Result;
use crate::saving_goals::saving_goals_model::{NewSavingGoal, SavingGoal};
use crate::store::UserId;

#[async_trait]
pub trait SavingGoalServiceTrait: Send + Sync {
    /// Active goals with their accumulated balances derived by replay.
    fn get_goals(&self, user: UserId) -> Result<Vec<SavingGoal>>;
    async fn create_goal(&self, user: UserId, new_goal: NewSavingGoal) -> Result<SavingGoal>;
    /// Marks the goal deleted as of the latest transaction date; the next
    /// replay that crosses that date flushes its balance back.
    async fn delete_goal(&self, user: UserId, id: i64) -> Result<()>;
}
