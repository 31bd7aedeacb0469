use async_trait::async_trait;
use std::sync::Arc;

use crate::balance::BalanceService;
use crate::errors::{EntityKind, Error, Result};
use crate::intervals::EPOCH;
use crate::saving_goals::saving_goals_model::{NewSavingGoal, SavingGoal};
use crate::saving_goals::saving_goals_traits::SavingGoalServiceTrait;
use crate::store::{LedgerStore, UserId};

/// Saving-goal lifecycle. Creation and deletion dates are pinned to the
/// user's latest transaction date (or the epoch without history) so the
/// replay can tell which calendar months a goal participates in; balances
/// are never stored, only derived.
pub struct SavingGoalService<S> {
    store: Arc<S>,
    balance: BalanceService<S>,
}

impl<S: LedgerStore> SavingGoalService<S> {
    pub fn new(store: Arc<S>) -> Self {
        SavingGoalService {
            balance: BalanceService::new(store.clone()),
            store,
        }
    }
}

#[async_trait]
impl<S: LedgerStore> SavingGoalServiceTrait for SavingGoalService<S> {
    fn get_goals(&self, user: UserId) -> Result<Vec<SavingGoal>> {
        Ok(self
            .balance
            .replayed_goals(user)?
            .into_iter()
            .filter(|goal| goal.deletion_date.is_none())
            .collect())
    }

    async fn create_goal(&self, user: UserId, new_goal: NewSavingGoal) -> Result<SavingGoal> {
        new_goal.validate()?;
        let creation_date = self.store.latest_transaction_date(user)?.unwrap_or(EPOCH);
        self.store
            .insert_saving_goal(user, &new_goal, creation_date)
            .await
    }

    async fn delete_goal(&self, user: UserId, id: i64) -> Result<()> {
        let deletion_date = self.store.latest_transaction_date(user)?.unwrap_or(EPOCH);
        if !self
            .store
            .mark_saving_goal_deleted(user, id, deletion_date)
            .await?
        {
            return Err(Error::NotFound(EntityKind::SavingGoal, id));
        }
        Ok(())
    }
}
