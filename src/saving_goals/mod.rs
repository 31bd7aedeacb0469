pub(crate) mod saving_goals_model;
pub(crate) mod saving_goals_service;
pub(crate) mod saving_goals_traits;


pub use saving_goals_model::{NewSavingGoal, SavingGoal};
pub use saving_goals_service::SavingGoalService;
pub use saving_goals_traits::SavingGoalServiceTrait;
