pub(crate) mod balance_model;
pub(crate) mod balance_service;
pub(crate) mod balance_traits;
pub(crate) mod replay_calculator;

#[cfg(test)]
mod replay_calculator_tests;

pub use balance_model::BalanceCandlestick;
pub use balance_service::BalanceService;
pub use balance_traits::BalanceServiceTrait;
pub use replay_calculator::{replay, ReplayOutcome};
