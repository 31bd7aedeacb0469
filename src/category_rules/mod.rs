pub(crate) mod category_rules_model;
pub(crate) mod category_rules_service;
pub(crate) mod category_rules_traits;


pub use category_rules_model::{CategoryRule, CategoryRuleUpdate, NewCategoryRule};
pub use category_rules_service::CategoryRuleService;
pub use category_rules_traits::CategoryRuleServiceTrait;
