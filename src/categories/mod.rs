pub(crate) mod categories_model;
pub(crate) mod categories_service;
pub(crate) mod categories_traits;

pub use categories_model::{Category, NewCategory};
pub use categories_service::CategoryService;
pub use categories_traits::CategoryServiceTrait;
