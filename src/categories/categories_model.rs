use serde::{Deserialize, Serialize};

/// A user-defined spending category. Categories have an independent
/// lifecycle: unassigning one from a transaction does not delete it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Input model for creating a new category
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub name: String,
}
