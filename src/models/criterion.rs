use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Criterion {
    pub id: i64,
    pub job_id: i64,
    pub name: String,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Rows that keep a criterion from being deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CriterionDependents {
    pub criterion_id: i64,
    pub criterion_name: String,
    pub questions: i64,
    pub evaluations: i64,
}

impl CriterionDependents {
    pub fn is_empty(&self) -> bool {
        self.questions == 0 && self.evaluations == 0
    }
}
