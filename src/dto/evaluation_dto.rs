use serde::{Deserialize, Serialize};
use validator::Validate;

use super::trim_optional_string;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EvaluationInput {
    pub criterion_id: i64,
    #[validate(range(min = 1, max = 10))]
    pub score: i32,
    #[serde(default, deserialize_with = "trim_optional_string")]
    pub comments: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpsertEvaluationPayload {
    #[validate(range(min = 1, max = 10))]
    pub score: i32,
    #[serde(default, deserialize_with = "trim_optional_string")]
    pub comments: Option<String>,
}
