use serde::{Deserialize, Serialize};
use validator::Validate;

use super::trim_optional_string;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCandidatePayload {
    pub job_id: i64,
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default, deserialize_with = "trim_optional_string")]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "trim_optional_string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "trim_optional_string")]
    pub description: Option<String>,
}

/// Full replacement: omitted optional fields are cleared. The job stays fixed.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateCandidatePayload {
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default, deserialize_with = "trim_optional_string")]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "trim_optional_string")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "trim_optional_string")]
    pub description: Option<String>,
}
