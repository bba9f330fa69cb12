use serde::{Deserialize, Serialize};
use validator::Validate;

use super::trim_optional_string;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateJobPayload {
    #[validate(length(min = 1))]
    pub title: String,
    #[serde(default, deserialize_with = "trim_optional_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "trim_optional_string")]
    pub requirements: Option<String>,
    /// Initial criterion names, stored in the given order.
    #[serde(default)]
    pub criteria: Vec<String>,
}

/// Full replacement: omitted optional fields are cleared.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateJobPayload {
    #[validate(length(min = 1))]
    pub title: String,
    #[serde(default, deserialize_with = "trim_optional_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "trim_optional_string")]
    pub requirements: Option<String>,
}
