use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateCriterionPayload {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(range(min = 0))]
    pub display_order: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateCriterionPayload {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(range(min = 0))]
    pub display_order: i32,
}
