use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerInput {
    pub question_id: i64,
    #[serde(default)]
    pub answer_text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertAnswerPayload {
    #[serde(default)]
    pub answer_text: String,
}
