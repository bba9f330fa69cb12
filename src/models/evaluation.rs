use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

pub const MIN_SCORE: i32 = 1;
pub const MAX_SCORE: i32 = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Evaluation {
    pub id: i64,
    pub candidate_id: i64,
    pub criterion_id: i64,
    pub criterion_name: String,
    pub score: i32,
    pub comments: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Per-candidate comparison row for a job. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationSummary {
    pub candidate_id: i64,
    pub candidate_name: String,
    pub job_title: String,
    pub evaluations: Vec<Evaluation>,
    pub average_score: f64,
    /// Criterion name to score, consumed by the radar chart.
    pub chart_data: BTreeMap<String, i32>,
}
