use std::collections::HashSet;

use crate::error::{Error, Result};
use crate::models::evaluation::{MAX_SCORE, MIN_SCORE};

/// Trims `value` and rejects it when nothing is left.
pub fn require_non_empty(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::BadRequest(format!("{} must not be empty", field)));
    }
    Ok(trimmed.to_string())
}

pub fn ensure_score(score: i32) -> Result<()> {
    if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
        return Err(Error::BadRequest(format!(
            "score must be between {} and {}, got {}",
            MIN_SCORE, MAX_SCORE, score
        )));
    }
    Ok(())
}

/// Criterion names compare case-insensitively after trimming.
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Trims every name and rejects empty or repeated entries.
pub fn normalize_criterion_names(names: &[String]) -> Result<Vec<String>> {
    let mut seen = HashSet::with_capacity(names.len());
    let mut normalized = Vec::with_capacity(names.len());
    for (position, name) in names.iter().enumerate() {
        let name = require_non_empty(&format!("criteria[{}]", position), name)?;
        if !seen.insert(name_key(&name)) {
            return Err(Error::BadRequest(format!(
                "duplicate criterion name '{}'",
                name
            )));
        }
        normalized.push(name);
    }
    Ok(normalized)
}

/// Rejects a batch that names the same id twice.
pub fn ensure_unique_ids(field: &str, ids: impl IntoIterator<Item = i64>) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(Error::BadRequest(format!("{} {} appears more than once", field, id)));
        }
    }
    Ok(())
}
