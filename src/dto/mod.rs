pub mod answer_dto;
pub mod candidate_dto;
pub mod criteria_dto;
pub mod evaluation_dto;
pub mod job_dto;
pub mod question_dto;

use serde::Deserialize;

/// Trims an optional string and turns blank input into `None`.
pub(crate) fn trim_optional_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    Ok(opt.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }))
}
