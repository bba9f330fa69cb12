use axum::{
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde_json::json;

use crate::models::criterion::CriterionDependents;

pub type Result<T> = std::result::Result<T, Error>;

// SQLSTATE codes surfaced by the schema constraints.
const FOREIGN_KEY_VIOLATION: &str = "23503";
const UNIQUE_VIOLATION: &str = "23505";
const CHECK_VIOLATION: &str = "23514";

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {message}")]
    Conflict {
        message: String,
        dependents: Option<CriterionDependents>,
    },

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn not_found(entity: &str, id: i64) -> Self {
        Error::NotFound(format!("{} {} not found", entity, id))
    }

    pub fn blocked(dependents: CriterionDependents) -> Self {
        Error::Conflict {
            message: format!(
                "cannot delete criterion '{}': it has {} questions and {} evaluations",
                dependents.criterion_name, dependents.questions, dependents.evaluations
            ),
            dependents: Some(dependents),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Error::BadRequest(_) | Error::Validation(_) | Error::Json(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Conflict { .. } => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let body = match self {
            Error::Conflict {
                message,
                dependents: Some(dependents),
            } => json!({ "error": message, "dependents": dependents }),
            Error::BadRequest(msg) | Error::NotFound(msg) => json!({ "error": msg }),
            Error::Conflict { message, .. } => json!({ "error": message }),
            Error::Validation(err) => json!({ "error": err.to_string() }),
            Error::Json(err) => json!({ "error": err.to_string() }),
            other => {
                tracing::error!(error = ?other, "request failed");
                json!({ "error": "An unexpected error occurred" })
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::RowNotFound = err {
            return Error::NotFound("Resource not found".to_string());
        }

        let code = err
            .as_database_error()
            .and_then(|db| db.code())
            .map(|code| code.into_owned());

        match code.as_deref() {
            Some(CHECK_VIOLATION) => Error::BadRequest(constraint_message(&err, "value out of range")),
            Some(UNIQUE_VIOLATION) => Error::Conflict {
                message: constraint_message(&err, "record already exists"),
                dependents: None,
            },
            Some(FOREIGN_KEY_VIOLATION) => Error::Conflict {
                message: constraint_message(&err, "record is referenced by or references a missing record"),
                dependents: None,
            },
            _ => Error::Database(err),
        }
    }
}

fn constraint_message(err: &sqlx::Error, fallback: &str) -> String {
    match err.as_database_error().and_then(|db| db.constraint()) {
        Some(constraint) => format!("{} ({})", fallback, constraint),
        None => fallback.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_maps_to_not_found() {
        let err: Error = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn other_storage_errors_stay_opaque() {
        let err: Error = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, Error::Database(_)));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn blocked_criterion_reports_counts() {
        let err = Error::blocked(CriterionDependents {
            criterion_id: 4,
            criterion_name: "Leadership".into(),
            questions: 2,
            evaluations: 3,
        });
        assert_eq!(err.status(), StatusCode::CONFLICT);
        assert_eq!(
            err.to_string(),
            "Conflict: cannot delete criterion 'Leadership': it has 2 questions and 3 evaluations"
        );
    }

    #[tokio::test]
    async fn conflict_body_carries_dependents() {
        let resp = Error::blocked(CriterionDependents {
            criterion_id: 4,
            criterion_name: "Leadership".into(),
            questions: 2,
            evaluations: 0,
        })
        .into_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["error"].as_str().unwrap().contains("Leadership"));
        assert_eq!(body["dependents"]["criterion_id"], 4);
        assert_eq!(body["dependents"]["questions"], 2);
        assert_eq!(body["dependents"]["evaluations"], 0);
    }

    #[test]
    fn not_found_helper_names_entity() {
        let err = Error::not_found("Candidate", 12);
        assert_eq!(err.to_string(), "Not found: Candidate 12 not found");
    }
}
