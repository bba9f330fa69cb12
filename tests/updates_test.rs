mod common;

use axum::http::StatusCode;
use hiring_scorecard::{
    dto::{candidate_dto::UpdateCandidatePayload, job_dto::UpdateJobPayload},
    error::Error,
};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};

use common::{create_candidate, create_job, send, storage_state};

#[tokio::test]
async fn job_update_replaces_every_field() {
    let state = storage_state().await;
    let job = create_job(&state, "Backend", &["Technical"]).await;
    assert_eq!(job.job.description.as_deref(), Some("Test job"));

    let updated = assert_ok!(
        state
            .job_service
            .update(
                job.job.id,
                UpdateJobPayload {
                    title: "Senior Backend".into(),
                    description: None,
                    requirements: Some("Rust".into()),
                },
            )
            .await
    );
    assert_eq!(updated.title, "Senior Backend");
    assert_eq!(updated.description, None);
    assert_eq!(updated.requirements.as_deref(), Some("Rust"));

    let err = assert_err!(
        state
            .job_service
            .update(
                i64::MAX,
                UpdateJobPayload {
                    title: "Ghost".into(),
                    description: None,
                    requirements: None,
                },
            )
            .await
    );
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn candidate_update_can_clear_contact_fields() {
    let state = storage_state().await;
    let job = create_job(&state, "Support", &["Empathy"]).await;
    let candidate = create_candidate(&state, job.job.id, "Ann").await;
    let app = hiring_scorecard::app(state.clone());

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/candidates/{}", candidate.id),
        Some(json!({ "name": "Ann", "email": "ann@example.com", "phone": "+100" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "ann@example.com");

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/candidates/{}", candidate.id),
        Some(json!({ "name": "Ann Lee", "email": "", "phone": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Ann Lee");
    assert!(body["email"].is_null());
    assert!(body["phone"].is_null());
    assert_eq!(body["job_id"], job.job.id);

    let stored = assert_ok!(
        state
            .candidate_service
            .update(
                candidate.id,
                UpdateCandidatePayload {
                    name: "Ann Lee".into(),
                    email: None,
                    phone: None,
                    description: Some("Referred".into()),
                },
            )
            .await
    );
    assert_eq!(stored.email, None);
    assert_eq!(stored.description.as_deref(), Some("Referred"));
}

#[tokio::test]
async fn job_put_without_description_clears_it() {
    let state = storage_state().await;
    let job = create_job(&state, "Designer", &["Portfolio"]).await;
    let app = hiring_scorecard::app(state);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/jobs/{}", job.job.id),
        Some(json!({ "title": "Product Designer" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Product Designer");
    assert!(body["description"].is_null());

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/api/jobs/{}", job.job.id),
        Some(json!({ "title": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}
