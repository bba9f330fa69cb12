mod common;

use axum::http::StatusCode;
use hiring_scorecard::error::Error;
use sqlx::PgPool;
use tokio_test::assert_ok;

use common::{create_candidate, create_job, create_question, send, storage_state};

async fn count(pool: &PgPool, table: &str, column: &str, id: i64) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {} WHERE {} = $1", table, column))
        .bind(id)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn deleting_a_job_removes_everything_under_it() {
    let state = storage_state().await;
    let job = create_job(&state, "Full Stack", &["Frontend", "Backend"]).await;
    let job_id = job.job.id;
    let frontend = job.criteria_list[0].id;
    let question = create_question(&state, job_id, frontend, "Explain hydration.").await;
    let candidate = create_candidate(&state, job_id, "Ann").await;
    assert_ok!(state.evaluation_service.upsert(candidate.id, frontend, 9, None).await);
    assert_ok!(state.answer_service.upsert(candidate.id, question.id, "SSR then attach").await);

    assert_ok!(state.job_service.delete(job_id).await);

    let pool = &state.pool;
    assert_eq!(count(pool, "jobs", "id", job_id).await, 0);
    assert_eq!(count(pool, "criteria", "job_id", job_id).await, 0);
    assert_eq!(count(pool, "questions", "job_id", job_id).await, 0);
    assert_eq!(count(pool, "candidates", "job_id", job_id).await, 0);
    assert_eq!(count(pool, "evaluations", "candidate_id", candidate.id).await, 0);
    assert_eq!(count(pool, "answers", "candidate_id", candidate.id).await, 0);

    assert!(matches!(
        state.job_service.delete(job_id).await,
        Err(Error::NotFound(_))
    ));
}

#[tokio::test]
async fn deleting_a_candidate_removes_their_answers_and_scores() {
    let state = storage_state().await;
    let job = create_job(&state, "Support", &["Empathy"]).await;
    let criterion = job.criteria_list[0].id;
    let question = create_question(&state, job.job.id, criterion, "Worst ticket?").await;
    let candidate = create_candidate(&state, job.job.id, "Bob").await;
    assert_ok!(state.evaluation_service.upsert(candidate.id, criterion, 5, None).await);
    assert_ok!(state.answer_service.upsert(candidate.id, question.id, "A refund").await);

    assert_ok!(state.candidate_service.delete(candidate.id).await);

    let pool = &state.pool;
    assert_eq!(count(pool, "evaluations", "candidate_id", candidate.id).await, 0);
    assert_eq!(count(pool, "answers", "candidate_id", candidate.id).await, 0);
    // the criterion is free again once its only score is gone
    assert_ok!(state.question_service.delete(question.id).await);
    assert_ok!(state.criteria_service.delete(criterion).await);
}

#[tokio::test]
async fn job_lifecycle_over_http() {
    let state = storage_state().await;
    let app = hiring_scorecard::app(state);

    let (status, body) = send(
        &app,
        "POST",
        "/api/jobs",
        Some(serde_json::json!({
            "title": "  Site Reliability Engineer ",
            "criteria": ["Incident Response", "Automation"]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["title"], "Site Reliability Engineer");
    assert_eq!(body["criteria_list"][1]["name"], "Automation");
    assert_eq!(body["criteria_list"][1]["display_order"], 1);
    let job_id = body["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "POST",
        "/api/candidates",
        Some(serde_json::json!({ "job_id": job_id, "name": "Eve", "email": "eve@example.com" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let candidate_id = body["id"].as_i64().unwrap();

    let (status, body) = send(&app, "GET", &format!("/api/jobs/{}/criteria", job_id), None).await;
    assert_eq!(status, StatusCode::OK);
    let criterion_id = body[0]["id"].as_i64().unwrap();
    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/candidates/{}/evaluations/{}", candidate_id, criterion_id),
        Some(serde_json::json!({ "score": 8 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "GET", &format!("/api/jobs/{}/candidates", job_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["id"], candidate_id);
    assert_eq!(body[0]["job_title"], "Site Reliability Engineer");

    let (status, _) = send(&app, "DELETE", &format!("/api/jobs/{}", job_id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, "GET", &format!("/api/jobs/{}", job_id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());

    let (status, _) = send(&app, "GET", &format!("/api/candidates/{}", candidate_id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
