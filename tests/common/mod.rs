#![allow(dead_code)]

use std::env;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value as JsonValue;
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;

use hiring_scorecard::{
    database::pool::{connect, run_migrations},
    dto::{candidate_dto::CreateCandidatePayload, job_dto::CreateJobPayload, question_dto::CreateQuestionPayload},
    models::{candidate::Candidate, job::JobWithCriteria, question::Question},
    services::template_service::TemplateService,
    AppState,
};

pub const TEMPLATES: &str = "data/job_templates.json";

/// State backed by the database in `DATABASE_URL`, with migrations applied.
pub async fn storage_state() -> AppState {
    dotenvy::dotenv().ok();
    let url = env::var("DATABASE_URL").expect("DATABASE_URL must be set to run storage tests");

    let pool = connect(&url, 5).await.expect("connect");
    run_migrations(&pool).await.expect("migrations");
    AppState::new(pool, TemplateService::load(TEMPLATES).expect("templates"))
}

/// State whose pool never connects. Good for requests rejected before storage.
pub fn lazy_state() -> AppState {
    let pool = PgPoolOptions::new()
        .connect_lazy("postgres://scorecard@127.0.0.1:1/unused")
        .expect("lazy pool");
    AppState::new(pool, TemplateService::load(TEMPLATES).expect("templates"))
}

pub async fn create_job(state: &AppState, title: &str, criteria: &[&str]) -> JobWithCriteria {
    state
        .job_service
        .create(CreateJobPayload {
            title: title.to_string(),
            description: Some("Test job".into()),
            requirements: None,
            criteria: criteria.iter().map(|c| c.to_string()).collect(),
        })
        .await
        .expect("create job")
}

pub async fn create_candidate(state: &AppState, job_id: i64, name: &str) -> Candidate {
    state
        .candidate_service
        .create(CreateCandidatePayload {
            job_id,
            name: name.to_string(),
            email: None,
            phone: None,
            description: None,
        })
        .await
        .expect("create candidate")
}

pub async fn create_question(state: &AppState, job_id: i64, criterion_id: i64, text: &str) -> Question {
    state
        .question_service
        .create(CreateQuestionPayload {
            job_id,
            criterion_id,
            text: text.to_string(),
        })
        .await
        .expect("create question")
}

pub async fn send(app: &Router, method: &str, uri: &str, body: Option<JsonValue>) -> (StatusCode, JsonValue) {
    let builder = Request::builder().method(method).uri(uri);
    let req = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let json = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}
