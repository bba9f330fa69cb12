use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use validator::Validate;

use crate::{
    dto::evaluation_dto::{EvaluationInput, UpsertEvaluationPayload},
    error::Result,
    models::evaluation::{Evaluation, EvaluationSummary},
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/candidates/{id}/evaluations",
    params(
        ("id" = i64, Path, description = "Candidate ID")
    ),
    responses(
        (status = 200, description = "Scores in criterion display order", body = [Evaluation]),
        (status = 404, description = "Candidate not found")
    )
)]
#[axum::debug_handler]
pub async fn list_evaluations(
    State(state): State<AppState>,
    Path(candidate_id): Path<i64>,
) -> Result<impl IntoResponse> {
    let evaluations = state.evaluation_service.list(candidate_id).await?;
    Ok(Json(evaluations))
}

#[utoipa::path(
    post,
    path = "/api/candidates/{id}/evaluations",
    params(
        ("id" = i64, Path, description = "Candidate ID")
    ),
    request_body = [EvaluationInput],
    responses(
        (status = 200, description = "The candidate's full score set after replacement", body = [Evaluation]),
        (status = 400, description = "Score outside 1..=10 or criterion scored twice"),
        (status = 404, description = "Candidate or criterion not found")
    )
)]
#[axum::debug_handler]
pub async fn save_evaluations(
    State(state): State<AppState>,
    Path(candidate_id): Path<i64>,
    Json(evaluations): Json<Vec<EvaluationInput>>,
) -> Result<impl IntoResponse> {
    for evaluation in &evaluations {
        evaluation.validate()?;
    }
    let saved = state
        .evaluation_service
        .save_all(candidate_id, &evaluations)
        .await?;
    Ok(Json(saved))
}

#[utoipa::path(
    put,
    path = "/api/candidates/{id}/evaluations/{criterion_id}",
    params(
        ("id" = i64, Path, description = "Candidate ID"),
        ("criterion_id" = i64, Path, description = "Criterion ID")
    ),
    request_body = UpsertEvaluationPayload,
    responses(
        (status = 200, description = "Score stored", body = Json<Evaluation>),
        (status = 400, description = "Score outside 1..=10"),
        (status = 404, description = "Candidate or criterion not found")
    )
)]
#[axum::debug_handler]
pub async fn upsert_evaluation(
    State(state): State<AppState>,
    Path((candidate_id, criterion_id)): Path<(i64, i64)>,
    Json(payload): Json<UpsertEvaluationPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let evaluation = state
        .evaluation_service
        .upsert(candidate_id, criterion_id, payload.score, payload.comments)
        .await?;
    Ok(Json(evaluation))
}

#[utoipa::path(
    delete,
    path = "/api/evaluations/{id}",
    params(
        ("id" = i64, Path, description = "Evaluation ID")
    ),
    responses(
        (status = 204, description = "Evaluation deleted"),
        (status = 404, description = "Evaluation not found")
    )
)]
#[axum::debug_handler]
pub async fn delete_evaluation(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    state.evaluation_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/api/jobs/{id}/evaluations/summary",
    params(
        ("id" = i64, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "One row per candidate, best average first", body = [EvaluationSummary]),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn job_summary(
    State(state): State<AppState>,
    Path(job_id): Path<i64>,
) -> Result<impl IntoResponse> {
    let summaries = state.summary_service.summarize(job_id).await?;
    Ok(Json(summaries))
}
