use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
};

use crate::{
    dto::answer_dto::{AnswerInput, UpsertAnswerPayload},
    error::Result,
    models::answer::Answer,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/candidates/{id}/answers",
    params(
        ("id" = i64, Path, description = "Candidate ID")
    ),
    responses(
        (status = 200, description = "Answers ordered by question", body = [Answer]),
        (status = 404, description = "Candidate not found")
    )
)]
#[axum::debug_handler]
pub async fn list_answers(
    State(state): State<AppState>,
    Path(candidate_id): Path<i64>,
) -> Result<impl IntoResponse> {
    let answers = state.answer_service.list(candidate_id).await?;
    Ok(Json(answers))
}

#[utoipa::path(
    post,
    path = "/api/candidates/{id}/answers",
    params(
        ("id" = i64, Path, description = "Candidate ID")
    ),
    request_body = [AnswerInput],
    responses(
        (status = 200, description = "The candidate's full answer set after replacement", body = [Answer]),
        (status = 400, description = "Same question answered twice"),
        (status = 404, description = "Candidate or question not found")
    )
)]
#[axum::debug_handler]
pub async fn save_answers(
    State(state): State<AppState>,
    Path(candidate_id): Path<i64>,
    Json(answers): Json<Vec<AnswerInput>>,
) -> Result<impl IntoResponse> {
    let saved = state.answer_service.save_all(candidate_id, &answers).await?;
    Ok(Json(saved))
}

#[utoipa::path(
    put,
    path = "/api/candidates/{id}/answers/{question_id}",
    params(
        ("id" = i64, Path, description = "Candidate ID"),
        ("question_id" = i64, Path, description = "Question ID")
    ),
    request_body = UpsertAnswerPayload,
    responses(
        (status = 200, description = "Answer stored", body = Json<Answer>),
        (status = 404, description = "Candidate or question not found")
    )
)]
#[axum::debug_handler]
pub async fn upsert_answer(
    State(state): State<AppState>,
    Path((candidate_id, question_id)): Path<(i64, i64)>,
    Json(payload): Json<UpsertAnswerPayload>,
) -> Result<impl IntoResponse> {
    let answer = state
        .answer_service
        .upsert(candidate_id, question_id, &payload.answer_text)
        .await?;
    Ok(Json(answer))
}
