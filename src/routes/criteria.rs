use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use validator::Validate;

use crate::{
    dto::criteria_dto::{CreateCriterionPayload, UpdateCriterionPayload},
    error::Result,
    models::criterion::Criterion,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/jobs/{id}/criteria",
    params(
        ("id" = i64, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Criteria in display order", body = [Criterion]),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn list_criteria(
    State(state): State<AppState>,
    Path(job_id): Path<i64>,
) -> Result<impl IntoResponse> {
    let criteria = state.criteria_service.list(job_id).await?;
    Ok(Json(criteria))
}

#[utoipa::path(
    post,
    path = "/api/jobs/{id}/criteria",
    params(
        ("id" = i64, Path, description = "Job ID")
    ),
    request_body = CreateCriterionPayload,
    responses(
        (status = 201, description = "Criterion created", body = Json<Criterion>),
        (status = 400, description = "Invalid payload or name already used in the job"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn create_criterion(
    State(state): State<AppState>,
    Path(job_id): Path<i64>,
    Json(payload): Json<CreateCriterionPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let criterion = state.criteria_service.create(job_id, payload).await?;
    Ok((StatusCode::CREATED, Json(criterion)))
}

#[utoipa::path(
    put,
    path = "/api/jobs/{id}/criteria",
    params(
        ("id" = i64, Path, description = "Job ID")
    ),
    request_body = [String],
    responses(
        (status = 200, description = "Criteria replaced, ids kept by position", body = [Criterion]),
        (status = 400, description = "Empty or duplicate names"),
        (status = 404, description = "Job not found"),
        (status = 409, description = "A criterion to remove still has questions or evaluations")
    )
)]
#[axum::debug_handler]
pub async fn replace_criteria(
    State(state): State<AppState>,
    Path(job_id): Path<i64>,
    Json(names): Json<Vec<String>>,
) -> Result<impl IntoResponse> {
    let criteria = state.criteria_service.replace_all(job_id, &names).await?;
    Ok(Json(criteria))
}

#[utoipa::path(
    post,
    path = "/api/jobs/{id}/criteria/reorder",
    params(
        ("id" = i64, Path, description = "Job ID")
    ),
    request_body = [i64],
    responses(
        (status = 200, description = "Criteria in their new order", body = [Criterion]),
        (status = 400, description = "Repeated criterion id"),
        (status = 404, description = "Job not found")
    )
)]
#[axum::debug_handler]
pub async fn reorder_criteria(
    State(state): State<AppState>,
    Path(job_id): Path<i64>,
    Json(ordered_ids): Json<Vec<i64>>,
) -> Result<impl IntoResponse> {
    let criteria = state.criteria_service.reorder(job_id, &ordered_ids).await?;
    Ok(Json(criteria))
}

#[utoipa::path(
    get,
    path = "/api/criteria/{id}",
    params(
        ("id" = i64, Path, description = "Criterion ID")
    ),
    responses(
        (status = 200, description = "Criterion found", body = Json<Criterion>),
        (status = 404, description = "Criterion not found")
    )
)]
#[axum::debug_handler]
pub async fn get_criterion(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    let criterion = state.criteria_service.get(id).await?;
    Ok(Json(criterion))
}

#[utoipa::path(
    put,
    path = "/api/criteria/{id}",
    params(
        ("id" = i64, Path, description = "Criterion ID")
    ),
    request_body = UpdateCriterionPayload,
    responses(
        (status = 200, description = "Criterion updated", body = Json<Criterion>),
        (status = 400, description = "Invalid payload or name already used in the job"),
        (status = 404, description = "Criterion not found")
    )
)]
#[axum::debug_handler]
pub async fn update_criterion(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateCriterionPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let criterion = state.criteria_service.update(id, payload).await?;
    Ok(Json(criterion))
}

#[utoipa::path(
    delete,
    path = "/api/criteria/{id}",
    params(
        ("id" = i64, Path, description = "Criterion ID")
    ),
    responses(
        (status = 204, description = "Criterion deleted"),
        (status = 404, description = "Criterion not found"),
        (status = 409, description = "Criterion still has questions or evaluations")
    )
)]
#[axum::debug_handler]
pub async fn delete_criterion(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse> {
    state.criteria_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
