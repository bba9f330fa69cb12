use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
};

use crate::{error::Result, models::template::JobTemplate, AppState};

#[utoipa::path(
    get,
    path = "/api/templates",
    responses(
        (status = 200, description = "Every job template", body = [JobTemplate])
    )
)]
#[axum::debug_handler]
pub async fn list_templates(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.template_service.all().to_vec())
}

#[utoipa::path(
    get,
    path = "/api/templates/categories",
    responses(
        (status = 200, description = "Distinct template categories, sorted", body = [String])
    )
)]
#[axum::debug_handler]
pub async fn list_template_categories(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.template_service.categories())
}

#[utoipa::path(
    get,
    path = "/api/templates/category/{category}",
    params(
        ("category" = String, Path, description = "Template category")
    ),
    responses(
        (status = 200, description = "Templates in the category", body = [JobTemplate])
    )
)]
#[axum::debug_handler]
pub async fn list_templates_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> impl IntoResponse {
    Json(state.template_service.by_category(&category))
}

#[utoipa::path(
    get,
    path = "/api/templates/{id}",
    params(
        ("id" = String, Path, description = "Template ID")
    ),
    responses(
        (status = 200, description = "Template found", body = Json<JobTemplate>),
        (status = 404, description = "Template not found")
    )
)]
#[axum::debug_handler]
pub async fn get_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let template = state.template_service.get(&id)?;
    Ok(Json(template))
}
