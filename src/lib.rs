pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use axum::Router;
use sqlx::PgPool;
use tower_http::trace::TraceLayer;

use crate::services::{
    answer_service::AnswerService, candidate_service::CandidateService,
    criteria_service::CriteriaService, evaluation_service::EvaluationService,
    job_service::JobService, question_service::QuestionService,
    summary_service::SummaryService, template_service::TemplateService,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub job_service: JobService,
    pub criteria_service: CriteriaService,
    pub question_service: QuestionService,
    pub candidate_service: CandidateService,
    pub answer_service: AnswerService,
    pub evaluation_service: EvaluationService,
    pub summary_service: SummaryService,
    pub template_service: TemplateService,
}

impl AppState {
    pub fn new(pool: PgPool, template_service: TemplateService) -> Self {
        Self {
            job_service: JobService::new(pool.clone()),
            criteria_service: CriteriaService::new(pool.clone()),
            question_service: QuestionService::new(pool.clone()),
            candidate_service: CandidateService::new(pool.clone()),
            answer_service: AnswerService::new(pool.clone()),
            evaluation_service: EvaluationService::new(pool.clone()),
            summary_service: SummaryService::new(pool.clone()),
            template_service,
            pool,
        }
    }
}

/// The full application: routes, CORS and request tracing.
pub fn app(state: AppState) -> Router {
    routes::router()
        .layer(middleware::cors::permissive_cors())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
