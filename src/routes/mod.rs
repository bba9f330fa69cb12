pub mod answer;
pub mod candidate;
pub mod criteria;
pub mod evaluation;
pub mod health;
pub mod job;
pub mod question;
pub mod template;

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::AppState;

/// Every route of the service, without middleware layers.
pub fn router() -> Router<AppState> {
    let jobs = Router::new()
        .route("/api/jobs", get(job::list_jobs).post(job::create_job))
        .route(
            "/api/jobs/:id",
            get(job::get_job)
                .put(job::update_job)
                .delete(job::delete_job),
        )
        .route("/api/jobs/:id/candidates", get(job::list_job_candidates))
        .route("/api/jobs/:id/questions", get(job::list_job_questions))
        .route(
            "/api/jobs/:id/criteria",
            get(criteria::list_criteria)
                .post(criteria::create_criterion)
                .put(criteria::replace_criteria),
        )
        .route(
            "/api/jobs/:id/criteria/reorder",
            post(criteria::reorder_criteria),
        )
        .route(
            "/api/jobs/:id/evaluations/summary",
            get(evaluation::job_summary),
        )
        .route(
            "/api/criteria/:id",
            get(criteria::get_criterion)
                .put(criteria::update_criterion)
                .delete(criteria::delete_criterion),
        );

    let questions = Router::new()
        .route("/api/questions", post(question::create_question))
        .route(
            "/api/questions/:id",
            get(question::get_question)
                .put(question::update_question)
                .delete(question::delete_question),
        );

    let candidates = Router::new()
        .route("/api/candidates", post(candidate::create_candidate))
        .route(
            "/api/candidates/:id",
            get(candidate::get_candidate)
                .put(candidate::update_candidate)
                .delete(candidate::delete_candidate),
        )
        .route(
            "/api/candidates/:id/evaluations",
            get(evaluation::list_evaluations).post(evaluation::save_evaluations),
        )
        .route(
            "/api/candidates/:id/evaluations/:criterion_id",
            put(evaluation::upsert_evaluation),
        )
        .route(
            "/api/evaluations/:id",
            delete(evaluation::delete_evaluation),
        )
        .route(
            "/api/candidates/:id/answers",
            get(answer::list_answers).post(answer::save_answers),
        )
        .route(
            "/api/candidates/:id/answers/:question_id",
            put(answer::upsert_answer),
        );

    let templates = Router::new()
        .route("/api/templates", get(template::list_templates))
        .route(
            "/api/templates/categories",
            get(template::list_template_categories),
        )
        .route(
            "/api/templates/category/:category",
            get(template::list_templates_by_category),
        )
        .route("/api/templates/:id", get(template::get_template));

    Router::new()
        .route("/health", get(health::health))
        .merge(jobs)
        .merge(questions)
        .merge(candidates)
        .merge(templates)
}
