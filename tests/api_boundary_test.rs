mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{lazy_state, send};

#[tokio::test]
async fn health_reports_ok() {
    let app = hiring_scorecard::app(lazy_state());
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn upsert_score_out_of_range_is_rejected() {
    let app = hiring_scorecard::app(lazy_state());
    for score in [0, 11] {
        let (status, body) = send(
            &app,
            "PUT",
            "/api/candidates/1/evaluations/1",
            Some(json!({ "score": score })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "score {}", score);
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn save_all_with_one_bad_score_is_rejected() {
    let app = hiring_scorecard::app(lazy_state());
    let (status, _) = send(
        &app,
        "POST",
        "/api/candidates/1/evaluations",
        Some(json!([
            { "criterion_id": 1, "score": 9 },
            { "criterion_id": 2, "score": 11 }
        ])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_criterion_names_are_rejected() {
    let app = hiring_scorecard::app(lazy_state());

    let (status, body) = send(
        &app,
        "PUT",
        "/api/jobs/1/criteria",
        Some(json!(["Communication", " communication "])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("duplicate"));

    let (status, _) = send(
        &app,
        "POST",
        "/api/jobs",
        Some(json!({ "title": "Backend", "criteria": ["Technical", "Technical"] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn blank_criterion_name_is_rejected() {
    let app = hiring_scorecard::app(lazy_state());
    let (status, _) = send(
        &app,
        "PUT",
        "/api/jobs/1/criteria",
        Some(json!(["Communication", "   "])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn reorder_with_repeated_id_is_rejected() {
    let app = hiring_scorecard::app(lazy_state());
    let (status, _) = send(
        &app,
        "POST",
        "/api/jobs/1/criteria/reorder",
        Some(json!([3, 1, 3])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn templates_are_served_from_the_catalog() {
    let app = hiring_scorecard::app(lazy_state());

    let (status, body) = send(&app, "GET", "/api/templates", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body.as_array().unwrap().is_empty());

    let (status, body) = send(&app, "GET", "/api/templates/categories", None).await;
    assert_eq!(status, StatusCode::OK);
    let categories: Vec<String> = serde_json::from_value(body).unwrap();
    let mut sorted = categories.clone();
    sorted.sort();
    assert_eq!(categories, sorted);
    assert!(categories.contains(&"Development".to_string()));

    let (status, body) = send(&app, "GET", "/api/templates/category/Development", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body
        .as_array()
        .unwrap()
        .iter()
        .all(|t| t["category"] == "Development"));

    let (status, body) = send(&app, "GET", "/api/templates/backend-developer-middle", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Backend Developer");

    let (status, _) = send(&app, "GET", "/api/templates/no-such-template", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
