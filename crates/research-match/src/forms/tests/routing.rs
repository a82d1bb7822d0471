use super::common::*;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::forms::router::submit_handler;
use crate::forms::{form_router, FormInput, FormService};

fn post_json(uri: &str, input: &FormInput) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(input).expect("encode input")))
        .expect("request builds")
}

fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).expect("request builds")
}

#[tokio::test]
async fn submit_route_accepts_valid_application() {
    let router = router_with(Arc::new(MemoryCatalog::seeded()));
    let response = router
        .oneshot(post_json("/forms/application", &application_input()))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["form"], "application");
    assert_eq!(body["accepted"], true);
    assert_eq!(body["values"]["last_name"], "Lovelace");
}

fn post_raw(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).expect("encode body")))
        .expect("request builds")
}

#[tokio::test]
async fn submit_route_reads_json_numbers_as_field_text() {
    let router = router_with(Arc::new(MemoryCatalog::seeded()));
    let body = json!({
        "title": "Undergraduate Research Assistant",
        "description": "Help build a query optimizer.",
        "research_areas": [2],
        "wanted_gpa": 3.2,
        "languages": ["1"],
        "time_commitment": 10,
        "start_date": "2026-01-12",
        "end_date": "2026-05-08",
        "other_languages": null,
    });
    let response = router
        .oneshot(post_raw("/forms/position", body))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["accepted"], true);
    assert_eq!(body["values"]["wanted_gpa"], 3.2);
    assert_eq!(body["values"]["time_commitment"], 10);
    assert_eq!(body["values"]["research_areas"][0]["label"], "Databases");
}

#[tokio::test]
async fn null_fields_read_as_missing() {
    let router = router_with(Arc::new(MemoryCatalog::seeded()));
    let body = json!({
        "first_name": null,
        "last_name": "Lovelace",
        "statement_of_interest": "Databases and compilers.",
        "reference_faculty_first_name": "Charles",
        "reference_faculty_last_name": "Babbage",
        "reference_faculty_email": "babbage@wsu.edu",
    });
    let response = router
        .oneshot(post_raw("/forms/application", body))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert_eq!(
        body["errors"],
        json!({ "first_name": ["This field is required."] })
    );
}

#[tokio::test]
async fn submit_route_returns_field_errors() {
    let router = router_with(Arc::new(MemoryCatalog::seeded()));
    let input = student_profile_input()
        .with("phone_number", "509555123")
        .with("password_confirm", "abc123");
    let response = router
        .oneshot(post_json("/forms/student-profile", &input))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = read_json_body(response).await;
    assert_eq!(body["accepted"], false);
    assert_eq!(
        body["errors"],
        json!({
            "password_confirm": ["Field must be equal to password."],
            "phone_number": ["Phone number must be 10 digits long!"],
        })
    );
}

#[tokio::test]
async fn unknown_form_renders_not_found_page() {
    let router = router_with(Arc::new(MemoryCatalog::seeded()));
    let response = router
        .oneshot(get("/forms/transcript"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let page = read_text_body(response).await;
    assert!(page.contains("File Not Found"));
}

#[tokio::test]
async fn describe_route_lists_search_choices() {
    let router = router_with(Arc::new(MemoryCatalog::seeded()));
    let response = router
        .oneshot(get("/forms/search"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["form"], "search");
    assert_eq!(body["submit_label"], "Search");
    assert_eq!(body["choices"][0], json!({"value": "Date", "label": "Start Date"}));
    assert_eq!(body["choices"][2]["value"], "Recommended");
}

#[tokio::test]
async fn options_route_reflects_catalog_changes() {
    let catalog = Arc::new(MemoryCatalog::seeded());
    let router = router_with(catalog.clone());

    catalog.add_research_field(7, "Bioinformatics");
    let response = router
        .oneshot(get("/forms/faculty-profile/options"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body[0]["field"], "research_areas");
    let labels: Vec<_> = body[0]["options"]
        .as_array()
        .expect("options array")
        .iter()
        .map(|option| option["label"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(labels.last().map(String::as_str), Some("Bioinformatics"));
}

#[tokio::test]
async fn catalog_failure_renders_internal_error_page() {
    let router = form_router(Arc::new(FormService::new(Arc::new(UnavailableCatalog))));
    let response = router
        .oneshot(get("/forms/position"))
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let page = read_text_body(response).await;
    assert!(page.contains("An unexpected error has occurred"));
    assert!(!page.contains("connection refused"));
}

#[tokio::test]
async fn submit_handler_maps_unknown_slug_to_not_found() {
    let service = service(Arc::new(MemoryCatalog::seeded()));
    let response = submit_handler::<MemoryCatalog>(
        State(service),
        Path("gradebook".to_string()),
        axum::Json(FormInput::new()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
