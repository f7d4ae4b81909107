//! Integration tests for the HTTP API.
//!
//! Each test builds the full router over in-memory adapters and drives it
//! with `tower::ServiceExt::oneshot`.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use secrecy::Secret;
use serde_json::{json, Value};
use tower::ServiceExt;

use thinkalike::adapters::{
    audit_channel, AcceptingVerificationSystem, AuditWorker, InMemoryAuditVerdictLog,
    InMemoryEventBus, InMemoryValueProfileRepository,
};
use thinkalike::bootstrap::AppComponents;
use thinkalike::domain::ethics::EthicalWeightTable;
use thinkalike::domain::matching::{FairnessReview, MeasureKind, Pseudonymizer};

// =============================================================================
// Test Infrastructure
// =============================================================================

struct TestApp {
    router: Router,
    events: Arc<InMemoryEventBus>,
}

fn test_app() -> TestApp {
    let weights = EthicalWeightTable::from_entries(vec![
        ("Transparency", 0.9),
        ("Community", 0.7),
        ("Innovation", 0.5),
    ])
    .unwrap();

    let events = Arc::new(InMemoryEventBus::new());
    let (sink, rx) = audit_channel(16);
    let verdict_log = Arc::new(InMemoryAuditVerdictLog::new(100));
    AuditWorker::new(rx, Arc::new(AcceptingVerificationSystem), verdict_log.clone()).spawn();

    let components = AppComponents {
        weights: Arc::new(weights),
        measure: MeasureKind::Jaccard,
        default_min_contribution: 0.0,
        max_candidates: 50,
        fairness: Arc::new(FairnessReview::default()),
        repository: Arc::new(InMemoryValueProfileRepository::new()),
        event_publisher: events.clone(),
        audit_sink: Arc::new(sink),
        verdict_log,
        pseudonymizer: Pseudonymizer::new(&Secret::new("test-secret".to_string())).unwrap(),
        verbose_errors: false,
    };

    TestApp {
        router: components.into_router(),
        events,
    }
}

async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn put_values(router: &Router, user: &str, values: Value) -> (StatusCode, Value) {
    send(
        router,
        Method::PUT,
        &format!("/api/profiles/{}/values", user),
        Some(json!({ "values": values })),
    )
    .await
}

// =============================================================================
// System
// =============================================================================

#[tokio::test]
async fn health_reports_weight_table_size() {
    let app = test_app();
    let (status, body) = send(&app.router, Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["weight_categories"], 3);
}

#[tokio::test]
async fn weights_are_listed_in_category_order() {
    let app = test_app();
    let (status, body) = send(&app.router, Method::GET, "/api/weights", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["measure"], "jaccard");
    let names: Vec<&str> = body["weights"]
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["category"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Community", "Innovation", "Transparency"]);
}

// =============================================================================
// Profiles
// =============================================================================

#[tokio::test]
async fn first_update_creates_profile() {
    let app = test_app();

    let (status, body) = put_values(&app.router, "alice", json!({ "transparency": 0.8 })).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user_id"], "alice");
    assert_eq!(body["stated_values"]["Transparency"], 0.8);

    let (status, _) = put_values(&app.router, "alice", json!({ "Community": 0.5 })).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(app.events.events_of_type("value_profile.created.v1").len(), 1);
    assert_eq!(
        app.events
            .events_of_type("value_profile.stated_values_updated.v1")
            .len(),
        2
    );
}

#[tokio::test]
async fn unknown_category_is_rejected_with_400() {
    let app = test_app();

    let (status, body) = put_values(&app.router, "alice", json!({ "Greed": 1.0 })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "UNKNOWN_CATEGORY");
    assert!(body["message"].as_str().unwrap().contains("Greed"));
}

#[tokio::test]
async fn out_of_range_strength_is_rejected_with_400() {
    let app = test_app();
    let (status, body) = put_values(&app.router, "alice", json!({ "Transparency": 2.0 })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn wrongly_typed_body_gets_error_body() {
    let app = test_app();
    let (status, body) = put_values(&app.router, "alice", json!({ "Transparency": "high" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
    assert!(body["message"].is_string());

    let (status, body) = send(
        &app.router,
        Method::POST,
        "/api/profiles/alice/narrative",
        Some(json!({ "step_id": 7 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn missing_profile_is_404() {
    let app = test_app();
    let (status, body) = send(&app.router, Method::GET, "/api/profiles/nobody", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "PROFILE_NOT_FOUND");
}

#[tokio::test]
async fn effective_profile_takes_max_across_sources() {
    let app = test_app();
    put_values(&app.router, "alice", json!({ "Transparency": 0.3 })).await;

    let (status, _) = send(
        &app.router,
        Method::POST,
        "/api/profiles/alice/narrative",
        Some(json!({ "step_id": "origin-story", "traits": { "Transparency": 0.6 } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app.router,
        Method::PUT,
        "/api/profiles/alice/sources/goodreads",
        Some(json!({ "insights": { "Transparency": 0.9, "Innovation": 0.4 } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["connected_sources"][0]["source"], "goodreads");

    let (_, body) = send(&app.router, Method::GET, "/api/profiles/alice", None).await;
    let transparency = body["values"]
        .as_array()
        .unwrap()
        .iter()
        .find(|v| v["category"] == "Transparency")
        .unwrap();
    assert_eq!(transparency["strength"], 0.9);
    assert_eq!(transparency["sources"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn disconnecting_source_drops_its_insights() {
    let app = test_app();
    put_values(&app.router, "alice", json!({ "Transparency": 0.3 })).await;
    send(
        &app.router,
        Method::PUT,
        "/api/profiles/alice/sources/goodreads",
        Some(json!({ "insights": { "Innovation": 0.4 } })),
    )
    .await;

    let (status, body) = send(
        &app.router,
        Method::DELETE,
        "/api/profiles/alice/sources/goodreads",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["connected_sources"].as_array().unwrap().is_empty());
    assert!(body["values"]
        .as_array()
        .unwrap()
        .iter()
        .all(|v| v["category"] != "Innovation"));

    let (status, body) = send(
        &app.router,
        Method::DELETE,
        "/api/profiles/alice/sources/goodreads",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn deleted_profile_is_gone() {
    let app = test_app();
    put_values(&app.router, "alice", json!({ "Transparency": 0.3 })).await;

    let (status, _) = send(&app.router, Method::DELETE, "/api/profiles/alice", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app.router, Method::GET, "/api/profiles/alice", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Matching
// =============================================================================

async fn seed_reference_pair(router: &Router) {
    put_values(router, "alice", json!({ "Transparency": 1.0, "Community": 1.0 })).await;
    put_values(router, "bob", json!({ "Transparency": 1.0, "Innovation": 1.0 })).await;
}

#[tokio::test]
async fn match_scores_weighted_overlap() {
    let app = test_app();
    seed_reference_pair(&app.router).await;

    let (status, body) = send(&app.router, Method::GET, "/api/matches/alice/bob", None).await;

    assert_eq!(status, StatusCode::OK);
    let score = body["score"].as_f64().unwrap();
    assert!((score - 42.857142857142854).abs() < 1e-9);
    assert_eq!(body["measure"], "jaccard");
    assert_eq!(body["key_shared_values"][0]["category"], "Transparency");
    assert_eq!(body["key_shared_values"].as_array().unwrap().len(), 1);
    assert_eq!(body["graph"]["nodes"].as_array().unwrap().len(), 3);
    assert_eq!(body["graph"]["edges"].as_array().unwrap().len(), 2);
    assert!(app.events.has_event("match.computed.v1"));
}

#[tokio::test]
async fn match_is_symmetric_over_http() {
    let app = test_app();
    seed_reference_pair(&app.router).await;

    let (_, ab) = send(&app.router, Method::GET, "/api/matches/alice/bob", None).await;
    let (_, ba) = send(&app.router, Method::GET, "/api/matches/bob/alice", None).await;

    assert_eq!(ab["score"], ba["score"]);
}

#[tokio::test]
async fn match_query_filters_key_values_only() {
    let app = test_app();
    put_values(&app.router, "alice", json!({ "Transparency": 1.0, "Community": 1.0 })).await;
    put_values(&app.router, "bob", json!({ "Transparency": 1.0, "Community": 1.0 })).await;

    let (status, body) = send(
        &app.router,
        Method::GET,
        "/api/matches/alice/bob?categories=community",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["score"], 100.0);
    let keys = body["key_shared_values"].as_array().unwrap();
    assert_eq!(keys.len(), 1);
    assert_eq!(keys[0]["category"], "Community");

    let (_, body) = send(
        &app.router,
        Method::GET,
        "/api/matches/alice/bob?min_contribution=0.8",
        None,
    )
    .await;
    let keys = body["key_shared_values"].as_array().unwrap();
    assert_eq!(keys.len(), 1);
    assert_eq!(keys[0]["category"], "Transparency");
}

#[tokio::test]
async fn match_with_unknown_filter_category_is_400() {
    let app = test_app();
    seed_reference_pair(&app.router).await;

    let (status, body) = send(
        &app.router,
        Method::GET,
        "/api/matches/alice/bob?categories=Greed",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "UNKNOWN_CATEGORY");
}

#[tokio::test]
async fn match_with_unparsable_query_gets_error_body() {
    let app = test_app();
    seed_reference_pair(&app.router).await;

    let (status, body) = send(
        &app.router,
        Method::GET,
        "/api/matches/alice/bob?min_contribution=abc",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn empty_category_filter_leaves_score_unchanged() {
    let app = test_app();
    put_values(&app.router, "alice", json!({ "Transparency": 1.0, "Community": 1.0 })).await;
    put_values(&app.router, "bob", json!({ "Transparency": 1.0, "Community": 1.0 })).await;

    let (status, body) = send(
        &app.router,
        Method::GET,
        "/api/matches/alice/bob?categories=",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["score"], 100.0);
    assert_eq!(body["key_shared_values"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn matching_a_user_with_themselves_is_400() {
    let app = test_app();
    seed_reference_pair(&app.router).await;

    let (status, body) = send(&app.router, Method::GET, "/api/matches/alice/alice", None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
    assert!(!app.events.has_event("match.computed.v1"));
}

#[tokio::test]
async fn candidates_with_wrongly_typed_body_get_error_body() {
    let app = test_app();
    seed_reference_pair(&app.router).await;

    let (status, body) = send(
        &app.router,
        Method::POST,
        "/api/matches/alice/candidates",
        Some(json!({ "limit": "ten" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_FAILED");
}

#[tokio::test]
async fn match_against_missing_profile_is_404() {
    let app = test_app();
    put_values(&app.router, "alice", json!({ "Transparency": 1.0 })).await;

    let (status, body) = send(&app.router, Method::GET, "/api/matches/alice/ghost", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "PROFILE_NOT_FOUND");
}

#[tokio::test]
async fn candidates_are_ranked_by_score() {
    let app = test_app();
    put_values(&app.router, "alice", json!({ "Transparency": 1.0, "Community": 1.0 })).await;
    put_values(&app.router, "bob", json!({ "Transparency": 1.0, "Innovation": 1.0 })).await;
    put_values(&app.router, "carol", json!({ "Transparency": 1.0, "Community": 1.0 })).await;
    put_values(&app.router, "dave", json!({ "Innovation": 1.0 })).await;

    let (status, body) = send(
        &app.router,
        Method::POST,
        "/api/matches/alice/candidates",
        Some(json!({ "min_score": 1.0 })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], "alice");
    let ranked: Vec<&str> = body["matches"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["user_b"].as_str().unwrap())
        .collect();
    assert_eq!(ranked, vec!["carol", "bob"]);
}

#[tokio::test]
async fn audit_outcome_is_recorded_after_match() {
    let app = test_app();
    seed_reference_pair(&app.router).await;

    let (_, body) = send(&app.router, Method::GET, "/api/matches/alice/bob", None).await;
    let match_id = body["match_id"].as_str().unwrap().to_string();
    let uri = format!("/api/audits/{}", match_id);

    let mut found = None;
    for _ in 0..50 {
        let (status, body) = send(&app.router, Method::GET, &uri, None).await;
        if status == StatusCode::OK {
            found = Some(body);
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let outcome = found.expect("audit outcome should be recorded");
    assert_eq!(outcome["status"], "passed");
    assert_eq!(outcome["match_id"], match_id.as_str());
}

#[tokio::test]
async fn malformed_match_id_is_400() {
    let app = test_app();
    let (status, _) = send(&app.router, Method::GET, "/api/audits/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
