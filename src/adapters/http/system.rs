//! Liveness and the read-only weight table.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::domain::ethics::EthicalWeightTable;

#[derive(Clone)]
pub struct SystemHandlers {
    weights: Arc<EthicalWeightTable>,
    measure: String,
}

impl SystemHandlers {
    pub fn new(weights: Arc<EthicalWeightTable>, measure: impl Into<String>) -> Self {
        Self {
            weights,
            measure: measure.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub weight_categories: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeightEntry {
    pub category: String,
    pub weight: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeightsResponse {
    pub measure: String,
    pub weights: Vec<WeightEntry>,
}

/// GET /health
pub async fn health(State(handlers): State<SystemHandlers>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        weight_categories: handlers.weights.len(),
    })
}

/// GET /api/weights
pub async fn list_weights(State(handlers): State<SystemHandlers>) -> Json<WeightsResponse> {
    let weights = handlers
        .weights
        .iter()
        .map(|(category, weight)| WeightEntry {
            category: category.label().to_string(),
            weight: weight.value(),
        })
        .collect();

    Json(WeightsResponse {
        measure: handlers.measure.clone(),
        weights,
    })
}

pub fn health_routes(handlers: SystemHandlers) -> Router {
    Router::new()
        .route("/health", get(health))
        .with_state(handlers)
}

/// Mounted under `/api`.
pub fn weight_routes(handlers: SystemHandlers) -> Router {
    Router::new()
        .route("/weights", get(list_weights))
        .with_state(handlers)
}
