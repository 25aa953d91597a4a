//! HTTP transport for the guide service
//!
//! ```text
//! GET  /api/health
//! GET  /api/db-test
//! GET  /api/ingredients/search?q=<query>
//! GET  /api/ingredients/:name/compatibility?filter=<all|avoid|beneficial>
//! POST /api/diseases/guide
//! GET  /api/diseases
//! ```

use crate::compat_core::GuideError;
use crate::service::{DiseaseGuideRequest, GuideService};
use crate::store::CatalogStore;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

type SharedService<S> = Arc<GuideService<S>>;

/// Raw query pairs; repeated keys are kept rather than rejected
type QueryPairs = Result<Query<Vec<(String, String)>>, QueryRejection>;

/// First value given for `key`
fn first_value(pairs: Vec<(String, String)>, key: &str) -> Option<String> {
    pairs.into_iter().find(|(k, _)| k == key).map(|(_, v)| v)
}

pub fn create_router<S: CatalogStore + 'static>(service: SharedService<S>) -> Router {
    Router::new()
        .route("/api/health", get(health::<S>))
        .route("/api/db-test", get(db_test::<S>))
        .route("/api/ingredients/search", get(search_ingredients::<S>))
        .route(
            "/api/ingredients/:name/compatibility",
            get(ingredient_compatibility::<S>),
        )
        .route("/api/diseases/guide", post(disease_guide::<S>))
        .route("/api/diseases", get(list_diseases::<S>))
        .fallback(not_found)
        .layer(CorsLayer::permissive())
        .with_state(service)
}

impl IntoResponse for GuideError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            GuideError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Bad request", "message": message, "field": field }),
            ),
            GuideError::DiseasesNotFound { requested } => (
                StatusCode::NOT_FOUND,
                json!({
                    "error": "No diseases found",
                    "message": "None of the specified diseases exist in our database",
                    "requestedDiseases": requested,
                }),
            ),
            GuideError::IngredientNotFound { .. } => (
                StatusCode::NOT_FOUND,
                json!({ "error": "Ingredient not found", "message": self.to_string() }),
            ),
            GuideError::Integrity(_) | GuideError::Storage(_) => {
                log::error!("❌ {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error", "message": self.to_string() }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}

async fn health<S: CatalogStore + 'static>(State(service): State<SharedService<S>>) -> Response {
    Json(service.health()).into_response()
}

async fn db_test<S: CatalogStore + 'static>(State(service): State<SharedService<S>>) -> Response {
    match service.db_check().await {
        Ok(()) => Json(json!({
            "status": "ok",
            "message": "Database connected successfully",
        }))
        .into_response(),
        Err(e) => {
            log::error!("❌ Database check failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "status": "error",
                    "message": "Database connection failed",
                    "error": e.to_string(),
                })),
            )
                .into_response()
        }
    }
}

async fn search_ingredients<S: CatalogStore + 'static>(
    State(service): State<SharedService<S>>,
    query: QueryPairs,
) -> Result<Response, GuideError> {
    let Query(pairs) =
        query.map_err(|rejection| GuideError::validation("q", rejection.body_text()))?;
    let q = first_value(pairs, "q");
    let response = service.search(q.as_deref()).await?;
    Ok(Json(response).into_response())
}

async fn ingredient_compatibility<S: CatalogStore + 'static>(
    State(service): State<SharedService<S>>,
    Path(name): Path<String>,
    query: QueryPairs,
) -> Result<Response, GuideError> {
    // An unreadable query string leaves the filter absent
    let filter = match query {
        Ok(Query(pairs)) => first_value(pairs, "filter"),
        Err(rejection) => {
            log::debug!("Ignoring unreadable query string: {}", rejection.body_text());
            None
        }
    };
    let response = service
        .ingredient_compatibility(&name, filter.as_deref())
        .await?;
    Ok(Json(response).into_response())
}

async fn disease_guide<S: CatalogStore + 'static>(
    State(service): State<SharedService<S>>,
    payload: Result<Json<DiseaseGuideRequest>, JsonRejection>,
) -> Result<Response, GuideError> {
    let Json(request) = payload
        .map_err(|rejection| GuideError::validation("diseases", rejection.body_text()))?;
    let response = service.disease_guide(request).await?;
    Ok(Json(response).into_response())
}

async fn list_diseases<S: CatalogStore + 'static>(
    State(service): State<SharedService<S>>,
) -> Result<Response, GuideError> {
    let response = service.list_diseases().await?;
    Ok(Json(response).into_response())
}

async fn not_found(method: Method, uri: Uri) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Not found",
            "message": format!("Route {} {} not found", method, uri.path()),
        })),
    )
        .into_response()
}
