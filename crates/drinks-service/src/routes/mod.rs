use crate::errors::ApiError;
use crate::handlers::drinks_handler::{self, AppState};
use axum::{
    routing::{get, patch},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub fn build_routes(state: Arc<AppState>) -> Router {
    Router::new()
        // Drinks resource
        .route(
            "/drinks",
            get(drinks_handler::list_drinks)
                .post(drinks_handler::create_drink)
                .fallback(method_not_allowed),
        )
        .route(
            "/drinks-detail",
            get(drinks_handler::list_drinks_detail).fallback(method_not_allowed),
        )
        .route(
            "/drinks/:id",
            patch(drinks_handler::update_drink)
                .delete(drinks_handler::delete_drink)
                .fallback(method_not_allowed),
        )
        // Health check
        .route("/health", get(health_check))
        // Unmatched paths still answer the JSON envelope
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        // The API fronts a browser SPA
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}
