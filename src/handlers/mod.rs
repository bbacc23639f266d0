pub mod rest;

use axum::{
    Router,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use std::sync::Arc;

use crate::{error::NoteError, service::NoteService};

/// Builds the CORS policy, an empty origin list allows any origin.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origins.is_empty() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin
                .parse()
                .map_err(|_| tracing::warn!("Ignoring invalid CORS origin '{}'", origin))
                .ok()
        })
        .collect();

    cors.allow_origin(AllowOrigin::list(origins))
}

pub fn build_router(service: Arc<NoteService>, cors: CorsLayer) -> Router {
    let collection = get(rest::get_all_notes).post(rest::create_note);

    Router::new()
        .route("/", get(root))
        .route("/api/notes", collection.clone())
        .route("/api/notes/", collection)
        .route(
            "/api/notes/{id}",
            get(rest::get_one_note)
                .put(rest::update_note)
                .delete(rest::delete_note),
        )
        .merge(
            SwaggerUi::new("/swagger-ui")
                .url("/api-doc/openapi.json", rest::ApiDoc::openapi()),
        )
        .fallback(not_found)
        .with_state(service)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

async fn root() -> Response {
    (StatusCode::OK, "Notes API is running").into_response()
}

async fn not_found() -> Response {
    NoteError::NotFound.into_response()
}
