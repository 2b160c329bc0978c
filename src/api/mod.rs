pub mod handlers;
pub mod types;

use std::sync::Arc;
use axum::{routing::{get, put}, Router};

pub use handlers::{health, AppState};

/// JSON API routes, mounted under `/api/v1`
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        // Claims
        .route("/claims", get(handlers::list_claims).post(handlers::create_claim))
        .route("/claims/summary", get(handlers::claim_summary))
        .route("/claims/:id", get(handlers::get_claim))
        .route("/claims/:id/status", put(handlers::update_claim_status))
        .route("/claims/:id/polygon", put(handlers::update_claim_polygon))
        .route(
            "/claims/:id/documents",
            get(handlers::list_documents).post(handlers::attach_document),
        )
        // Pattas (static paths before :id)
        .route("/pattas", get(handlers::list_pattas))
        .route("/pattas/geojson", get(handlers::pattas_geojson))
        .route("/pattas/:id", get(handlers::get_patta))
        // Socio-economic records and scheme lookup
        .route("/socio", get(handlers::list_socio).post(handlers::create_socio))
        .route("/schemes", get(handlers::list_schemes))
        .route("/schemes/:scheme/eligible", get(handlers::eligible_pattas))
}
