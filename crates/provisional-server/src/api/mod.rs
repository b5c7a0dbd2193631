pub mod chat;
pub mod error;
pub mod state;

pub use state::AppState;

use axum::{
    Json, Router,
    http::{Method, header},
    routing::{get, post},
};
use tower_http::cors::CorsLayer;

use crate::static_assets;

#[derive(serde::Serialize)]
struct Health {
    status: String,
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "provisional is working!".to_string(),
    })
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/health", get(health))
        .route("/api/chat", post(chat::relay_chat))
        .layer(cors)
        .with_state(state)
        .fallback(static_assets::static_handler)
}
