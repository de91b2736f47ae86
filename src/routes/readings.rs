//! Query endpoint.
//!
//! `GET /dados-sensores` returns the whole table as a JSON array, oldest
//! reading first. No filtering or paging.

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use tracing::{debug, error};

use crate::Storage;

// ---

pub const READINGS_PATH: &str = "/dados-sensores";
pub const READINGS_FAILED: &str = "Erro ao buscar os dados.";

pub fn router() -> Router<Storage> {
    // ---
    Router::new().route(READINGS_PATH, get(handler))
}

/// Return every stored reading, oldest first. Either the full set or a 500.
async fn handler(State(storage): State<Storage>) -> impl IntoResponse {
    // ---
    match storage.select_all().await {
        Ok(readings) => {
            debug!("GET {} - returning {} readings", READINGS_PATH, readings.len());
            (StatusCode::OK, Json(readings)).into_response()
        }
        Err(e) => {
            error!("{}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, READINGS_FAILED).into_response()
        }
    }
}
