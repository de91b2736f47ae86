//! Ingestion endpoints.
//!
//! `POST /dados-sensores` and `POST /inserir-dados-sensor` are two routed
//! aliases of the same handler; existing producers use both paths.
//!
//! A request without `Content-Type: application/json` is read as an empty
//! object and stores an all-null row, so producers that omit the header still
//! get an acknowledgement. Any other body rejection (malformed JSON, a scalar
//! instead of an object) is returned as-is.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use tracing::{error, info};

use crate::{NewReading, Storage};

// ---

pub const INGEST_PATH: &str = "/dados-sensores";
pub const INGEST_ALIAS_PATH: &str = "/inserir-dados-sensor";

pub const INGEST_OK: &str = "Dados recebidos e armazenados com sucesso.";
pub const INGEST_FAILED: &str = "Erro ao processar os dados.";

pub fn router() -> Router<Storage> {
    // ---
    Router::new()
        .route(INGEST_PATH, post(handler))
        .route(INGEST_ALIAS_PATH, post(handler))
}

/// Append one reading. Storage errors are logged and never sent back.
async fn handler(
    State(storage): State<Storage>,
    body: Result<Json<NewReading>, JsonRejection>,
) -> Response {
    // ---
    let reading = match body {
        Ok(Json(reading)) => reading,
        Err(JsonRejection::MissingJsonContentType(_)) => NewReading::default(),
        Err(rejection) => return rejection.into_response(),
    };
    info!("Sensor reading received: {:?}", reading);

    match storage.insert(&reading).await {
        Ok(id) => {
            info!("Reading stored with id {}", id);
            (StatusCode::OK, INGEST_OK).into_response()
        }
        Err(e) => {
            error!("{}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, INGEST_FAILED).into_response()
        }
    }
}
