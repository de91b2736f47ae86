//! Bulk purge endpoint.
//!
//! Unauthenticated and irreversible: every reading is removed. Purging an
//! empty table is a success.

use axum::{extract::State, http::StatusCode, routing::delete, Router};
use tracing::{error, info};

use crate::Storage;

// ---

pub const PURGE_PATH: &str = "/limpar-dados";

pub const PURGE_OK: &str = "Dados da tabela foram limpos com sucesso.";
pub const PURGE_FAILED: &str = "Erro ao limpar os dados.";

pub fn router() -> Router<Storage> {
    // ---
    Router::new().route(PURGE_PATH, delete(handler))
}

async fn handler(State(storage): State<Storage>) -> (StatusCode, &'static str) {
    // ---
    match storage.delete_all().await {
        Ok(rows) => {
            info!("Purged {} readings", rows);
            (StatusCode::OK, PURGE_OK)
        }
        Err(e) => {
            error!("{}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, PURGE_FAILED)
        }
    }
}
