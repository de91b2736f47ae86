//! HTTP gateway: merges the per-endpoint subrouters, attaches the shared
//! [`Storage`] handle and the cross-origin policy.

use axum::{middleware, Router};

use crate::Storage;

mod cors;
mod health;
mod ingest;
mod purge;
mod readings;

#[cfg(test)]
mod tests;

// ---

pub fn router(storage: Storage) -> Router {
    // ---
    Router::new()
        .merge(ingest::router())
        .merge(readings::router())
        .merge(purge::router())
        .merge(health::router())
        .with_state(storage)
        .layer(middleware::from_fn(cors::allow_any_origin))
}
