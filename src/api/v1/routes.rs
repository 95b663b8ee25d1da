/*
 * Responsibility
 * - URL layout of v1
 * - /health and /me are fixed; everything else addresses the resource graph:
 *   /{resource}[/{id}] and /{resource}/{id}/{sub}[/{sub_id}]
 * - authentication is applied around this router in app.rs
 */
use axum::{Router, routing::get};

use crate::api::v1::handlers::{
    health::health,
    me::me,
    resources::{clear, create, list, merge, read, remove, replace},
};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/me", get(me))
        .route("/{resource}", get(list).post(create).delete(clear))
        .route(
            "/{resource}/{id}",
            get(read).put(replace).patch(merge).delete(remove),
        )
        .route("/{resource}/{id}/{sub}", get(list).post(create).delete(clear))
        .route(
            "/{resource}/{id}/{sub}/{sub_id}",
            get(read).put(replace).patch(merge).delete(remove),
        )
}
