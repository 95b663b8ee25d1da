/*
 * Responsibility
 * - GET /me: the principal the auth middleware attached to this request
 */
use axum::Json;

use crate::api::v1::extractors::AuthCtxExtractor;
use crate::services::auth::Principal;

pub async fn me(AuthCtxExtractor(principal): AuthCtxExtractor) -> Json<Principal> {
    Json(principal)
}
