/*
 * Responsibility
 * - request-scoped values handed to handlers
 */
pub mod auth_ctx;
pub mod call;
pub mod target;

pub use auth_ctx::AuthCtxExtractor;
pub use target::Target;
