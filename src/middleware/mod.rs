/*
 * Responsibility
 * - public interface of the middleware layer
 * - http: transport concerns (request id, tracing, limits)
 * - auth: token -> principal -> request context
 */
pub mod auth;
pub mod http;
