/*
 * Responsibility
 * - public surface of v1 (routes() and the building blocks the tests use)
 */
pub mod dto;
pub mod extractors;
pub mod handlers;
mod routes;

pub use routes::routes;
