/*
 * Responsibility
 * - process-level services (token verification, principal resolution)
 */
pub mod auth;
