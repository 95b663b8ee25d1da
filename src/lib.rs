/*
 * Responsibility
 * - module tree of the server (main.rs and the integration tests link against it)
 */
pub mod api;
pub mod app;
pub mod config;
pub mod context;
pub mod error;
pub mod middleware;
pub mod policy;
pub mod repos;
pub mod resource;
pub mod services;
pub mod state;
