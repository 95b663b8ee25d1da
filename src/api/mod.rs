/*
 * Responsibility
 * - versioned HTTP API (only v1 today)
 */
pub mod v1;
