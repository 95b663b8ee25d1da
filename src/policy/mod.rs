/*
 * Responsibility
 * - authorization policies attached to resources as lifecycle hooks
 */
pub mod ownership;

pub use ownership::{OwnershipGuard, OwnershipRule};
