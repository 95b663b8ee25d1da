/*!
 * Authentication context extractor
 *
 * Responsibility:
 * - hand the Principal resolved by the auth middleware to handlers
 *
 * Public API:
 * - AuthCtxExtractor
 */

mod core;

pub use core::AuthCtxExtractor;
