/*
 * Responsibility
 * - minimal generic CRUD engine the auth layer plugs into
 * - items, lookups, hooks and the resource graph
 */
pub mod call;
pub mod error;
pub mod hook;
pub mod index;
pub mod item;
pub mod query;
#[allow(clippy::module_inception)]
pub mod resource;

pub use call::Call;
pub use error::ResourceError;
pub use hook::{GetOutcome, ResourceHook};
pub use index::{IndexError, ResourceIndex, ResourcePath};
pub use item::{Item, Payload};
pub use query::{Lookup, Page, Predicate};
pub use resource::{Change, Mode, Resource, ResourceConf};
