/*
 * Responsibility
 * - storage collaborator of the resource engine (Storer) and its in-memory implementation
 */
pub mod error;
pub mod memory;
pub mod store;

pub use error::{RepoError, RepoResult};
pub use memory::MemoryStorer;
pub use store::{ItemList, Storer};
