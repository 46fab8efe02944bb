//! Sandboxed file store.

mod dir_store;
mod resolve;
mod traits;

pub use dir_store::DirStore;
pub use traits::{DirEntry, FileStore, StatInfo};
