mod memory;
mod provider;

pub use memory::{MemoryCatalogStore, MemoryCatalogStoreError};
pub use provider::{CatalogStore, StoreError};
