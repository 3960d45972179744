//! Entity store adapters
//!
//! Both backends implement the repository ports; the store is chosen at
//! startup from configuration.

mod memory_store;
mod sqlite_store;

pub use memory_store::{
    InMemoryActionRepository, InMemoryAssetRepository, InMemoryCharacterRepository,
    InMemoryStore,
};
pub use sqlite_store::{
    SqliteActionRepository, SqliteAssetRepository, SqliteCharacterRepository, SqliteStore,
};
