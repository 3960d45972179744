//! Repository ports - Interfaces for data persistence
//!
//! These traits define the contracts that infrastructure repositories must implement.
//! Application services depend on these traits, not concrete implementations.
//! No multi-document transaction is assumed; each call stands alone.

use async_trait::async_trait;

use crate::domain::entities::{Action, Asset, Character};
use crate::domain::value_objects::{ActionId, CharacterId};

/// Errors raised by the entity store
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// A uniqueness constraint (action intent, asset name) was violated
    #[error("Constraint violation: {0}")]
    Conflict(String),
    #[error("Database error: {0}")]
    Database(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

// =============================================================================
// Character Repository Port
// =============================================================================

/// Repository port for Character operations
#[async_trait]
pub trait CharacterRepositoryPort: Send + Sync {
    /// Get a character by ID
    async fn get(&self, id: CharacterId) -> Result<Option<Character>, RepoError>;

    /// List all characters
    async fn list(&self) -> Result<Vec<Character>, RepoError>;

    /// Insert or update a character
    async fn save(&self, character: &Character) -> Result<(), RepoError>;
}

// =============================================================================
// Asset Repository Port
// =============================================================================

/// Repository port for Asset operations
#[async_trait]
pub trait AssetRepositoryPort: Send + Sync {
    /// Find an asset by its name (the key actions reference it by)
    async fn find_by_name(&self, name: &str) -> Result<Option<Asset>, RepoError>;

    /// List all assets
    async fn list(&self) -> Result<Vec<Asset>, RepoError>;

    /// Insert or update an asset; names are unique
    async fn save(&self, asset: &Asset) -> Result<(), RepoError>;
}

// =============================================================================
// Action Repository Port
// =============================================================================

/// Repository port for Action operations
#[async_trait]
pub trait ActionRepositoryPort: Send + Sync {
    /// Get an action by ID
    async fn get(&self, id: ActionId) -> Result<Option<Action>, RepoError>;

    /// List all live actions
    async fn list(&self) -> Result<Vec<Action>, RepoError>;

    /// Find the live action holding an intent (exact match)
    async fn find_by_intent(&self, intent: &str) -> Result<Option<Action>, RepoError>;

    /// List actions created by a character
    async fn list_by_creator(&self, creator: CharacterId) -> Result<Vec<Action>, RepoError>;

    /// List actions naming an asset in any slot
    async fn list_referencing_asset(&self, name: &str) -> Result<Vec<Action>, RepoError>;

    /// Insert or update an action; intents are unique
    async fn save(&self, action: &Action) -> Result<(), RepoError>;

    /// Delete an action, returning what was removed
    async fn delete(&self, id: ActionId) -> Result<Option<Action>, RepoError>;

    /// Delete every action, returning the count removed
    async fn delete_all(&self) -> Result<u64, RepoError>;
}

// =============================================================================
// Repository Provider Port (Facade)
// =============================================================================

/// Facade trait providing access to all repository ports
///
/// This allows application services to receive a single dependency
/// that provides access to all needed repositories.
pub trait RepositoryProvider: Send + Sync {
    type CharacterRepo: CharacterRepositoryPort;
    type AssetRepo: AssetRepositoryPort;
    type ActionRepo: ActionRepositoryPort;

    fn characters(&self) -> Self::CharacterRepo;
    fn assets(&self) -> Self::AssetRepo;
    fn actions(&self) -> Self::ActionRepo;
}
