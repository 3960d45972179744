//! Roster Service - registration and listing of characters and assets
//!
//! Plain CRUD; the action service owns every effort and `used` mutation.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use crate::application::ports::outbound::{
    AssetRepositoryPort, CharacterRepositoryPort, NotificationPort, RepositoryProvider,
};
use crate::application::services::action_error::ActionError;
use crate::domain::entities::{Asset, AssetKind, Character};
use crate::domain::events::{ChangeSet, Collection};
use crate::domain::value_objects::CharacterId;

/// Request to register a character
#[derive(Debug, Clone)]
pub struct RegisterCharacterRequest {
    pub name: String,
    pub username: Option<String>,
    pub effort: i32,
    pub tags: Vec<String>,
}

/// Request to register an asset
#[derive(Debug, Clone)]
pub struct RegisterAssetRequest {
    pub name: String,
    pub description: String,
    pub kind: AssetKind,
    pub multi_use: bool,
    pub current_holder: Option<String>,
}

#[async_trait]
pub trait RosterService: Send + Sync {
    async fn register_character(&self, request: RegisterCharacterRequest) -> Result<Character, ActionError>;

    async fn register_asset(&self, request: RegisterAssetRequest) -> Result<Asset, ActionError> {
        // Actions name assets by trimmed slot text
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(ActionError::Validation("Asset name cannot be empty".into()));
        }
        if request.description.trim().is_empty() {
            return Err(ActionError::Validation("Asset description cannot be empty".into()));
        }
        if self.repository.assets().find_by_name(&name).await?.is_some() {
            return Err(ActionError::Validation(format!(
                "An asset named {} already exists",
                name
            )));
        }

        let mut asset = Asset::new(name, request.description, request.kind);
        if request.multi_use {
            asset = asset.multi_use();
        }
        asset.current_holder = request.current_holder;

        self.repository.assets().save(&asset).await?;

        info!(asset_id = %asset.id, "Registered {}: {}", asset.kind, asset.name);
        let mut changes = ChangeSet::new(format!("register_asset:{}", asset.id));
        changes.record(Collection::Assets, &asset.name);
        self.publish(changes).await;
        Ok(asset)
    }

    #[instrument(skip(self))]
    async fn get_character(&self, id: CharacterId) -> Result<Option<Character>, ActionError> {
        debug!(character_id = %id, "Fetching character");
        Ok(self.repository.characters().get(id).await?)
    }

    #[instrument(skip(self))]
    async fn list_characters(&self) -> Result<Vec<Character>, ActionError> {
        Ok(self.repository.characters().list().await?)
    }

    #[instrument(skip(self))]
    async fn list_assets(&self) -> Result<Vec<Asset>, ActionError> {
        Ok(self.repository.assets().list().await?)
    }
}
