//! In-memory entity store
//!
//! Backs every repository port with maps behind a shared `RwLock`. Clones share
//! state, so a store handed to several services sees one set of records.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::application::ports::outbound::{
    ActionRepositoryPort, AssetRepositoryPort, CharacterRepositoryPort, RepoError,
    RepositoryProvider,
};
use crate::domain::entities::{Action, Asset, Character};
use crate::domain::value_objects::{ActionId, AssetId, CharacterId};

#[derive(Default)]
struct Records {
    characters: HashMap<CharacterId, Character>,
    assets: HashMap<AssetId, Asset>,
    actions: HashMap<ActionId, Action>,
}

/// In-memory store; clones share the same records
#[derive(Clone, Default)]
pub struct InMemoryStore {
    records: Arc<RwLock<Records>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RepositoryProvider for InMemoryStore {
    type CharacterRepo = InMemoryCharacterRepository;
    type AssetRepo = InMemoryAssetRepository;
    type ActionRepo = InMemoryActionRepository;

    fn characters(&self) -> Self::CharacterRepo {
        InMemoryCharacterRepository {
            records: self.records.clone(),
        }
    }

    fn assets(&self) -> Self::AssetRepo {
        InMemoryAssetRepository {
            records: self.records.clone(),
        }
    }

    fn actions(&self) -> Self::ActionRepo {
        InMemoryActionRepository {
            records: self.records.clone(),
        }
    }
}

pub struct InMemoryCharacterRepository {
    records: Arc<RwLock<Records>>,
}

#[async_trait]
impl CharacterRepositoryPort for InMemoryCharacterRepository {
    async fn get(&self, id: CharacterId) -> Result<Option<Character>, RepoError> {
        Ok(self.records.read().await.characters.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Character>, RepoError> {
        let records = self.records.read().await;
        let mut characters: Vec<Character> = records.characters.values().cloned().collect();
        characters.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(characters)
    }

    async fn save(&self, character: &Character) -> Result<(), RepoError> {
        self.records
            .write()
            .await
            .characters
            .insert(character.id, character.clone());
        Ok(())
    }
}

pub struct InMemoryAssetRepository {
    records: Arc<RwLock<Records>>,
}

#[async_trait]
impl AssetRepositoryPort for InMemoryAssetRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<Asset>, RepoError> {
        let records = self.records.read().await;
        Ok(records.assets.values().find(|a| a.name == name).cloned())
    }

    async fn list(&self) -> Result<Vec<Asset>, RepoError> {
        let records = self.records.read().await;
        let mut assets: Vec<Asset> = records.assets.values().cloned().collect();
        assets.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(assets)
    }

    async fn save(&self, asset: &Asset) -> Result<(), RepoError> {
        let mut records = self.records.write().await;
        if records
            .assets
            .values()
            .any(|a| a.name == asset.name && a.id != asset.id)
        {
            return Err(RepoError::Conflict(format!(
                "asset name '{}' already exists",
                asset.name
            )));
        }
        records.assets.insert(asset.id, asset.clone());
        Ok(())
    }
}

pub struct InMemoryActionRepository {
    records: Arc<RwLock<Records>>,
}

fn sorted(mut actions: Vec<Action>) -> Vec<Action> {
    actions.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
    actions
}

#[async_trait]
impl ActionRepositoryPort for InMemoryActionRepository {
    async fn get(&self, id: ActionId) -> Result<Option<Action>, RepoError> {
        Ok(self.records.read().await.actions.get(&id).cloned())
    }

    async fn list(&self) -> Result<Vec<Action>, RepoError> {
        let records = self.records.read().await;
        Ok(sorted(records.actions.values().cloned().collect()))
    }

    async fn find_by_intent(&self, intent: &str) -> Result<Option<Action>, RepoError> {
        let records = self.records.read().await;
        Ok(records.actions.values().find(|a| a.intent == intent).cloned())
    }

    async fn list_by_creator(&self, creator: CharacterId) -> Result<Vec<Action>, RepoError> {
        let records = self.records.read().await;
        Ok(sorted(
            records
                .actions
                .values()
                .filter(|a| a.creator == creator)
                .cloned()
                .collect(),
        ))
    }

    async fn list_referencing_asset(&self, name: &str) -> Result<Vec<Action>, RepoError> {
        let records = self.records.read().await;
        Ok(sorted(
            records
                .actions
                .values()
                .filter(|a| a.assets.contains(name))
                .cloned()
                .collect(),
        ))
    }

    async fn save(&self, action: &Action) -> Result<(), RepoError> {
        let mut records = self.records.write().await;
        if records
            .actions
            .values()
            .any(|a| a.intent == action.intent && a.id != action.id)
        {
            return Err(RepoError::Conflict(format!(
                "intent '{}' already exists",
                action.intent
            )));
        }
        records.actions.insert(action.id, action.clone());
        Ok(())
    }

    async fn delete(&self, id: ActionId) -> Result<Option<Action>, RepoError> {
        Ok(self.records.write().await.actions.remove(&id))
    }

    async fn delete_all(&self) -> Result<u64, RepoError> {
        let mut records = self.records.write().await;
        let count = records.actions.len() as u64;
        records.actions.clear();
        Ok(count)
    }
}
