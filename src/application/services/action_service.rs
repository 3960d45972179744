//! Action Service - the action lifecycle and resource reconciliation engine
//!
//! Every mutating operation keeps three things in lockstep: the Action record,
//! its creator's effort pool, and the `used` flags of the assets it names.
//!
//! # Write ordering
//!
//! Each operation loads and validates everything it will touch before the
//! first write, so validation failures leave the store untouched. The Action
//! record is written first on Create/Edit, which lets the store's unique
//! intent index reject a racing duplicate before any resource moves. Writes
//! that land before a store failure are reported through
//! [`ActionError::PartialReconciliation`]; nothing is rolled back.
//!
//! # Concurrency
//!
//! Mutations run behind a single reconciliation gate, serialising every
//! read-modify-write of effort and `used` flags within the process.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::application::ports::outbound::{
    ActionRepositoryPort, AssetRepositoryPort, CharacterRepositoryPort, NotificationPort,
    RepoError, RepositoryProvider,
};
use crate::application::services::action_error::ActionError;
use crate::application::services::reconciliation::{Reconciliation, WriteJournal};
use crate::domain::entities::{Action, ActionKind, ActionPhase, Asset, Character};
use crate::domain::events::{ChangeSet, Collection};
use crate::domain::services::{compute_asset_deltas, compute_effort_delta, settle_effort};
use crate::domain::value_objects::{ActionId, AssetSlots, CharacterId, EffortPolicy};

/// Request to declare a new action
#[derive(Debug, Clone)]
pub struct CreateActionRequest {
    pub creator: CharacterId,
    pub intent: String,
    pub description: String,
    pub effort: i32,
    pub assets: [Option<String>; 3],
}

/// Request to edit an action; omitted asset slots are cleared
#[derive(Debug, Clone)]
pub struct EditActionRequest {
    pub id: ActionId,
    pub description: String,
    pub intent: String,
    pub effort: i32,
    pub assets: [Option<String>; 3],
}

/// Request to record an action's outcome
#[derive(Debug, Clone)]
pub struct ResolveActionRequest {
    pub id: ActionId,
    pub result: String,
    pub die_result: i32,
    pub status: Option<ActionPhase>,
}

/// Request to start a project
#[derive(Debug, Clone)]
pub struct CreateProjectRequest {
    pub creator: CharacterId,
    pub intent: String,
    pub description: String,
    pub players: Vec<CharacterId>,
    pub image: Option<String>,
    pub progress: i32,
}

/// Request to edit a project's narrative fields and progress
#[derive(Debug, Clone)]
pub struct EditProjectRequest {
    pub id: ActionId,
    pub description: String,
    pub intent: String,
    pub progress: i32,
    pub players: Vec<CharacterId>,
    pub image: Option<String>,
}

/// A deleted action together with the resources it gave back
#[derive(Debug, Clone)]
pub struct DeletedAction {
    pub action: Action,
    pub reconciliation: Reconciliation,
}

/// An action populated with its creator
#[derive(Debug, Clone)]
pub struct ActionDetail {
    pub action: Action,
    pub creator: Character,
}

/// Action service trait defining the application use cases
#[async_trait]
pub trait ActionService: Send + Sync {
    /// Declare an action: debit effort, claim assets
    async fn create_action(&self, request: CreateActionRequest) -> Result<Action, ActionError>;

    /// Edit an action, reconciling the effort delta and asset set
    async fn edit_action(&self, request: EditActionRequest) -> Result<Action, ActionError>;

    /// Record result, die roll and phase; no resource impact
    async fn resolve_action(&self, request: ResolveActionRequest) -> Result<Action, ActionError>;

    /// Delete an action, refunding effort and freeing assets
    async fn delete_action(&self, id: ActionId) -> Result<DeletedAction, ActionError>;

    /// Delete every action with per-item reconciliation, returning the count
    async fn delete_all_actions(&self) -> Result<u64, ActionError>;

    /// Start a project
    async fn create_project(&self, request: CreateProjectRequest) -> Result<Action, ActionError>;

    /// Edit a project
    async fn edit_project(&self, request: EditProjectRequest) -> Result<Action, ActionError>;

    /// Get an action by ID
    async fn get_action(&self, id: ActionId) -> Result<Option<Action>, ActionError>;

    /// Get an action with its creator populated
    async fn get_action_detail(&self, id: ActionId) -> Result<Option<ActionDetail>, ActionError>;

    /// List all live actions
    async fn list_actions(&self) -> Result<Vec<Action>, ActionError>;

    /// Actions a character may see: all of them for Control, else their own
    async fn list_actions_for_character(
        &self,
        character_id: CharacterId,
    ) -> Result<Vec<Action>, ActionError>;
}

/// Default implementation of ActionService over a repository provider
pub struct ActionServiceImpl<R: RepositoryProvider> {
    repository: R,
    notifier: Arc<dyn NotificationPort>,
    policy: EffortPolicy,
    gate: Mutex<()>,
}

impl<R: RepositoryProvider> ActionServiceImpl<R> {
    /// Create a new ActionServiceImpl with the given repository and notification sink
    pub fn new(repository: R, notifier: Arc<dyn NotificationPort>, policy: EffortPolicy) -> Self {
        Self {
            repository,
            notifier,
            policy,
            gate: Mutex::new(()),
        }
    }

    /// Validate the fields every action carries
    fn validate_action_fields(intent: &str, description: &str, effort: i32) -> Result<(), ActionError> {
        if intent.trim().is_empty() {
            return Err(ActionError::Validation("Action intent cannot be empty".into()));
        }
        if description.trim().is_empty() {
            return Err(ActionError::Validation("Action description cannot be empty".into()));
        }
        if effort < 0 {
            return Err(ActionError::Validation(format!(
                "Action effort cannot be negative: {}",
                effort
            )));
        }
        Ok(())
    }

    async fn load_action(&self, id: ActionId) -> Result<Action, ActionError> {
        self.repository
            .actions()
            .get(id)
            .await?
            .ok_or_else(|| ActionError::not_found("Action", id))
    }

    async fn load_character(&self, id: CharacterId) -> Result<Character, ActionError> {
        self.repository
            .characters()
            .get(id)
            .await?
            .ok_or_else(|| ActionError::not_found("Character", id))
    }

    /// Load assets by name; any miss is an explicit error
    async fn load_assets(&self, names: &[String]) -> Result<Vec<Asset>, ActionError> {
        let repo = self.repository.assets();
        let mut assets = Vec::with_capacity(names.len());
        for name in names {
            let asset = repo
                .find_by_name(name)
                .await?
                .ok_or_else(|| ActionError::AssetNotFound(name.clone()))?;
            assets.push(asset);
        }
        Ok(assets)
    }

    /// Load assets to claim, refusing any already committed elsewhere
    async fn load_claimable_assets(&self, names: &[String]) -> Result<Vec<Asset>, ActionError> {
        let assets = self.load_assets(names).await?;
        if let Some(busy) = assets.iter().find(|a| !a.is_claimable()) {
            return Err(ActionError::AssetInUse(busy.name.clone()));
        }
        Ok(assets)
    }

    /// Load assets to free, dropping those another live action still references
    async fn load_releasable_assets(
        &self,
        names: &[String],
        releasing: ActionId,
    ) -> Result<Vec<Asset>, ActionError> {
        let assets = self.load_assets(names).await?;
        let actions = self.repository.actions();
        let mut releasable = Vec::with_capacity(assets.len());
        for asset in assets {
            let holders = actions.list_referencing_asset(&asset.name).await?;
            if holders.iter().any(|a| a.id != releasing) {
                debug!(asset = %asset.name, "Asset still referenced by another action; keeping it used");
                continue;
            }
            releasable.push(asset);
        }
        Ok(releasable)
    }

    async fn ensure_intent_available(
        &self,
        intent: &str,
        except: Option<ActionId>,
    ) -> Result<(), ActionError> {
        match self.repository.actions().find_by_intent(intent).await? {
            Some(existing) if Some(existing.id) != except => {
                Err(ActionError::DuplicateIntent(intent.to_string()))
            }
            _ => Ok(()),
        }
    }

    /// Save an action as the first write, mapping a unique-index hit to a duplicate intent
    async fn save_action_first(&self, action: &Action, journal: &mut WriteJournal) -> Result<(), ActionError> {
        match self.repository.actions().save(action).await {
            Ok(()) => {
                journal.push(format!("action {} saved", action.id));
                Ok(())
            }
            Err(RepoError::Conflict(_)) if journal.is_empty() => {
                Err(ActionError::DuplicateIntent(action.intent.clone()))
            }
            Err(e) => Err(journal.fail(e)),
        }
    }

    async fn claim_assets(
        &self,
        assets: &mut [Asset],
        journal: &mut WriteJournal,
        changes: &mut ChangeSet,
    ) -> Result<(), ActionError> {
        let repo = self.repository.assets();
        for asset in assets.iter_mut() {
            asset.claim();
            journal.record(format!("asset {} claimed", asset.name), repo.save(asset).await)?;
            changes.record(Collection::Assets, &asset.name);
            debug!(asset = %asset.name, "Asset used");
        }
        Ok(())
    }

    async fn release_assets(
        &self,
        assets: &mut [Asset],
        journal: &mut WriteJournal,
        changes: &mut ChangeSet,
    ) -> Result<(), ActionError> {
        let repo = self.repository.assets();
        for asset in assets.iter_mut() {
            asset.release();
            journal.record(format!("asset {} freed", asset.name), repo.save(asset).await)?;
            changes.record(Collection::Assets, &asset.name);
            debug!(asset = %asset.name, "Asset unused");
        }
        Ok(())
    }

    async fn save_character(
        &self,
        character: &Character,
        before: i32,
        journal: &mut WriteJournal,
        changes: &mut ChangeSet,
    ) -> Result<(), ActionError> {
        journal.record(
            format!("character {} effort {} -> {}", character.id, before, character.effort),
            self.repository.characters().save(character).await,
        )?;
        changes.record(Collection::Characters, character.id);
        Ok(())
    }

    /// Publish one notice per touched collection; failures are logged, not returned
    async fn publish(&self, changes: ChangeSet) {
        if changes.is_empty() {
            return;
        }
        for notice in changes.into_notices() {
            let event_name = notice.event_name();
            if let Err(e) = self.notifier.publish(notice).await {
                warn!(event_name, error = %e, "Failed to publish change notice");
            }
        }
    }

    /// Announce what already landed when a write phase fails part-way
    async fn publish_partial(&self, err: ActionError, changes: ChangeSet) -> ActionError {
        if matches!(err, ActionError::PartialReconciliation { .. }) {
            self.publish(changes).await;
        }
        err
    }

    /// Delete one action and settle its resources; caller holds the gate
    async fn delete_locked(
        &self,
        id: ActionId,
        changes: &mut ChangeSet,
    ) -> Result<DeletedAction, ActionError> {
        let action = self.load_action(id).await?;
        let mut freed = self.load_releasable_assets(&action.assets.names(), id).await?;
        let mut character = self.load_character(action.creator).await?;

        let before = character.effort;
        let delta = compute_effort_delta(Some(action.effort), 0);
        character.effort = settle_effort(before, delta, &self.policy, self.policy.clamp_on_delete)?;

        let mut journal = WriteJournal::new();
        let removed = journal.record(
            format!("action {} deleted", id),
            self.repository.actions().delete(id).await,
        )?;
        if removed.is_none() {
            return Err(ActionError::not_found("Action", id));
        }
        changes.record(Collection::Actions, id);

        self.release_assets(&mut freed, &mut journal, changes).await?;
        if character.effort != before {
            self.save_character(&character, before, &mut journal, changes).await?;
        }

        Ok(DeletedAction {
            reconciliation: Reconciliation {
                creator: character.id,
                effort_before: before,
                effort_after: character.effort,
                claimed: Vec::new(),
                freed: freed.into_iter().map(|a| a.name).collect(),
            },
            action,
        })
    }
}

#[async_trait]
impl<R: RepositoryProvider> ActionService for ActionServiceImpl<R> {
    #[instrument(skip(self), fields(creator = %request.creator, intent = %request.intent))]
    async fn create_action(&self, request: CreateActionRequest) -> Result<Action, ActionError> {
        Self::validate_action_fields(&request.intent, &request.description, request.effort)?;
        let _gate = self.gate.lock().await;

        self.ensure_intent_available(&request.intent, None).await?;

        let slots = AssetSlots::new(request.assets);
        let mut claimed = self.load_claimable_assets(&slots.names()).await?;
        let mut character = self.load_character(request.creator).await?;

        let before = character.effort;
        let delta = compute_effort_delta(None, request.effort);
        character.effort = settle_effort(before, delta, &self.policy, true)?;

        let action = Action::new(request.creator, request.intent, request.description, request.effort)
            .with_assets(slots);

        let mut changes = ChangeSet::new(format!("create_action:{}", action.id));
        changes.touch(Collection::Characters).touch(Collection::Assets);

        let mut journal = WriteJournal::new();
        let written: Result<(), ActionError> = async {
            self.save_action_first(&action, &mut journal).await?;
            changes.record(Collection::Actions, action.id);
            if character.effort != before {
                self.save_character(&character, before, &mut journal, &mut changes).await?;
            }
            self.claim_assets(&mut claimed, &mut journal, &mut changes).await
        }
        .await;
        if let Err(e) = written {
            return Err(self.publish_partial(e, changes).await);
        }

        info!(
            action_id = %action.id,
            effort_before = before,
            effort_after = character.effort,
            assets = ?action.assets.names(),
            "Action \"{}\" created",
            action.intent
        );
        self.publish(changes).await;
        Ok(action)
    }

    #[instrument(skip(self), fields(action_id = %request.id))]
    async fn edit_action(&self, request: EditActionRequest) -> Result<Action, ActionError> {
        Self::validate_action_fields(&request.intent, &request.description, request.effort)?;
        let _gate = self.gate.lock().await;

        let mut action = self.load_action(request.id).await?;
        if action.kind == ActionKind::Project {
            return Err(ActionError::Validation(format!(
                "Action {} is a project; use EditProject",
                action.id
            )));
        }
        if request.intent != action.intent {
            self.ensure_intent_available(&request.intent, Some(action.id)).await?;
        }

        let new_slots = AssetSlots::new(request.assets);
        let deltas = compute_asset_deltas(
            action.assets.names().as_slice(),
            new_slots.names().as_slice(),
        );
        let mut freed = self.load_releasable_assets(&deltas.to_free, action.id).await?;
        let mut claimed = self.load_claimable_assets(&deltas.to_claim).await?;

        let delta = compute_effort_delta(Some(action.effort), request.effort);
        let mut character = self.load_character(action.creator).await?;
        let before = character.effort;
        if delta != 0 {
            character.effort = settle_effort(before, delta, &self.policy, true)?;
        }

        action.description = request.description;
        action.intent = request.intent;
        action.effort = request.effort;
        action.assets = new_slots;
        action.touch();

        let mut changes = ChangeSet::new(format!("edit_action:{}", action.id));
        changes
            .touch(Collection::Characters)
            .touch(Collection::Assets)
            .record(Collection::Actions, action.id);

        let mut journal = WriteJournal::new();
        let written: Result<(), ActionError> = async {
            self.save_action_first(&action, &mut journal).await?;
            if character.effort != before {
                self.save_character(&character, before, &mut journal, &mut changes).await?;
            }
            self.release_assets(&mut freed, &mut journal, &mut changes).await?;
            self.claim_assets(&mut claimed, &mut journal, &mut changes).await
        }
        .await;
        if let Err(e) = written {
            return Err(self.publish_partial(e, changes).await);
        }

        info!(
            action_id = %action.id,
            effort_delta = delta,
            freed = ?deltas.to_free,
            claimed = ?deltas.to_claim,
            "Action \"{}\" edited",
            action.intent
        );
        self.publish(changes).await;
        Ok(action)
    }

    #[instrument(skip(self), fields(action_id = %request.id))]
    async fn resolve_action(&self, request: ResolveActionRequest) -> Result<Action, ActionError> {
        let _gate = self.gate.lock().await;

        let mut action = self.load_action(request.id).await?;
        action.resolve(request.result, request.die_result, request.status);

        self.repository.actions().save(&action).await?;

        info!(
            action_id = %action.id,
            die_result = action.die_result,
            status = ?action.status.phase,
            "Action result edited"
        );
        let mut changes = ChangeSet::new(format!("resolve_action:{}", action.id));
        changes.record(Collection::Actions, action.id);
        self.publish(changes).await;
        Ok(action)
    }

    #[instrument(skip(self))]
    async fn delete_action(&self, id: ActionId) -> Result<DeletedAction, ActionError> {
        let _gate = self.gate.lock().await;

        let mut changes = ChangeSet::new(format!("delete_action:{}", id));
        changes.touch(Collection::Characters).touch(Collection::Assets);
        let deleted = match self.delete_locked(id, &mut changes).await {
            Ok(deleted) => deleted,
            Err(e) => return Err(self.publish_partial(e, changes).await),
        };

        info!(
            action_id = %id,
            effort_before = deleted.reconciliation.effort_before,
            effort_after = deleted.reconciliation.effort_after,
            freed = ?deleted.reconciliation.freed,
            "Action with the id {} was deleted",
            id
        );
        self.publish(changes).await;
        Ok(deleted)
    }

    #[instrument(skip(self))]
    async fn delete_all_actions(&self) -> Result<u64, ActionError> {
        let _gate = self.gate.lock().await;

        let actions = self.repository.actions().list().await?;
        let mut changes = ChangeSet::new("delete_all_actions");
        changes.touch(Collection::Actions);

        let mut deleted = 0u64;
        for action in actions {
            match self.delete_locked(action.id, &mut changes).await {
                Ok(_) => deleted += 1,
                Err(e) => {
                    warn!(action_id = %action.id, deleted, error = %e, "Bulk delete stopped");
                    self.publish(changes).await;
                    return Err(e);
                }
            }
        }

        info!(deleted, "We wiped out {} Actions", deleted);
        self.publish(changes).await;
        Ok(deleted)
    }

    #[instrument(skip(self), fields(creator = %request.creator, intent = %request.intent))]
    async fn create_project(&self, request: CreateProjectRequest) -> Result<Action, ActionError> {
        Self::validate_action_fields(&request.intent, &request.description, 0)?;
        let _gate = self.gate.lock().await;

        self.ensure_intent_available(&request.intent, None).await?;
        self.load_character(request.creator).await?;

        let mut project = Action::project(request.creator, request.intent, request.description);
        project.players = request.players;
        project.image = request.image;
        project.status.progress = request.progress;

        let mut journal = WriteJournal::new();
        self.save_action_first(&project, &mut journal).await?;

        info!(action_id = %project.id, "Project \"{}\" created", project.intent);
        let mut changes = ChangeSet::new(format!("create_project:{}", project.id));
        changes.record(Collection::Actions, project.id);
        self.publish(changes).await;
        Ok(project)
    }

    #[instrument(skip(self), fields(action_id = %request.id))]
    async fn edit_project(&self, request: EditProjectRequest) -> Result<Action, ActionError> {
        Self::validate_action_fields(&request.intent, &request.description, 0)?;
        let _gate = self.gate.lock().await;

        let mut project = self.load_action(request.id).await?;
        if request.intent != project.intent {
            self.ensure_intent_available(&request.intent, Some(project.id)).await?;
        }

        project.description = request.description;
        project.intent = request.intent;
        project.status.progress = request.progress;
        project.players = request.players;
        project.image = request.image;
        project.touch();

        let mut journal = WriteJournal::new();
        self.save_action_first(&project, &mut journal).await?;

        if project.kind != ActionKind::Project {
            debug!(action_id = %project.id, "Project fields edited on a regular action");
        }
        info!(
            action_id = %project.id,
            progress = project.status.progress,
            "Project \"{}\" edited",
            project.intent
        );
        let mut changes = ChangeSet::new(format!("edit_project:{}", project.id));
        changes.record(Collection::Actions, project.id);
        self.publish(changes).await;
        Ok(project)
    }

    #[instrument(skip(self))]
    async fn get_action(&self, id: ActionId) -> Result<Option<Action>, ActionError> {
        debug!(action_id = %id, "Fetching action");
        Ok(self.repository.actions().get(id).await?)
    }

    #[instrument(skip(self))]
    async fn get_action_detail(&self, id: ActionId) -> Result<Option<ActionDetail>, ActionError> {
        let Some(action) = self.repository.actions().get(id).await? else {
            return Ok(None);
        };
        let creator = self.load_character(action.creator).await?;
        Ok(Some(ActionDetail { action, creator }))
    }

    #[instrument(skip(self))]
    async fn list_actions(&self) -> Result<Vec<Action>, ActionError> {
        debug!("Listing all actions");
        Ok(self.repository.actions().list().await?)
    }

    #[instrument(skip(self))]
    async fn list_actions_for_character(
        &self,
        character_id: CharacterId,
    ) -> Result<Vec<Action>, ActionError> {
        let character = self.load_character(character_id).await?;
        if character.is_control() {
            debug!(character = %character.name, "Control character; listing every action");
            return Ok(self.repository.actions().list().await?);
        }
        Ok(self.repository.actions().list_by_creator(character_id).await?)
    }
}
