//! Command handler - decodes commands, dispatches them to the services and
//! encodes the replies

use std::sync::Arc;

use crate::application::dto::{
    ActionCommand, ActionResponseDto, AssetResponseDto, CharacterResponseDto, CommandResponse,
};
use crate::application::services::{
    ActionError, ActionService, CreateActionRequest, CreateProjectRequest, EditActionRequest,
    EditProjectRequest, RegisterAssetRequest, RegisterCharacterRequest, ResolveActionRequest,
    RosterService,
};
use crate::domain::entities::ActionPhase;
use crate::domain::value_objects::{ActionId, CharacterId};

/// Front door of the engine
#[derive(Clone)]
pub struct CommandHandler {
    actions: Arc<dyn ActionService>,
    roster: Arc<dyn RosterService>,
}

fn validation(message: impl Into<String>) -> CommandResponse {
    CommandResponse::error("VALIDATION_ERROR", message)
}

fn from_error(err: ActionError) -> CommandResponse {
    CommandResponse::error(err.kind(), err.to_string())
}

fn parse_action_id(value: &str) -> Result<ActionId, CommandResponse> {
    ActionId::parse(value).map_err(|_| validation(format!("Invalid action id: {}", value)))
}

fn parse_character_id(value: &str) -> Result<CharacterId, CommandResponse> {
    CharacterId::parse(value).map_err(|_| validation(format!("Invalid character id: {}", value)))
}

fn parse_players(values: &[String]) -> Result<Vec<CharacterId>, CommandResponse> {
    values.iter().map(|p| parse_character_id(p)).collect()
}

fn parse_phase(value: Option<String>) -> Result<Option<ActionPhase>, CommandResponse> {
    value
        .map(|s| s.parse::<ActionPhase>())
        .transpose()
        .map_err(|e| validation(e))
}

fn action_not_found(id: ActionId) -> CommandResponse {
    from_error(ActionError::not_found("Action", id.to_string()))
}

impl CommandHandler {
    pub fn new(actions: Arc<dyn ActionService>, roster: Arc<dyn RosterService>) -> Self {
        Self { actions, roster }
    }

    /// Handle one JSON-encoded command, returning the JSON reply
    pub async fn handle_json(&self, line: &str) -> String {
        let response = match serde_json::from_str::<ActionCommand>(line) {
            Ok(command) => self.handle(command).await,
            Err(e) => {
                tracing::debug!(error = %e, "Rejected malformed command");
                validation(format!("Malformed command: {}", e))
            }
        };
        serde_json::to_string(&response).unwrap_or_else(|e| {
            format!(
                r#"{{"type":"Error","code":"STORAGE_ERROR","message":"Failed to encode response: {}"}}"#,
                e
            )
        })
    }

    pub async fn handle(&self, command: ActionCommand) -> CommandResponse {
        match self.dispatch(command).await {
            Ok(response) => response,
            Err(response) => response,
        }
    }

    async fn dispatch(&self, command: ActionCommand) -> Result<CommandResponse, CommandResponse> {
        let response = match command {
            ActionCommand::CreateAction {
                creator,
                intent,
                description,
                effort,
                asset1,
                asset2,
                asset3,
            } => {
                let request = CreateActionRequest {
                    creator: parse_character_id(&creator)?,
                    intent,
                    description,
                    effort,
                    assets: [asset1, asset2, asset3],
                };
                let action = self.actions.create_action(request).await.map_err(from_error)?;
                CommandResponse::Action {
                    action: action.into(),
                }
            }

            ActionCommand::EditAction {
                id,
                description,
                intent,
                effort,
                asset1,
                asset2,
                asset3,
            } => {
                let request = EditActionRequest {
                    id: parse_action_id(&id)?,
                    description,
                    intent,
                    effort,
                    assets: [asset1, asset2, asset3],
                };
                let action = self.actions.edit_action(request).await.map_err(from_error)?;
                CommandResponse::Action {
                    action: action.into(),
                }
            }

            ActionCommand::ResolveAction {
                id,
                result,
                die_result,
                status,
            } => {
                let request = ResolveActionRequest {
                    id: parse_action_id(&id)?,
                    result,
                    die_result,
                    status: parse_phase(status)?,
                };
                let action = self.actions.resolve_action(request).await.map_err(from_error)?;
                CommandResponse::Action {
                    action: action.into(),
                }
            }

            ActionCommand::DeleteAction { id } => {
                let id = parse_action_id(&id)?;
                let deleted = self.actions.delete_action(id).await.map_err(from_error)?;
                CommandResponse::Deleted {
                    message: format!("Action - {} deleted", deleted.action.intent),
                    reconciliation: deleted.reconciliation.into(),
                }
            }

            ActionCommand::DeleteAllActions => {
                let count = self.actions.delete_all_actions().await.map_err(from_error)?;
                CommandResponse::DeletedAll {
                    count,
                    message: format!("{} actions deleted", count),
                }
            }

            ActionCommand::CreateProject {
                creator,
                intent,
                description,
                players,
                image,
                progress,
            } => {
                let request = CreateProjectRequest {
                    creator: parse_character_id(&creator)?,
                    intent,
                    description,
                    players: parse_players(&players)?,
                    image,
                    progress,
                };
                let action = self.actions.create_project(request).await.map_err(from_error)?;
                CommandResponse::Action {
                    action: action.into(),
                }
            }

            ActionCommand::EditProject {
                id,
                description,
                intent,
                progress,
                players,
                image,
            } => {
                let request = EditProjectRequest {
                    id: parse_action_id(&id)?,
                    description,
                    intent,
                    progress,
                    players: parse_players(&players)?,
                    image,
                };
                let action = self.actions.edit_project(request).await.map_err(from_error)?;
                CommandResponse::Action {
                    action: action.into(),
                }
            }

            ActionCommand::ListActions => {
                let actions = self.actions.list_actions().await.map_err(from_error)?;
                CommandResponse::Actions {
                    actions: actions.into_iter().map(ActionResponseDto::from).collect(),
                }
            }

            ActionCommand::GetAction { id } => {
                let id = parse_action_id(&id)?;
                let action = self
                    .actions
                    .get_action(id)
                    .await
                    .map_err(from_error)?
                    .ok_or_else(|| action_not_found(id))?;
                CommandResponse::Action {
                    action: action.into(),
                }
            }

            ActionCommand::GetActionDetail { id } => {
                let id = parse_action_id(&id)?;
                let detail = self
                    .actions
                    .get_action_detail(id)
                    .await
                    .map_err(from_error)?
                    .ok_or_else(|| action_not_found(id))?;
                CommandResponse::ActionDetail {
                    detail: detail.into(),
                }
            }

            ActionCommand::ListActionsForCharacter { character } => {
                let character = parse_character_id(&character)?;
                let actions = self
                    .actions
                    .list_actions_for_character(character)
                    .await
                    .map_err(from_error)?;
                CommandResponse::Actions {
                    actions: actions.into_iter().map(ActionResponseDto::from).collect(),
                }
            }

            ActionCommand::RegisterCharacter {
                name,
                username,
                effort,
                tags,
            } => {
                let character = self
                    .roster
                    .register_character(RegisterCharacterRequest {
                        name,
                        username,
                        effort,
                        tags,
                    })
                    .await
                    .map_err(from_error)?;
                CommandResponse::Character {
                    character: character.into(),
                }
            }

            ActionCommand::RegisterAsset {
                name,
                description,
                kind,
                multi_use,
                current_holder,
            } => {
                let asset = self
                    .roster
                    .register_asset(RegisterAssetRequest {
                        name,
                        description,
                        kind,
                        multi_use,
                        current_holder,
                    })
                    .await
                    .map_err(from_error)?;
                CommandResponse::Asset {
                    asset: asset.into(),
                }
            }

            ActionCommand::GetCharacter { id } => {
                let id = parse_character_id(&id)?;
                let character = self
                    .roster
                    .get_character(id)
                    .await
                    .map_err(from_error)?
                    .ok_or_else(|| from_error(ActionError::not_found("Character", id)))?;
                CommandResponse::Character {
                    character: character.into(),
                }
            }

            ActionCommand::ListCharacters => {
                let characters = self.roster.list_characters().await.map_err(from_error)?;
                CommandResponse::Characters {
                    characters: characters
                        .into_iter()
                        .map(CharacterResponseDto::from)
                        .collect(),
                }
            }

            ActionCommand::ListAssets => {
                let assets = self.roster.list_assets().await.map_err(from_error)?;
                CommandResponse::Assets {
                    assets: assets.into_iter().map(AssetResponseDto::from).collect(),
                }
            }
        };
        Ok(response)
    }
}
