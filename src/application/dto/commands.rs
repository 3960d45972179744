//! Command surface - messages callers send to the engine and its replies

use serde::{Deserialize, Serialize};

use crate::application::dto::action::{
    ActionDetailResponseDto, ActionResponseDto, AssetResponseDto, CharacterResponseDto,
    ReconciliationDto,
};
use crate::domain::entities::AssetKind;

/// Commands accepted by the engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ActionCommand {
    /// Declare an action
    CreateAction {
        creator: String,
        intent: String,
        description: String,
        effort: i32,
        #[serde(default)]
        asset1: Option<String>,
        #[serde(default)]
        asset2: Option<String>,
        #[serde(default)]
        asset3: Option<String>,
    },
    /// Edit an action; omitted asset slots are cleared
    EditAction {
        id: String,
        description: String,
        intent: String,
        effort: i32,
        #[serde(default)]
        asset1: Option<String>,
        #[serde(default)]
        asset2: Option<String>,
        #[serde(default)]
        asset3: Option<String>,
    },
    /// Record an outcome
    ResolveAction {
        id: String,
        result: String,
        die_result: i32,
        #[serde(default)]
        status: Option<String>,
    },
    DeleteAction {
        id: String,
    },
    DeleteAllActions,
    CreateProject {
        creator: String,
        intent: String,
        description: String,
        #[serde(default)]
        players: Vec<String>,
        #[serde(default)]
        image: Option<String>,
        #[serde(default)]
        progress: i32,
    },
    EditProject {
        id: String,
        description: String,
        intent: String,
        progress: i32,
        #[serde(default)]
        players: Vec<String>,
        #[serde(default)]
        image: Option<String>,
    },
    ListActions,
    GetAction {
        id: String,
    },
    GetActionDetail {
        id: String,
    },
    /// Actions visible to a character
    ListActionsForCharacter {
        character: String,
    },
    RegisterCharacter {
        name: String,
        #[serde(default)]
        username: Option<String>,
        effort: i32,
        #[serde(default)]
        tags: Vec<String>,
    },
    RegisterAsset {
        name: String,
        description: String,
        #[serde(default)]
        kind: AssetKind,
        #[serde(default)]
        multi_use: bool,
        #[serde(default)]
        current_holder: Option<String>,
    },
    GetCharacter {
        id: String,
    },
    ListCharacters,
    ListAssets,
}

/// Replies from the engine
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CommandResponse {
    Action {
        action: ActionResponseDto,
    },
    Actions {
        actions: Vec<ActionResponseDto>,
    },
    ActionDetail {
        detail: ActionDetailResponseDto,
    },
    /// Confirmation of a delete with the resources it freed
    Deleted {
        message: String,
        reconciliation: ReconciliationDto,
    },
    DeletedAll {
        count: u64,
        message: String,
    },
    Character {
        character: CharacterResponseDto,
    },
    Characters {
        characters: Vec<CharacterResponseDto>,
    },
    Asset {
        asset: AssetResponseDto,
    },
    Assets {
        assets: Vec<AssetResponseDto>,
    },
    Error {
        code: String,
        message: String,
    },
}

impl CommandResponse {
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        CommandResponse::Error {
            code: code.into(),
            message: message.into(),
        }
    }
}
