use serde::{Deserialize, Serialize};

use crate::application::services::{ActionDetail, Reconciliation};
use crate::domain::entities::{Action, Asset, AssetKind, Character};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActionStatusDto {
    pub draft: bool,
    pub ready: bool,
    pub published: bool,
    pub progress: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResponseDto {
    pub id: String,
    pub model: String,
    pub creator: String,
    pub intent: String,
    pub description: String,
    pub effort: i32,
    pub asset1: Option<String>,
    pub asset2: Option<String>,
    pub asset3: Option<String>,
    pub status: ActionStatusDto,
    pub die_result: i32,
    pub result: Option<String>,
    pub players: Vec<String>,
    pub image: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Action> for ActionResponseDto {
    fn from(action: Action) -> Self {
        let [asset1, asset2, asset3] = action.assets.into_inner();
        Self {
            id: action.id.to_string(),
            model: action.kind.as_str().to_string(),
            creator: action.creator.to_string(),
            intent: action.intent,
            description: action.description,
            effort: action.effort,
            asset1,
            asset2,
            asset3,
            status: ActionStatusDto {
                draft: action.status.is_draft(),
                ready: action.status.is_ready(),
                published: action.status.is_published(),
                progress: action.status.progress,
            },
            die_result: action.die_result,
            result: action.result,
            players: action.players.iter().map(|p| p.to_string()).collect(),
            image: action.image,
            created_at: action.created_at.to_rfc3339(),
            updated_at: action.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterResponseDto {
    pub id: String,
    pub name: String,
    pub username: Option<String>,
    pub effort: i32,
    pub tags: Vec<String>,
}

impl From<Character> for CharacterResponseDto {
    fn from(character: Character) -> Self {
        Self {
            id: character.id.to_string(),
            name: character.name,
            username: character.username,
            effort: character.effort,
            tags: character.tags,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetStatusDto {
    pub hidden: bool,
    pub lent: bool,
    pub multi_use: bool,
    pub used: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetResponseDto {
    pub id: String,
    pub name: String,
    pub description: String,
    pub kind: AssetKind,
    pub status: AssetStatusDto,
    pub current_holder: Option<String>,
    pub uses: i32,
}

impl From<Asset> for AssetResponseDto {
    fn from(asset: Asset) -> Self {
        Self {
            id: asset.id.to_string(),
            name: asset.name,
            description: asset.description,
            kind: asset.kind,
            status: AssetStatusDto {
                hidden: asset.status.hidden,
                lent: asset.status.lent,
                multi_use: asset.status.multi_use,
                used: asset.status.used,
            },
            current_holder: asset.current_holder,
            uses: asset.uses,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionDetailResponseDto {
    pub action: ActionResponseDto,
    pub creator: CharacterResponseDto,
}

impl From<ActionDetail> for ActionDetailResponseDto {
    fn from(detail: ActionDetail) -> Self {
        Self {
            action: detail.action.into(),
            creator: detail.creator.into(),
        }
    }
}

/// Resources handed back or taken by an operation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconciliationDto {
    pub creator: String,
    pub effort_before: i32,
    pub effort_after: i32,
    pub claimed: Vec<String>,
    pub freed: Vec<String>,
}

impl From<Reconciliation> for ReconciliationDto {
    fn from(r: Reconciliation) -> Self {
        Self {
            creator: r.creator.to_string(),
            effort_before: r.effort_before,
            effort_after: r.effort_after,
            claimed: r.claimed,
            freed: r.freed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::ActionPhase;
    use crate::domain::value_objects::{AssetSlots, CharacterId};

    #[test]
    fn test_action_dto_flattens_slots_and_status() {
        let mut action = Action::new(CharacterId::new(), "Scale the wall", "At dusk", 2)
            .with_assets(AssetSlots::new([None, Some("Rope".into()), None]));
        action.status.phase = Some(ActionPhase::Published);

        let dto = ActionResponseDto::from(action);
        assert_eq!(dto.asset1, None);
        assert_eq!(dto.asset2.as_deref(), Some("Rope"));
        assert_eq!(
            dto.status,
            ActionStatusDto {
                draft: false,
                ready: false,
                published: true,
                progress: 0
            }
        );
        assert_eq!(dto.model, "Action");
    }
}
