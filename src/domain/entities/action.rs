//! Action entity - a player's declared intent, charged against effort and assets
//!
//! The Action is the aggregate root of the reconciliation engine: it ties a
//! creator Character (the effort source), up to three Assets (consumed
//! resources) and a resolution outcome together.

use chrono::{DateTime, Utc};

use crate::domain::value_objects::{ActionId, AssetSlots, CharacterId};

/// What sort of action this is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActionKind {
    /// A regular action, charged against effort and assets
    #[default]
    Action,
    /// A long-running project tracked by progress; never charged
    Project,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Action => "Action",
            ActionKind::Project => "Project",
        }
    }
}

impl std::str::FromStr for ActionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Action" => Ok(ActionKind::Action),
            "Project" => Ok(ActionKind::Project),
            other => Err(format!("Unknown action kind: {}", other)),
        }
    }
}

/// Publication phase; at most one is active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionPhase {
    Draft,
    Ready,
    Published,
}

impl ActionPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionPhase::Draft => "draft",
            ActionPhase::Ready => "ready",
            ActionPhase::Published => "published",
        }
    }
}

impl std::fmt::Display for ActionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ActionPhase {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(ActionPhase::Draft),
            "ready" => Ok(ActionPhase::Ready),
            "published" => Ok(ActionPhase::Published),
            other => Err(format!("Unknown action status: {}", other)),
        }
    }
}

/// Status block of an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionStatus {
    /// `None` when every phase flag has been cleared
    pub phase: Option<ActionPhase>,
    /// Project progress, independent of the phase
    pub progress: i32,
}

impl Default for ActionStatus {
    fn default() -> Self {
        Self {
            phase: Some(ActionPhase::Draft),
            progress: 0,
        }
    }
}

impl ActionStatus {
    pub fn is_draft(&self) -> bool {
        self.phase == Some(ActionPhase::Draft)
    }

    pub fn is_ready(&self) -> bool {
        self.phase == Some(ActionPhase::Ready)
    }

    pub fn is_published(&self) -> bool {
        self.phase == Some(ActionPhase::Published)
    }
}

/// A declared action
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub id: ActionId,
    pub kind: ActionKind,
    pub creator: CharacterId,
    /// Unique among live actions
    pub intent: String,
    pub description: String,
    /// Effort charged to the creator while this action is live
    pub effort: i32,
    pub assets: AssetSlots,
    pub status: ActionStatus,
    pub die_result: i32,
    pub result: Option<String>,
    pub players: Vec<CharacterId>,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Action {
    pub fn new(
        creator: CharacterId,
        intent: impl Into<String>,
        description: impl Into<String>,
        effort: i32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ActionId::new(),
            kind: ActionKind::Action,
            creator,
            intent: intent.into(),
            description: description.into(),
            effort,
            assets: AssetSlots::empty(),
            status: ActionStatus::default(),
            die_result: 0,
            result: None,
            players: Vec::new(),
            image: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// A project: never charged effort and holds no assets
    pub fn project(
        creator: CharacterId,
        intent: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        let mut action = Self::new(creator, intent, description, 0);
        action.kind = ActionKind::Project;
        action
    }

    pub fn with_assets(mut self, assets: AssetSlots) -> Self {
        self.assets = assets;
        self
    }

    /// Record a resolution; a provided status replaces the phase outright
    pub fn resolve(&mut self, result: impl Into<String>, die_result: i32, status: Option<ActionPhase>) {
        self.result = Some(result.into());
        self.die_result = die_result;
        if let Some(phase) = status {
            self.status.phase = Some(phase);
        }
        self.touch();
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_action_is_draft() {
        let action = Action::new(CharacterId::new(), "Scout the harbor", "Quietly", 2);
        assert!(action.status.is_draft());
        assert!(!action.status.is_ready());
        assert_eq!(action.kind, ActionKind::Action);
        assert!(action.assets.is_empty());
    }

    #[test]
    fn test_resolve_sets_exactly_one_phase() {
        let mut action = Action::new(CharacterId::new(), "Bribe the guard", "Coin", 1);
        action.resolve("The guard looks away", 5, Some(ActionPhase::Published));
        assert!(action.status.is_published());
        assert!(!action.status.is_draft());
        assert_eq!(action.die_result, 5);

        // No status leaves the phase alone
        action.resolve("Revised", 6, None);
        assert!(action.status.is_published());
        assert_eq!(action.result.as_deref(), Some("Revised"));
    }

    #[test]
    fn test_project_is_uncharged() {
        let project = Action::project(CharacterId::new(), "Build a lighthouse", "Stone by stone");
        assert_eq!(project.kind, ActionKind::Project);
        assert_eq!(project.effort, 0);
    }

    #[test]
    fn test_phase_parse() {
        assert_eq!("ready".parse::<ActionPhase>(), Ok(ActionPhase::Ready));
        assert!("archived".parse::<ActionPhase>().is_err());
        assert_eq!("Project".parse::<ActionKind>(), Ok(ActionKind::Project));
    }
}
