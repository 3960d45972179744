//! Character entity - player-controlled characters that spend effort on actions

use crate::domain::value_objects::CharacterId;

/// Tag marking a Character as Control (game master staff)
const CONTROL_TAG: &str = "Control";

/// A player character with an effort pool
#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    /// Login name of the controlling player
    pub username: Option<String>,
    /// Effort pool; actions debit it, removals refund it
    pub effort: i32,
    pub tags: Vec<String>,
}

impl Character {
    pub fn new(name: impl Into<String>, effort: i32) -> Self {
        Self {
            id: CharacterId::new(),
            name: name.into(),
            username: None,
            effort,
            tags: Vec::new(),
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Control characters see every action, not just their own
    pub fn is_control(&self) -> bool {
        self.tags.iter().any(|t| t == CONTROL_TAG)
    }
}
