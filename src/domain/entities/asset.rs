//! Asset entity - items, traits, wealth and bonds a Character can commit to actions

use serde::{Deserialize, Serialize};

use crate::domain::value_objects::{AssetId, CharacterId};

/// Default number of uses for a fresh asset
const DEFAULT_ASSET_USES: i32 = 999;

/// Asset variant
///
/// Bonds carry the Character the bond is with and its strength.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "model")]
pub enum AssetKind {
    #[default]
    Asset,
    Trait,
    Wealth,
    Bond {
        with: CharacterId,
        #[serde(default = "default_bond_level")]
        level: i32,
    },
}

fn default_bond_level() -> i32 {
    2
}

impl AssetKind {
    pub fn model_name(&self) -> &'static str {
        match self {
            AssetKind::Asset => "Asset",
            AssetKind::Trait => "Trait",
            AssetKind::Wealth => "Wealth",
            AssetKind::Bond { .. } => "Bond",
        }
    }
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.model_name())
    }
}

/// Status flags of an asset
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssetStatus {
    pub hidden: bool,
    pub lent: bool,
    /// Multi-use assets may be committed to several live actions at once
    pub multi_use: bool,
    /// True while a live action references this asset
    pub used: bool,
}

/// An asset a Character can spend into an action
#[derive(Debug, Clone, PartialEq)]
pub struct Asset {
    pub id: AssetId,
    /// Lookup key used by actions
    pub name: String,
    pub description: String,
    pub kind: AssetKind,
    pub status: AssetStatus,
    pub current_holder: Option<String>,
    pub uses: i32,
}

impl Asset {
    pub fn new(name: impl Into<String>, description: impl Into<String>, kind: AssetKind) -> Self {
        Self {
            id: AssetId::new(),
            name: name.into(),
            description: description.into(),
            kind,
            status: AssetStatus::default(),
            current_holder: None,
            uses: DEFAULT_ASSET_USES,
        }
    }

    pub fn multi_use(mut self) -> Self {
        self.status.multi_use = true;
        self
    }

    /// Whether another action may commit this asset
    pub fn is_claimable(&self) -> bool {
        !self.status.used || self.status.multi_use
    }

    /// Mark the asset as committed to an action
    pub fn claim(&mut self) {
        self.status.used = true;
    }

    /// Return the asset to the holder's pool
    pub fn release(&mut self) {
        self.status.used = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_and_release() {
        let mut rope = Asset::new("Rope", "Fifty feet of hemp", AssetKind::Asset);
        assert!(rope.is_claimable());

        rope.claim();
        assert!(rope.status.used);
        assert!(!rope.is_claimable());

        rope.release();
        assert!(!rope.status.used);
        assert!(rope.is_claimable());
    }

    #[test]
    fn test_multi_use_stays_claimable() {
        let mut contacts = Asset::new("Contacts", "Friends in the docks", AssetKind::Wealth).multi_use();
        contacts.claim();
        assert!(contacts.is_claimable());
    }

    #[test]
    fn test_bond_kind_serde() {
        let with = CharacterId::new();
        let kind = AssetKind::Bond { with, level: 4 };
        let json = serde_json::to_value(&kind).unwrap();
        assert_eq!(json["model"], "Bond");
        assert_eq!(json["level"], 4);

        let parsed: AssetKind =
            serde_json::from_value(serde_json::json!({ "model": "Bond", "with": with })).unwrap();
        assert_eq!(parsed, AssetKind::Bond { with, level: 2 });
        assert_eq!(parsed.to_string(), "Bond");
    }
}
