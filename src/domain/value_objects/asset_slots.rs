//! Asset slots - the up-to-three asset references an Action may hold

/// Number of asset slots on an Action
const ASSET_SLOT_COUNT: usize = 3;

/// Asset references by name, one per slot
///
/// Blank names are normalized to an empty slot, so a cleared slot and an
/// omitted slot are indistinguishable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetSlots([Option<String>; ASSET_SLOT_COUNT]);

impl AssetSlots {
    pub fn new(slots: [Option<String>; ASSET_SLOT_COUNT]) -> Self {
        Self(slots.map(|slot| {
            slot.map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
        }))
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Name held in a slot (0-based)
    pub fn slot(&self, index: usize) -> Option<&str> {
        self.0.get(index).and_then(|s| s.as_deref())
    }

    /// Distinct referenced names, in slot order
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::with_capacity(ASSET_SLOT_COUNT);
        for name in self.0.iter().flatten() {
            if !names.contains(name) {
                names.push(name.clone());
            }
        }
        names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().flatten().any(|n| n == name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }

    pub fn into_inner(self) -> [Option<String>; ASSET_SLOT_COUNT] {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_slots_are_empty() {
        let slots = AssetSlots::new([Some("  ".into()), None, Some("Rope".into())]);
        assert_eq!(slots.slot(0), None);
        assert_eq!(slots.slot(2), Some("Rope"));
        assert_eq!(slots.names(), vec!["Rope".to_string()]);
        assert!(!slots.is_empty());
        assert!(AssetSlots::empty().is_empty());
    }

    #[test]
    fn test_duplicate_names_collapse() {
        let slots = AssetSlots::new([Some("Rope".into()), Some("Rope".into()), Some("Lamp".into())]);
        assert_eq!(slots.names(), vec!["Rope".to_string(), "Lamp".to_string()]);
        assert!(slots.contains("Lamp"));
        assert!(!slots.contains("Sword"));
    }
}
