//! Change notices - announcements that an entity collection has changed
//!
//! Views listening on the notification sink refresh a collection when its
//! notice arrives. One mutating operation produces at most one notice per
//! collection.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};

/// Base data for all notices
#[derive(Debug, Clone)]
pub struct EventMetadata {
    /// When the change happened
    pub timestamp: DateTime<Utc>,
    /// Operation that caused the change, for tracing
    pub correlation_id: Option<String>,
}

/// Entity collections views can subscribe to
///
/// Ordering follows the publish order: Characters, then Assets, then Actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Characters,
    Assets,
    Actions,
}

impl Collection {
    /// Event name used on the wire
    pub fn event_name(&self) -> &'static str {
        match self {
            Collection::Characters => "updateCharacters",
            Collection::Assets => "updateAssets",
            Collection::Actions => "updateActions",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.event_name())
    }
}

/// A collection changed; `ids` lists the entities touched, if known
#[derive(Debug, Clone)]
pub struct ChangeNotice {
    pub metadata: EventMetadata,
    pub collection: Collection,
    pub ids: Vec<String>,
}

impl ChangeNotice {
    pub fn event_name(&self) -> &'static str {
        self.collection.event_name()
    }
}

/// Accumulates the collections touched by one operation
#[derive(Debug, Default)]
pub struct ChangeSet {
    correlation_id: Option<String>,
    touched: BTreeMap<Collection, BTreeSet<String>>,
}

impl ChangeSet {
    pub fn new(correlation_id: impl Into<String>) -> Self {
        Self {
            correlation_id: Some(correlation_id.into()),
            touched: BTreeMap::new(),
        }
    }

    /// Mark a collection changed without naming entities
    pub fn touch(&mut self, collection: Collection) -> &mut Self {
        self.touched.entry(collection).or_default();
        self
    }

    pub fn record(&mut self, collection: Collection, id: impl ToString) -> &mut Self {
        self.touched.entry(collection).or_default().insert(id.to_string());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.touched.is_empty()
    }

    /// One notice per touched collection, in publish order
    pub fn into_notices(self) -> Vec<ChangeNotice> {
        let correlation_id = self.correlation_id;
        self.touched
            .into_iter()
            .map(|(collection, ids)| ChangeNotice {
                metadata: EventMetadata {
                    timestamp: Utc::now(),
                    correlation_id: correlation_id.clone(),
                },
                collection,
                ids: ids.into_iter().collect(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_notice_per_collection() {
        let mut changes = ChangeSet::new("delete_action");
        changes
            .record(Collection::Actions, "a1")
            .record(Collection::Assets, "Rope")
            .record(Collection::Assets, "Rope")
            .touch(Collection::Characters)
            .record(Collection::Actions, "a1");

        let notices = changes.into_notices();
        let names: Vec<_> = notices.iter().map(|n| n.event_name()).collect();
        assert_eq!(names, vec!["updateCharacters", "updateAssets", "updateActions"]);
        assert_eq!(notices[1].ids, vec!["Rope".to_string()]);
        assert!(notices[0].ids.is_empty());
        assert_eq!(notices[2].metadata.correlation_id.as_deref(), Some("delete_action"));
    }
}
