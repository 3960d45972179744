//! Resource ledger - pure effort and asset arithmetic
//!
//! Computes what an action's creation, edit or removal implies for its
//! creator's effort pool and for the `used` flags of the assets it names.
//! No I/O happens here; the lifecycle engine applies the results.

use std::collections::BTreeSet;

use crate::domain::value_objects::EffortPolicy;

/// Asset names to release and to claim for one change
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetDeltas {
    /// Referenced before, not after
    pub to_free: Vec<String>,
    /// Referenced after, not before
    pub to_claim: Vec<String>,
}

impl AssetDeltas {
    pub fn is_empty(&self) -> bool {
        self.to_free.is_empty() && self.to_claim.is_empty()
    }
}

/// Errors produced while settling effort
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("Insufficient effort: {available} available, {requested} requested")]
    InsufficientEffort { available: i32, requested: i32 },
    #[error("Effort out of range: {current} minus {delta}")]
    OutOfRange { current: i32, delta: i32 },
}

/// Set difference between old and new asset references
///
/// Order-insensitive; duplicates and blank names are ignored. Results are
/// sorted by name.
pub fn compute_asset_deltas<S: AsRef<str>>(old_refs: &[S], new_refs: &[S]) -> AssetDeltas {
    let old: BTreeSet<&str> = names(old_refs);
    let new: BTreeSet<&str> = names(new_refs);

    AssetDeltas {
        to_free: old.difference(&new).map(|s| s.to_string()).collect(),
        to_claim: new.difference(&old).map(|s| s.to_string()).collect(),
    }
}

fn names<S: AsRef<str>>(refs: &[S]) -> BTreeSet<&str> {
    refs.iter()
        .map(|s| s.as_ref().trim())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Amount to debit from the creator: positive debits, negative credits
///
/// Create passes `None` as the old cost; Delete passes `0` as the new cost.
pub fn compute_effort_delta(old_cost: Option<i32>, new_cost: i32) -> i32 {
    new_cost - old_cost.unwrap_or(0)
}

/// Cap a pool at `max`
fn clamp_effort(value: i32, max: i32) -> i32 {
    value.min(max)
}

/// Apply a debit (positive `delta`) or credit (negative `delta`) to a pool
///
/// A debit below zero is refused unless the policy allows negative pools.
/// When `clamp` is set the result is capped at the policy's maximum.
pub fn settle_effort(
    current: i32,
    delta: i32,
    policy: &EffortPolicy,
    clamp: bool,
) -> Result<i32, LedgerError> {
    let raw = current
        .checked_sub(delta)
        .ok_or(LedgerError::OutOfRange { current, delta })?;
    if delta > 0 && raw < 0 && !policy.allow_negative_effort {
        return Err(LedgerError::InsufficientEffort {
            available: current,
            requested: delta,
        });
    }

    Ok(if clamp {
        clamp_effort(raw, policy.max_effort)
    } else {
        raw
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_deltas_set_difference() {
        let deltas = compute_asset_deltas(&["Rope", "Lamp"], &["Lamp", "Horse"]);
        assert_eq!(deltas.to_free, vec!["Rope".to_string()]);
        assert_eq!(deltas.to_claim, vec!["Horse".to_string()]);
    }

    #[test]
    fn test_asset_deltas_ignore_order_duplicates_and_blanks() {
        let deltas = compute_asset_deltas(&["Lamp", "Rope", ""], &["Rope", "Rope", "Lamp"]);
        assert!(deltas.is_empty());

        let empty: [&str; 0] = [];
        let deltas = compute_asset_deltas(&empty, &["Rope", "Rope"]);
        assert_eq!(deltas.to_claim, vec!["Rope".to_string()]);
        assert!(deltas.to_free.is_empty());
    }

    #[test]
    fn test_effort_delta() {
        assert_eq!(compute_effort_delta(None, 2), 2);
        assert_eq!(compute_effort_delta(Some(2), 0), -2);
        assert_eq!(compute_effort_delta(Some(1), 3), 2);
    }

    #[test]
    fn test_clamp_effort() {
        assert_eq!(clamp_effort(4, 3), 3);
        assert_eq!(clamp_effort(2, 3), 2);
        assert_eq!(clamp_effort(-1, 3), -1);
    }

    #[test]
    fn test_settle_effort_credit_clamps_at_cap() {
        let policy = EffortPolicy::default();
        // Edit from 2 to 0 with 2 remaining: raw 4, capped at 3
        assert_eq!(settle_effort(2, compute_effort_delta(Some(2), 0), &policy, true), Ok(3));
        assert_eq!(settle_effort(2, -2, &policy, false), Ok(4));
    }

    #[test]
    fn test_settle_effort_refuses_overdraft() {
        let policy = EffortPolicy::default();
        assert_eq!(
            settle_effort(1, 2, &policy, true),
            Err(LedgerError::InsufficientEffort { available: 1, requested: 2 })
        );

        let lenient = EffortPolicy {
            allow_negative_effort: true,
            ..EffortPolicy::default()
        };
        assert_eq!(settle_effort(1, 2, &lenient, true), Ok(-1));
    }

    #[test]
    fn test_settle_effort_out_of_range() {
        let lenient = EffortPolicy {
            allow_negative_effort: true,
            ..EffortPolicy::default()
        };
        assert_eq!(
            settle_effort(i32::MIN + 1, 2, &lenient, true),
            Err(LedgerError::OutOfRange { current: i32::MIN + 1, delta: 2 })
        );
        assert_eq!(
            settle_effort(i32::MAX, -1, &lenient, false),
            Err(LedgerError::OutOfRange { current: i32::MAX, delta: -1 })
        );
    }
}
