//! Effort policy value object
//!
//! Governs how a Character's effort pool is settled when Actions charge or
//! refund it. Loaded from the environment with defaults matching the table
//! rules: a cap of 3, clamped on every credit, never negative.

/// Default upper bound of a Character's effort pool
const DEFAULT_MAX_EFFORT: i32 = 3;

/// Rules applied when settling effort charges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffortPolicy {
    /// Cap applied after a charge is settled
    pub max_effort: i32,
    /// Whether refunds from Delete/DeleteAll are clamped to `max_effort`
    pub clamp_on_delete: bool,
    /// Whether a debit may drive a pool below zero
    pub allow_negative_effort: bool,
}

impl Default for EffortPolicy {
    fn default() -> Self {
        Self {
            max_effort: DEFAULT_MAX_EFFORT,
            clamp_on_delete: true,
            allow_negative_effort: false,
        }
    }
}

impl EffortPolicy {
    /// Load from environment variables, using defaults for missing values
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup; unparsable values fall back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            max_effort: lookup_or(&lookup, "NEXUS_MAX_EFFORT", defaults.max_effort),
            clamp_on_delete: lookup_or(&lookup, "NEXUS_CLAMP_ON_DELETE", defaults.clamp_on_delete),
            allow_negative_effort: lookup_or(
                &lookup,
                "NEXUS_ALLOW_NEGATIVE_EFFORT",
                defaults.allow_negative_effort,
            ),
        }
    }
}

fn lookup_or<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> T {
    lookup(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_cap_at_three() {
        let policy = EffortPolicy::from_lookup(|_| None);
        assert_eq!(policy, EffortPolicy::default());
        assert_eq!(policy.max_effort, 3);
        assert!(policy.clamp_on_delete);
        assert!(!policy.allow_negative_effort);
    }

    #[test]
    fn test_overrides_and_bad_values() {
        let vars: HashMap<&str, &str> = [
            ("NEXUS_MAX_EFFORT", "5"),
            ("NEXUS_CLAMP_ON_DELETE", "false"),
            ("NEXUS_ALLOW_NEGATIVE_EFFORT", "maybe"),
        ]
        .into_iter()
        .collect();

        let policy = EffortPolicy::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(policy.max_effort, 5);
        assert!(!policy.clamp_on_delete);
        // Unparsable value keeps the default
        assert!(!policy.allow_negative_effort);
    }
}
