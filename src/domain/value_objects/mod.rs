//! Value objects - Immutable objects defined by their attributes

mod asset_slots;
mod effort_policy;
mod ids;

pub use asset_slots::AssetSlots;
pub use effort_policy::EffortPolicy;
pub use ids::*;
