//! Domain entities - Core business objects with identity

mod action;
mod asset;
mod character;

pub use action::{Action, ActionKind, ActionPhase, ActionStatus};
pub use asset::{Asset, AssetKind, AssetStatus};
pub use character::Character;
