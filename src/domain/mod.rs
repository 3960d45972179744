//! Domain layer - Core business logic with no external dependencies
//!
//! This layer contains:
//! - Entities: Character, Asset, Action
//! - Value Objects: ids, asset slots, effort policy
//! - Domain Events: collection change notices
//! - Domain Services: the resource ledger

pub mod entities;
pub mod events;
pub mod services;
pub mod value_objects;
