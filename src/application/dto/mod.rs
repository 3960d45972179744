//! Data Transfer Objects - For the command boundary
//!
//! DTOs live in the application layer so the command adapter can
//! serialize/deserialize without pulling serde into the domain model.

pub mod action;
pub mod commands;

pub use action::*;
pub use commands::*;
