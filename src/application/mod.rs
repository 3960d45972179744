//! Application layer - Use cases orchestrating the domain
//!
//! This layer contains:
//! - Ports: repository and notification contracts
//! - Services: the action lifecycle engine and the roster
//! - DTOs: the serde command surface

pub mod dto;
pub mod ports;
pub mod services;
