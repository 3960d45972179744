//! Infrastructure layer - adapters for storage, notifications and the command surface

pub mod command_handler;
pub mod config;
pub mod notifications;
pub mod persistence;
pub mod state;
