//! Application services - Use case implementations
//!
//! Each service follows hexagonal architecture principles, accepting a
//! repository provider and a notification sink and returning domain entities.

pub mod action_error;
pub mod action_service;
pub mod reconciliation;
pub mod roster_service;

pub use action_error::ActionError;

// Re-export action service types
pub use action_service::{
    ActionDetail, ActionService, ActionServiceImpl, CreateActionRequest, CreateProjectRequest,
    EditActionRequest, EditProjectRequest, ResolveActionRequest,
};
pub use reconciliation::Reconciliation;

// Re-export roster service types
pub use roster_service::{
    RegisterAssetRequest, RegisterCharacterRequest, RosterService, RosterServiceImpl,
};
