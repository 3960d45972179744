//! Domain services - Pure business logic operations

pub mod resource_ledger;

pub use resource_ledger::{compute_asset_deltas, compute_effort_delta, settle_effort, LedgerError};
