//! Domain events - Notifications of state changes within the domain

pub mod change_notice;

pub use change_notice::{ChangeNotice, ChangeSet, Collection};
