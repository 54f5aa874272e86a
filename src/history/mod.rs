//! Download history module.
//!
//! Provides:
//! - Loading the latest URL history for a source
//! - Saving a new dated history file with backup rotation
//! - A shared in-memory history set for one pipeline run

pub mod shared;
pub mod store;

pub use shared::SharedHistory;
pub use store::{HistoryStore, BACKUP_FOLDER};
