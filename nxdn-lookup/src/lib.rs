//! NXDN identifier to callsign lookup with periodic background reload.

pub mod config;
pub mod error;
pub mod lookup;
pub mod scheduler;
pub mod service;
pub mod table;

pub use config::LookupConfig;
pub use error::{ConfigError, LoadError};
pub use lookup::{CallsignLookup, BROADCAST_ID};
pub use scheduler::{ReloadScheduler, ReloadTimer, SchedulerState};
pub use service::IdLookup;
pub use table::{TableStats, TableStore};
