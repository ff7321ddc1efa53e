// src/models/mod.rs

//! Domain models for the rank watcher.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod report;
mod snapshot;
mod student;
mod subscription;

// Re-export all public types
pub use config::{
    Config, HttpConfig, LoggingConfig, MAX_SEATS, MarkerConfig, MessagesConfig, MonitorConfig,
    SourceConfig, TableConfig,
};
pub use report::PositionReport;
pub use snapshot::{ListMetadata, ListSnapshot, PublicationKey};
pub use student::{MIN_COLUMNS, StudentRecord};
pub use subscription::{RecipientId, Subscription};
