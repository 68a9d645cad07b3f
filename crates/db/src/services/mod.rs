//! Workflow services built on the repositories.

pub mod commands;
pub mod version_service;

pub use commands::{CreateDraft, ListVersions, PublishVersion, RollbackVersion};
pub use version_service::VersionService;
