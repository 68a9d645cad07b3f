//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that accept
//! any `PgExecutor` as the first argument; a workflow transaction passes its
//! own connection, plain reads pass the pool.

pub mod minisite_repo;
pub mod version_repo;

pub use minisite_repo::MinisiteRepo;
pub use version_repo::VersionRepo;
