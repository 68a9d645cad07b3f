//! Row models and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` patch DTO (all `Option` fields) for partial updates

pub mod minisite;
pub mod status;
pub mod version;
