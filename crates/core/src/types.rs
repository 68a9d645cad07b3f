/// Version primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// User ids come from the identity collaborator and are recorded verbatim.
pub type UserId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
