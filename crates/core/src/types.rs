/// Pages are keyed by UUID.
pub type PageId = uuid::Uuid;

/// The authenticated user stamped into `created_by` / `updated_by` / `published_by`.
pub type ActorId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
