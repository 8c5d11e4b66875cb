//! PostgreSQL implementations of the storage collaborators.

pub mod pg;

pub use pg::{PgNavigationSink, PgPageStore};
