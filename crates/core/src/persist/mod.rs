//! Persistence: collaborator traits, the coordinator that writes drafts and
//! published snapshots, and the debounced edit session on top of it.

pub mod autosave;
pub mod coordinator;
pub mod memory;
pub mod session;
pub mod store;

pub use autosave::{AutoSaveTimer, DEFAULT_AUTO_SAVE_INTERVAL};
pub use coordinator::{
    NavigationRequest, PageMeta, PersistenceCoordinator, PublishOutcome, PublishRequest,
};
pub use memory::MemoryPageStore;
pub use session::{EditSession, SessionConfig};
pub use store::{IdentitySource, NavEntry, NavPosition, NavigationSink, PageStore, StaticIdentity};
