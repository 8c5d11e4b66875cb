//! Collaborator boundaries of the persistence layer.
//!
//! The coordinator never talks to a database, a session or a menu directly;
//! it goes through these traits so the backend can be PostgreSQL in the
//! service and [`MemoryPageStore`](super::MemoryPageStore) in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::block::Block;
use crate::error::StoreError;
use crate::page::{CreatePage, Page, PageSummary, PublishPage, UpdatePage};
use crate::types::{ActorId, PageId};

/// Page storage.
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`get_page`](PageStore::get_page) | Load a page by id |
/// | [`get_page_by_slug`](PageStore::get_page_by_slug) | Load a page by slug |
/// | [`create_page`](PageStore::create_page) | Insert a new draft page |
/// | [`update_page`](PageStore::update_page) | Manual save; stamps `last_saved_at` |
/// | [`auto_save_page`](PageStore::auto_save_page) | Draft blocks only; stamps `last_auto_saved_at` |
/// | [`publish_page`](PageStore::publish_page) | Copy blocks into `published_blocks` |
/// | [`unpublish_page`](PageStore::unpublish_page) | Back to draft, snapshot kept |
/// | [`archive_page`](PageStore::archive_page) | Terminal status |
/// | [`delete_page`](PageStore::delete_page) | Remove the record |
/// | [`is_slug_available`](PageStore::is_slug_available) | Uniqueness pre-check |
#[async_trait]
pub trait PageStore: Send + Sync {
    async fn get_page(&self, id: PageId) -> Result<Option<Page>, StoreError>;

    async fn get_page_by_slug(&self, slug: &str) -> Result<Option<Page>, StoreError>;

    /// All pages, most recently updated first.
    async fn list_pages(&self) -> Result<Vec<PageSummary>, StoreError>;

    /// Fails with [`StoreError::Conflict`] if the slug is taken.
    async fn create_page(&self, page: CreatePage) -> Result<Page, StoreError>;

    async fn update_page(&self, update: UpdatePage) -> Result<Page, StoreError>;

    async fn auto_save_page(
        &self,
        id: PageId,
        blocks: Vec<Block>,
        actor: ActorId,
    ) -> Result<Page, StoreError>;

    async fn publish_page(&self, publish: PublishPage) -> Result<Page, StoreError>;

    async fn unpublish_page(&self, id: PageId, actor: ActorId) -> Result<Page, StoreError>;

    async fn archive_page(&self, id: PageId, actor: ActorId) -> Result<Page, StoreError>;

    async fn delete_page(&self, id: PageId) -> Result<(), StoreError>;

    async fn is_slug_available(
        &self,
        slug: &str,
        exclude: Option<PageId>,
    ) -> Result<bool, StoreError>;

    /// Cheap liveness probe for health checks.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Who is acting. `current_actor` returns the cached identity; `refresh`
/// asks the session provider again and may still come back empty.
pub trait IdentitySource: Send + Sync {
    fn current_actor(&self) -> Option<ActorId>;

    fn refresh(&self) -> Option<ActorId>;
}

/// A fixed identity, used where the actor is already known (e.g. a verified
/// bearer token) or absent.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticIdentity(pub Option<ActorId>);

impl IdentitySource for StaticIdentity {
    fn current_actor(&self) -> Option<ActorId> {
        self.0
    }

    fn refresh(&self) -> Option<ActorId> {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NavPosition {
    First,
    #[default]
    Last,
}

impl NavPosition {
    pub fn as_str(self) -> &'static str {
        match self {
            NavPosition::First => "first",
            NavPosition::Last => "last",
        }
    }
}

/// A menu entry pointing at a published page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavEntry {
    pub label: String,
    pub slug: String,
    pub position: NavPosition,
}

/// Site navigation. Upserting an entry for a slug that already has one
/// updates its label and moves it to `position`.
#[async_trait]
pub trait NavigationSink: Send + Sync {
    async fn upsert_entry(&self, entry: NavEntry) -> Result<(), StoreError>;
}
