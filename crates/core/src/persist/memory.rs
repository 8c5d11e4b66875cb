//! In-memory [`PageStore`] and [`NavigationSink`] for tests and local runs.
//!
//! Pages live in a `HashMap` behind a `tokio::sync::RwLock`. The store can be
//! switched into an unavailable mode in which every call fails with a
//! backend error, to exercise failure paths.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::block::Block;
use crate::error::StoreError;
use crate::page::{CreatePage, Page, PageStatus, PageSummary, PublishPage, UpdatePage};
use crate::types::{ActorId, PageId};

use super::store::{NavEntry, NavPosition, NavigationSink, PageStore};

#[derive(Default)]
pub struct MemoryPageStore {
    pages: RwLock<HashMap<PageId, Page>>,
    nav: RwLock<Vec<NavEntry>>,
    unavailable: AtomicBool,
}

impl MemoryPageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail (or succeed again).
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Navigation entries in menu order.
    pub async fn nav_entries(&self) -> Vec<NavEntry> {
        self.nav.read().await.clone()
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("store unavailable".to_string()));
        }
        Ok(())
    }

    async fn modify<F>(&self, id: PageId, f: F) -> Result<Page, StoreError>
    where
        F: FnOnce(&mut Page) + Send,
    {
        self.check()?;
        let mut pages = self.pages.write().await;
        let page = pages.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        f(page);
        page.updated_at = Utc::now();
        Ok(page.clone())
    }
}

fn slug_taken(pages: &HashMap<PageId, Page>, slug: &str, exclude: Option<PageId>) -> bool {
    pages
        .values()
        .any(|page| page.slug == slug && Some(page.id) != exclude)
}

#[async_trait]
impl PageStore for MemoryPageStore {
    async fn get_page(&self, id: PageId) -> Result<Option<Page>, StoreError> {
        self.check()?;
        Ok(self.pages.read().await.get(&id).cloned())
    }

    async fn get_page_by_slug(&self, slug: &str) -> Result<Option<Page>, StoreError> {
        self.check()?;
        let pages = self.pages.read().await;
        Ok(pages.values().find(|page| page.slug == slug).cloned())
    }

    async fn list_pages(&self) -> Result<Vec<PageSummary>, StoreError> {
        self.check()?;
        let pages = self.pages.read().await;
        let mut summaries: Vec<PageSummary> = pages.values().map(Page::summary).collect();
        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(summaries)
    }

    async fn create_page(&self, page: CreatePage) -> Result<Page, StoreError> {
        self.check()?;
        let mut pages = self.pages.write().await;
        if slug_taken(&pages, &page.slug, None) {
            return Err(StoreError::Conflict(format!(
                "slug '{}' is already in use",
                page.slug
            )));
        }
        let now = Utc::now();
        let record = Page {
            id: Uuid::now_v7(),
            slug: page.slug,
            title: page.title,
            description: page.description,
            status: PageStatus::Draft,
            blocks: page.blocks,
            published_blocks: None,
            seo: page.seo,
            created_at: now,
            updated_at: now,
            last_saved_at: None,
            last_auto_saved_at: None,
            published_at: None,
            created_by: page.created_by,
            updated_by: page.created_by,
            published_by: None,
        };
        pages.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_page(&self, update: UpdatePage) -> Result<Page, StoreError> {
        self.check()?;
        let mut pages = self.pages.write().await;
        if let Some(slug) = &update.slug {
            if slug_taken(&pages, slug, Some(update.id)) {
                return Err(StoreError::Conflict(format!("slug '{slug}' is already in use")));
            }
        }
        let page = pages
            .get_mut(&update.id)
            .ok_or(StoreError::NotFound(update.id))?;
        let now = Utc::now();
        if let Some(slug) = update.slug {
            page.slug = slug;
        }
        if let Some(title) = update.title {
            page.title = title;
        }
        if let Some(description) = update.description {
            page.description = Some(description);
        }
        if let Some(seo) = update.seo {
            page.seo = seo;
        }
        if let Some(blocks) = update.blocks {
            page.blocks = blocks;
        }
        page.updated_by = update.updated_by.or(page.updated_by);
        page.updated_at = now;
        page.last_saved_at = Some(now);
        Ok(page.clone())
    }

    async fn auto_save_page(
        &self,
        id: PageId,
        blocks: Vec<Block>,
        actor: ActorId,
    ) -> Result<Page, StoreError> {
        self.modify(id, move |page| {
            page.blocks = blocks;
            page.updated_by = Some(actor);
            page.last_auto_saved_at = Some(Utc::now());
        })
        .await
    }

    async fn publish_page(&self, publish: PublishPage) -> Result<Page, StoreError> {
        let PublishPage {
            id,
            blocks,
            published_by,
        } = publish;
        self.modify(id, move |page| {
            page.published_blocks = Some(blocks);
            page.status = PageStatus::Published;
            page.published_at = Some(Utc::now());
            page.published_by = Some(published_by);
        })
        .await
    }

    async fn unpublish_page(&self, id: PageId, actor: ActorId) -> Result<Page, StoreError> {
        self.modify(id, move |page| {
            page.status = PageStatus::Draft;
            page.updated_by = Some(actor);
        })
        .await
    }

    async fn archive_page(&self, id: PageId, actor: ActorId) -> Result<Page, StoreError> {
        self.modify(id, move |page| {
            page.status = PageStatus::Archived;
            page.updated_by = Some(actor);
        })
        .await
    }

    async fn delete_page(&self, id: PageId) -> Result<(), StoreError> {
        self.check()?;
        self.pages
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound(id))
    }

    async fn is_slug_available(
        &self,
        slug: &str,
        exclude: Option<PageId>,
    ) -> Result<bool, StoreError> {
        self.check()?;
        Ok(!slug_taken(&*self.pages.read().await, slug, exclude))
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check()
    }
}

#[async_trait]
impl NavigationSink for MemoryPageStore {
    async fn upsert_entry(&self, entry: NavEntry) -> Result<(), StoreError> {
        self.check()?;
        let mut nav = self.nav.write().await;
        nav.retain(|existing| existing.slug != entry.slug);
        match entry.position {
            NavPosition::First => nav.insert(0, entry),
            NavPosition::Last => nav.push(entry),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::{BlockContent, BlockId, BlockKind};
    use assert_matches::assert_matches;

    fn paragraph(id: &str, order: usize) -> Block {
        Block::new(BlockId::new(id), order, BlockContent::template(BlockKind::Paragraph))
    }

    #[tokio::test]
    async fn create_rejects_taken_slug() {
        let store = MemoryPageStore::new();
        store.create_page(CreatePage::new("about", "About")).await.unwrap();
        let err = store
            .create_page(CreatePage::new("about", "Other"))
            .await
            .unwrap_err();
        assert_matches!(err, StoreError::Conflict(_));
    }

    #[tokio::test]
    async fn slug_availability_honours_exclude() {
        let store = MemoryPageStore::new();
        let page = store.create_page(CreatePage::new("about", "About")).await.unwrap();
        assert!(!store.is_slug_available("about", None).await.unwrap());
        assert!(store.is_slug_available("about", Some(page.id)).await.unwrap());
        assert!(store.is_slug_available("contact", None).await.unwrap());
    }

    #[tokio::test]
    async fn rename_onto_taken_slug_conflicts() {
        let store = MemoryPageStore::new();
        store.create_page(CreatePage::new("a", "A")).await.unwrap();
        let b = store.create_page(CreatePage::new("b", "B")).await.unwrap();
        let err = store
            .update_page(UpdatePage {
                id: b.id,
                slug: Some("a".into()),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert_matches!(err, StoreError::Conflict(_));
    }

    #[tokio::test]
    async fn unpublish_keeps_snapshot() {
        let store = MemoryPageStore::new();
        let page = store.create_page(CreatePage::new("home", "Home")).await.unwrap();
        let actor = Uuid::new_v4();
        let blocks = vec![paragraph("p_1", 0)];
        store
            .publish_page(PublishPage {
                id: page.id,
                blocks: blocks.clone(),
                published_by: actor,
            })
            .await
            .unwrap();
        let page = store.unpublish_page(page.id, actor).await.unwrap();
        assert_eq!(page.status, PageStatus::Draft);
        assert_eq!(page.published_blocks, Some(blocks));
    }

    #[tokio::test]
    async fn auto_save_stamps_auto_timestamp_only() {
        let store = MemoryPageStore::new();
        let page = store.create_page(CreatePage::new("home", "Home")).await.unwrap();
        let page = store
            .auto_save_page(page.id, vec![paragraph("p_1", 0)], Uuid::new_v4())
            .await
            .unwrap();
        assert!(page.last_auto_saved_at.is_some());
        assert!(page.last_saved_at.is_none());
        assert_eq!(page.blocks.len(), 1);
    }

    #[tokio::test]
    async fn missing_pages_are_not_found() {
        let store = MemoryPageStore::new();
        let id = Uuid::new_v4();
        assert!(store.get_page(id).await.unwrap().is_none());
        assert_matches!(store.delete_page(id).await, Err(StoreError::NotFound(_)));
        assert_matches!(
            store.archive_page(id, Uuid::new_v4()).await,
            Err(StoreError::NotFound(_))
        );
    }

    #[tokio::test]
    async fn navigation_upsert_moves_existing_entry() {
        let store = MemoryPageStore::new();
        for slug in ["a", "b"] {
            store
                .upsert_entry(NavEntry {
                    label: slug.to_uppercase(),
                    slug: slug.into(),
                    position: NavPosition::Last,
                })
                .await
                .unwrap();
        }
        store
            .upsert_entry(NavEntry {
                label: "Bee".into(),
                slug: "b".into(),
                position: NavPosition::First,
            })
            .await
            .unwrap();
        let nav = store.nav_entries().await;
        assert_eq!(nav.len(), 2);
        assert_eq!(nav[0].label, "Bee");
        assert_eq!(nav[1].slug, "a");
    }

    #[tokio::test]
    async fn unavailable_store_fails_every_call() {
        let store = MemoryPageStore::new();
        store.set_unavailable(true);
        assert_matches!(store.ping().await, Err(StoreError::Backend(_)));
        assert_matches!(store.list_pages().await, Err(StoreError::Backend(_)));
        store.set_unavailable(false);
        assert!(store.ping().await.is_ok());
    }
}
