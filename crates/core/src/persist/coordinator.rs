//! The only writer of page records.
//!
//! Every operation resolves the acting identity once, up front, and either
//! uses the explicitly supplied actor or asks the [`IdentitySource`]. Manual
//! operations return a [`PersistError`]; auto-save logs and swallows.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::block::{check_publishable, validate_blocks, Block};
use crate::error::{PersistError, StoreError};
use crate::events::{EventBus, PageChange, PageEvent, PublishEvent, SaveEvent};
use crate::page::{
    validate_slug, CreatePage, Page, PageSummary, PublishPage, SeoMeta, UpdatePage,
};
use crate::types::{ActorId, PageId};

use super::store::{IdentitySource, NavEntry, NavPosition, NavigationSink, PageStore};

/// Pending page metadata edits carried along with a manual save.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageMeta {
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub seo: Option<SeoMeta>,
}

impl PageMeta {
    pub fn is_empty(&self) -> bool {
        self == &PageMeta::default()
    }
}

/// Menu entry to add or move when publishing. An empty label falls back to
/// the page title.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationRequest {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub position: NavPosition,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishRequest {
    #[serde(default)]
    pub navigation: Option<NavigationRequest>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublishOutcome {
    pub page: Page,
    /// Whether the navigation collaborator accepted the entry. A failure
    /// there does not undo the publish.
    pub navigation_added: bool,
}

#[derive(Clone)]
pub struct PersistenceCoordinator {
    store: Arc<dyn PageStore>,
    identity: Arc<dyn IdentitySource>,
    navigation: Option<Arc<dyn NavigationSink>>,
    events: EventBus,
}

fn slug_conflict(err: StoreError, slug: &str) -> PersistError {
    match err {
        StoreError::Conflict(_) => PersistError::SlugConflict(slug.to_string()),
        other => other.into(),
    }
}

impl PersistenceCoordinator {
    pub fn new(
        store: Arc<dyn PageStore>,
        identity: Arc<dyn IdentitySource>,
        events: EventBus,
    ) -> Self {
        Self {
            store,
            identity,
            navigation: None,
            events,
        }
    }

    pub fn with_navigation(mut self, navigation: Arc<dyn NavigationSink>) -> Self {
        self.navigation = Some(navigation);
        self
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn store(&self) -> &Arc<dyn PageStore> {
        &self.store
    }

    /// The explicit actor, else the cached identity, else a fresh one.
    fn resolve_actor(&self, actor: Option<ActorId>) -> Result<ActorId, PersistError> {
        actor
            .or_else(|| self.identity.current_actor())
            .or_else(|| self.identity.refresh())
            .ok_or(PersistError::Unauthenticated)
    }

    pub async fn get_page(&self, id: PageId) -> Result<Page, PersistError> {
        self.store
            .get_page(id)
            .await?
            .ok_or(PersistError::NotFound(id))
    }

    pub async fn get_page_by_slug(&self, slug: &str) -> Result<Option<Page>, PersistError> {
        Ok(self.store.get_page_by_slug(slug).await?)
    }

    pub async fn list_pages(&self) -> Result<Vec<PageSummary>, PersistError> {
        Ok(self.store.list_pages().await?)
    }

    /// Validate the slug and check it is free (ignoring `exclude`).
    pub async fn is_slug_available(
        &self,
        slug: &str,
        exclude: Option<PageId>,
    ) -> Result<bool, PersistError> {
        validate_slug(slug)?;
        Ok(self.store.is_slug_available(slug, exclude).await?)
    }

    async fn ensure_slug_free(
        &self,
        slug: &str,
        exclude: Option<PageId>,
    ) -> Result<(), PersistError> {
        if self.is_slug_available(slug, exclude).await? {
            Ok(())
        } else {
            Err(PersistError::SlugConflict(slug.to_string()))
        }
    }

    pub async fn create_page(
        &self,
        mut page: CreatePage,
        actor: Option<ActorId>,
    ) -> Result<Page, PersistError> {
        let actor = self.resolve_actor(actor)?;
        if page.title.trim().is_empty() {
            return Err(PersistError::Validation("title is required".to_string()));
        }
        validate_blocks(&page.blocks).map_err(|err| PersistError::Validation(err.to_string()))?;
        self.ensure_slug_free(&page.slug, None).await?;

        let slug = page.slug.clone();
        page.created_by = Some(actor);
        let created = self
            .store
            .create_page(page)
            .await
            .map_err(|err| slug_conflict(err, &slug))?;
        tracing::info!(page_id = %created.id, slug = %created.slug, "Page created");
        self.events.publish(PageEvent::Created(PageChange {
            page_id: created.id,
            slug: created.slug.clone(),
            actor: Some(actor),
            timestamp: Utc::now(),
        }));
        Ok(created)
    }

    /// Manual save of the draft and any pending metadata edits.
    pub async fn save(
        &self,
        page_id: PageId,
        blocks: Vec<Block>,
        meta: PageMeta,
        actor: Option<ActorId>,
    ) -> Result<Page, PersistError> {
        let actor = self.resolve_actor(actor)?;
        validate_blocks(&blocks).map_err(|err| PersistError::Validation(err.to_string()))?;
        if let Some(title) = &meta.title {
            if title.trim().is_empty() {
                return Err(PersistError::Validation("title is required".to_string()));
            }
        }
        if let Some(slug) = &meta.slug {
            self.ensure_slug_free(slug, Some(page_id)).await?;
        }

        let block_count = blocks.len();
        let slug = meta.slug.clone().unwrap_or_default();
        let update = UpdatePage {
            id: page_id,
            slug: meta.slug,
            title: meta.title,
            description: meta.description,
            seo: meta.seo,
            blocks: Some(blocks),
            updated_by: Some(actor),
        };
        let page = match self.store.update_page(update).await {
            Ok(page) => page,
            Err(err) => {
                tracing::warn!(page_id = %page_id, error = %err, "Manual save failed");
                return Err(slug_conflict(err, &slug));
            }
        };
        tracing::info!(page_id = %page_id, blocks = block_count, "Page saved");
        self.events.publish(PageEvent::Saved(SaveEvent {
            page_id,
            actor,
            auto: false,
            block_count,
            timestamp: Utc::now(),
        }));
        Ok(page)
    }

    /// Best-effort background save. Failures are logged and reported as
    /// `None`; they never reach the editor.
    pub async fn auto_save(
        &self,
        page_id: PageId,
        blocks: Vec<Block>,
        actor: Option<ActorId>,
    ) -> Option<Page> {
        let result = async {
            let actor = self.resolve_actor(actor)?;
            validate_blocks(&blocks).map_err(|err| PersistError::Validation(err.to_string()))?;
            let block_count = blocks.len();
            let page = self.store.auto_save_page(page_id, blocks, actor).await?;
            Ok::<_, PersistError>((page, actor, block_count))
        }
        .await;

        match result {
            Ok((page, actor, block_count)) => {
                tracing::debug!(page_id = %page_id, blocks = block_count, "Auto-saved page");
                self.events.publish(PageEvent::Saved(SaveEvent {
                    page_id,
                    actor,
                    auto: true,
                    block_count,
                    timestamp: Utc::now(),
                }));
                Some(page)
            }
            Err(err) => {
                tracing::warn!(page_id = %page_id, error = %err, "Auto-save failed");
                None
            }
        }
    }

    /// Copy the draft into the published snapshot.
    ///
    /// With `blocks`, those are saved as the draft first so draft and live
    /// content match afterwards; without, the stored draft is published.
    pub async fn publish(
        &self,
        page_id: PageId,
        blocks: Option<Vec<Block>>,
        request: PublishRequest,
        actor: Option<ActorId>,
    ) -> Result<PublishOutcome, PersistError> {
        let actor = self.resolve_actor(actor)?;
        let stored = self.get_page(page_id).await?;
        let (blocks, save_draft) = match blocks {
            Some(blocks) if blocks != stored.blocks => (blocks, true),
            _ => (stored.blocks, false),
        };
        check_publishable(&blocks).map_err(|err| PersistError::Validation(err.to_string()))?;
        if save_draft {
            self.store
                .update_page(UpdatePage {
                    id: page_id,
                    blocks: Some(blocks.clone()),
                    updated_by: Some(actor),
                    ..Default::default()
                })
                .await?;
        }

        let block_count = blocks.len();
        let page = match self
            .store
            .publish_page(PublishPage {
                id: page_id,
                blocks,
                published_by: actor,
            })
            .await
        {
            Ok(page) => page,
            Err(err) => {
                tracing::warn!(page_id = %page_id, error = %err, "Publish failed");
                return Err(err.into());
            }
        };
        tracing::info!(page_id = %page_id, slug = %page.slug, blocks = block_count, "Page published");

        let navigation_added = match request.navigation {
            Some(nav) => self.add_navigation(&page, nav).await,
            None => false,
        };

        self.events.publish(PageEvent::Published(PublishEvent {
            page_id,
            slug: page.slug.clone(),
            actor,
            block_count,
            navigation_added,
            timestamp: Utc::now(),
        }));
        Ok(PublishOutcome {
            page,
            navigation_added,
        })
    }

    async fn add_navigation(&self, page: &Page, request: NavigationRequest) -> bool {
        let Some(navigation) = &self.navigation else {
            tracing::warn!(page_id = %page.id, "Navigation requested but no navigation sink is configured");
            return false;
        };
        let label = request
            .label
            .filter(|label| !label.trim().is_empty())
            .unwrap_or_else(|| page.title.clone());
        let entry = NavEntry {
            label,
            slug: page.slug.clone(),
            position: request.position,
        };
        match navigation.upsert_entry(entry).await {
            Ok(()) => {
                tracing::info!(page_id = %page.id, position = request.position.as_str(), "Navigation entry updated");
                true
            }
            Err(err) => {
                tracing::warn!(page_id = %page.id, error = %err, "Navigation update failed");
                false
            }
        }
    }

    /// Back to draft. The published snapshot is kept, so publishing again
    /// without edits restores exactly what was live.
    pub async fn unpublish(
        &self,
        page_id: PageId,
        actor: Option<ActorId>,
    ) -> Result<Page, PersistError> {
        let actor = self.resolve_actor(actor)?;
        let page = self.store.unpublish_page(page_id, actor).await?;
        tracing::info!(page_id = %page_id, "Page unpublished");
        self.events.publish(PageEvent::Unpublished(PageChange {
            page_id,
            slug: page.slug.clone(),
            actor: Some(actor),
            timestamp: Utc::now(),
        }));
        Ok(page)
    }

    pub async fn archive(
        &self,
        page_id: PageId,
        actor: Option<ActorId>,
    ) -> Result<Page, PersistError> {
        let actor = self.resolve_actor(actor)?;
        let page = self.store.archive_page(page_id, actor).await?;
        tracing::info!(page_id = %page_id, "Page archived");
        self.events.publish(PageEvent::Archived(PageChange {
            page_id,
            slug: page.slug.clone(),
            actor: Some(actor),
            timestamp: Utc::now(),
        }));
        Ok(page)
    }

    pub async fn delete(&self, page_id: PageId, actor: Option<ActorId>) -> Result<(), PersistError> {
        let actor = self.resolve_actor(actor)?;
        let page = self.get_page(page_id).await?;
        self.store.delete_page(page_id).await?;
        tracing::info!(page_id = %page_id, slug = %page.slug, "Page deleted");
        self.events.publish(PageEvent::Deleted(PageChange {
            page_id,
            slug: page.slug,
            actor: Some(actor),
            timestamp: Utc::now(),
        }));
        Ok(())
    }
}
