use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ActorId, PageId};

/// Events emitted after successful page writes, consumed by SSE listeners.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PageEvent {
    Welcome,
    Created(PageChange),
    Saved(SaveEvent),
    Published(PublishEvent),
    Unpublished(PageChange),
    Archived(PageChange),
    Deleted(PageChange),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageChange {
    pub page_id: PageId,
    pub slug: String,
    pub actor: Option<ActorId>,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveEvent {
    pub page_id: PageId,
    pub actor: ActorId,
    /// True for debounced background saves.
    pub auto: bool,
    pub block_count: usize,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishEvent {
    pub page_id: PageId,
    pub slug: String,
    pub actor: ActorId,
    pub block_count: usize,
    pub navigation_added: bool,
    pub timestamp: DateTime<Utc>,
}

impl PageEvent {
    pub fn page_id(&self) -> Option<PageId> {
        match self {
            PageEvent::Welcome => None,
            PageEvent::Saved(e) => Some(e.page_id),
            PageEvent::Published(e) => Some(e.page_id),
            PageEvent::Created(e)
            | PageEvent::Unpublished(e)
            | PageEvent::Archived(e)
            | PageEvent::Deleted(e) => Some(e.page_id),
        }
    }

    /// SSE event name.
    pub fn name(&self) -> &'static str {
        match self {
            PageEvent::Welcome => "welcome",
            PageEvent::Created(_) => "created",
            PageEvent::Saved(_) => "saved",
            PageEvent::Published(_) => "published",
            PageEvent::Unpublished(_) => "unpublished",
            PageEvent::Archived(_) => "archived",
            PageEvent::Deleted(_) => "deleted",
        }
    }
}
