use serde::{Deserialize, Serialize};

use crate::block::Block;
use crate::types::{ActorId, PageId, Timestamp};

/// Lifecycle of a page: `draft → published → draft → published → archived`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl PageStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PageStatus::Draft => "draft",
            PageStatus::Published => "published",
            PageStatus::Archived => "archived",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "draft" => Some(PageStatus::Draft),
            "published" => Some(PageStatus::Published),
            "archived" => Some(PageStatus::Archived),
            _ => None,
        }
    }

    /// Archived pages are terminal.
    pub fn is_editable(self) -> bool {
        self != PageStatus::Archived
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeoMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub og_image: Option<String>,
}

/// The persisted page record.
///
/// `blocks` is the editable draft; `published_blocks` is the snapshot the
/// public site renders, written only by a publish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: PageStatus,
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(default)]
    pub published_blocks: Option<Vec<Block>>,
    #[serde(default)]
    pub seo: SeoMeta,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(default)]
    pub last_saved_at: Option<Timestamp>,
    #[serde(default)]
    pub last_auto_saved_at: Option<Timestamp>,
    #[serde(default)]
    pub published_at: Option<Timestamp>,
    #[serde(default)]
    pub created_by: Option<ActorId>,
    #[serde(default)]
    pub updated_by: Option<ActorId>,
    #[serde(default)]
    pub published_by: Option<ActorId>,
}

impl Page {
    /// True when the draft differs from what the public site shows.
    pub fn has_unpublished_changes(&self) -> bool {
        match &self.published_blocks {
            Some(published) => published != &self.blocks,
            None => true,
        }
    }

    pub fn summary(&self) -> PageSummary {
        PageSummary {
            id: self.id,
            slug: self.slug.clone(),
            title: self.title.clone(),
            status: self.status,
            updated_at: self.updated_at,
            published_at: self.published_at,
        }
    }
}

/// Listing row for the admin page table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSummary {
    pub id: PageId,
    pub slug: String,
    pub title: String,
    pub status: PageStatus,
    pub updated_at: Timestamp,
    pub published_at: Option<Timestamp>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePage {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub seo: SeoMeta,
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(skip)]
    pub created_by: Option<ActorId>,
}

impl CreatePage {
    pub fn new(slug: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
            description: None,
            seo: SeoMeta::default(),
            blocks: Vec::new(),
            created_by: None,
        }
    }
}

/// Draft write. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdatePage {
    pub id: PageId,
    pub slug: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub seo: Option<SeoMeta>,
    pub blocks: Option<Vec<Block>>,
    pub updated_by: Option<ActorId>,
}

/// Promote `blocks` to the published snapshot.
#[derive(Debug, Clone)]
pub struct PublishPage {
    pub id: PageId,
    pub blocks: Vec<Block>,
    pub published_by: ActorId,
}
