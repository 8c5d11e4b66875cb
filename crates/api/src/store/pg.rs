use async_trait::async_trait;
use chrono::{DateTime, Utc};
use page_builder_core::block::Block;
use page_builder_core::error::StoreError;
use page_builder_core::page::{
    CreatePage, Page, PageStatus, PageSummary, PublishPage, SeoMeta, UpdatePage,
};
use page_builder_core::persist::{NavEntry, NavPosition, NavigationSink, PageStore};
use page_builder_core::types::{ActorId, PageId};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

/// Column list shared across page queries.
const COLUMNS: &str = "id, slug, title, description, status, blocks, published_blocks, seo, \
     created_at, updated_at, last_saved_at, last_auto_saved_at, published_at, \
     created_by, updated_by, published_by";

#[derive(Debug, sqlx::FromRow)]
struct PageRow {
    id: Uuid,
    slug: String,
    title: String,
    description: Option<String>,
    status: String,
    blocks: Json<Vec<Block>>,
    published_blocks: Option<Json<Vec<Block>>>,
    seo: Json<SeoMeta>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    last_saved_at: Option<DateTime<Utc>>,
    last_auto_saved_at: Option<DateTime<Utc>>,
    published_at: Option<DateTime<Utc>>,
    created_by: Option<Uuid>,
    updated_by: Option<Uuid>,
    published_by: Option<Uuid>,
}

fn parse_status(status: &str) -> Result<PageStatus, StoreError> {
    PageStatus::parse(status)
        .ok_or_else(|| StoreError::Backend(format!("unknown page status '{status}'")))
}

impl TryFrom<PageRow> for Page {
    type Error = StoreError;

    fn try_from(row: PageRow) -> Result<Self, Self::Error> {
        Ok(Page {
            id: row.id,
            slug: row.slug,
            title: row.title,
            description: row.description,
            status: parse_status(&row.status)?,
            blocks: row.blocks.0,
            published_blocks: row.published_blocks.map(|json| json.0),
            seo: row.seo.0,
            created_at: row.created_at,
            updated_at: row.updated_at,
            last_saved_at: row.last_saved_at,
            last_auto_saved_at: row.last_auto_saved_at,
            published_at: row.published_at,
            created_by: row.created_by,
            updated_by: row.updated_by,
            published_by: row.published_by,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SummaryRow {
    id: Uuid,
    slug: String,
    title: String,
    status: String,
    updated_at: DateTime<Utc>,
    published_at: Option<DateTime<Utc>>,
}

impl TryFrom<SummaryRow> for PageSummary {
    type Error = StoreError;

    fn try_from(row: SummaryRow) -> Result<Self, Self::Error> {
        Ok(PageSummary {
            id: row.id,
            slug: row.slug,
            title: row.title,
            status: parse_status(&row.status)?,
            updated_at: row.updated_at,
            published_at: row.published_at,
        })
    }
}

fn store_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            return StoreError::Conflict(db.message().to_string());
        }
    }
    StoreError::Backend(err.to_string())
}

fn found(row: Option<PageRow>, id: PageId) -> Result<Page, StoreError> {
    row.ok_or(StoreError::NotFound(id))?.try_into()
}

/// Pages in the `pages` table, block sequences as JSONB.
#[derive(Debug, Clone)]
pub struct PgPageStore {
    pool: PgPool,
}

impl PgPageStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn set_status(
        &self,
        id: PageId,
        status: PageStatus,
        actor: ActorId,
    ) -> Result<Page, StoreError> {
        let query = format!(
            "UPDATE pages SET status = $2, updated_by = $3, updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, PageRow>(&query)
            .bind(id)
            .bind(status.as_str())
            .bind(actor)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)?;
        found(row, id)
    }
}

#[async_trait]
impl PageStore for PgPageStore {
    async fn get_page(&self, id: PageId) -> Result<Option<Page>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM pages WHERE id = $1");
        sqlx::query_as::<_, PageRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)?
            .map(Page::try_from)
            .transpose()
    }

    async fn get_page_by_slug(&self, slug: &str) -> Result<Option<Page>, StoreError> {
        let query = format!("SELECT {COLUMNS} FROM pages WHERE slug = $1");
        sqlx::query_as::<_, PageRow>(&query)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)?
            .map(Page::try_from)
            .transpose()
    }

    async fn list_pages(&self) -> Result<Vec<PageSummary>, StoreError> {
        sqlx::query_as::<_, SummaryRow>(
            "SELECT id, slug, title, status, updated_at, published_at
             FROM pages
             ORDER BY updated_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(store_error)?
        .into_iter()
        .map(PageSummary::try_from)
        .collect()
    }

    async fn create_page(&self, page: CreatePage) -> Result<Page, StoreError> {
        let query = format!(
            "INSERT INTO pages (id, slug, title, description, blocks, seo, created_by, updated_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, PageRow>(&query)
            .bind(Uuid::now_v7())
            .bind(&page.slug)
            .bind(&page.title)
            .bind(&page.description)
            .bind(Json(&page.blocks))
            .bind(Json(&page.seo))
            .bind(page.created_by)
            .fetch_one(&self.pool)
            .await
            .map_err(store_error)?;
        row.try_into()
    }

    async fn update_page(&self, update: UpdatePage) -> Result<Page, StoreError> {
        let query = format!(
            "UPDATE pages SET
                slug = COALESCE($2, slug),
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                seo = COALESCE($5, seo),
                blocks = COALESCE($6, blocks),
                updated_by = COALESCE($7, updated_by),
                updated_at = now(),
                last_saved_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, PageRow>(&query)
            .bind(update.id)
            .bind(&update.slug)
            .bind(&update.title)
            .bind(&update.description)
            .bind(update.seo.as_ref().map(Json))
            .bind(update.blocks.as_ref().map(Json))
            .bind(update.updated_by)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)?;
        found(row, update.id)
    }

    async fn auto_save_page(
        &self,
        id: PageId,
        blocks: Vec<Block>,
        actor: ActorId,
    ) -> Result<Page, StoreError> {
        let query = format!(
            "UPDATE pages SET
                blocks = $2,
                updated_by = $3,
                updated_at = now(),
                last_auto_saved_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, PageRow>(&query)
            .bind(id)
            .bind(Json(&blocks))
            .bind(actor)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)?;
        found(row, id)
    }

    async fn publish_page(&self, publish: PublishPage) -> Result<Page, StoreError> {
        let query = format!(
            "UPDATE pages SET
                published_blocks = $2,
                status = 'published',
                published_at = now(),
                published_by = $3,
                updated_at = now()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, PageRow>(&query)
            .bind(publish.id)
            .bind(Json(&publish.blocks))
            .bind(publish.published_by)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)?;
        found(row, publish.id)
    }

    async fn unpublish_page(&self, id: PageId, actor: ActorId) -> Result<Page, StoreError> {
        self.set_status(id, PageStatus::Draft, actor).await
    }

    async fn archive_page(&self, id: PageId, actor: ActorId) -> Result<Page, StoreError> {
        self.set_status(id, PageStatus::Archived, actor).await
    }

    async fn delete_page(&self, id: PageId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM pages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(store_error)?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(id));
        }
        Ok(())
    }

    async fn is_slug_available(
        &self,
        slug: &str,
        exclude: Option<PageId>,
    ) -> Result<bool, StoreError> {
        let taken: bool = sqlx::query_scalar(
            "SELECT EXISTS(
                SELECT 1 FROM pages WHERE slug = $1 AND ($2::uuid IS NULL OR id <> $2)
             )",
        )
        .bind(slug)
        .bind(exclude)
        .fetch_one(&self.pool)
        .await
        .map_err(store_error)?;
        Ok(!taken)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(())
    }
}

/// Menu entries in the `nav_entries` table, ordered by `position`.
#[derive(Debug, Clone)]
pub struct PgNavigationSink {
    pool: PgPool,
}

impl PgNavigationSink {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NavigationSink for PgNavigationSink {
    async fn upsert_entry(&self, entry: NavEntry) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(store_error)?;
        let bound = match entry.position {
            NavPosition::First => {
                "SELECT COALESCE(MIN(position), 0) - 1 FROM nav_entries WHERE slug <> $1"
            }
            NavPosition::Last => {
                "SELECT COALESCE(MAX(position), 0) + 1 FROM nav_entries WHERE slug <> $1"
            }
        };
        let position: i32 = sqlx::query_scalar(bound)
            .bind(&entry.slug)
            .fetch_one(&mut *tx)
            .await
            .map_err(store_error)?;
        sqlx::query(
            "INSERT INTO nav_entries (slug, label, position)
             VALUES ($1, $2, $3)
             ON CONFLICT (slug) DO UPDATE
             SET label = EXCLUDED.label, position = EXCLUDED.position, updated_at = now()",
        )
        .bind(&entry.slug)
        .bind(&entry.label)
        .bind(position)
        .execute(&mut *tx)
        .await
        .map_err(store_error)?;
        tx.commit().await.map_err(store_error)?;
        Ok(())
    }
}
