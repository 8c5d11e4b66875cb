//! Page CRUD and the draft/publish lifecycle.
//!
//! Every handler requires a bearer token; the actor it carries is passed
//! explicitly into the coordinator. Archived pages accept no further writes.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Html;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use page_builder_core::block::{normalize_order, Block};
use page_builder_core::page::{generate_slug, CreatePage, Page, PageSummary, SeoMeta};
use page_builder_core::persist::{PageMeta, PublishRequest};
use page_builder_core::render::{render_page, RenderMode};
use page_builder_core::types::PageId;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::routes::events;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/pages", get(list_pages).post(create_page))
        .route("/v1/pages/events", get(events::stream))
        .route("/v1/pages/slug-available", get(slug_available))
        .route("/v1/pages/by-slug/{slug}", get(get_page_by_slug))
        .route(
            "/v1/pages/{id}",
            get(get_page).put(save_page).delete(delete_page),
        )
        .route("/v1/pages/{id}/autosave", put(auto_save_page))
        .route("/v1/pages/{id}/publish", post(publish_page))
        .route("/v1/pages/{id}/unpublish", post(unpublish_page))
        .route("/v1/pages/{id}/archive", post(archive_page))
        .route("/v1/pages/{id}/preview", get(preview_page))
}

/// A page plus whether its draft differs from the live snapshot.
#[derive(Debug, Serialize)]
pub struct PageView {
    #[serde(flatten)]
    pub page: Page,
    pub has_unpublished_changes: bool,
}

impl From<Page> for PageView {
    fn from(page: Page) -> Self {
        let has_unpublished_changes = page.has_unpublished_changes();
        Self {
            page,
            has_unpublished_changes,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreatePageBody {
    /// Derived from the title when empty.
    #[serde(default)]
    pub slug: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub seo: SeoMeta,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

#[derive(Debug, Deserialize)]
pub struct SaveBody {
    pub blocks: Vec<Block>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

#[derive(Debug, Deserialize)]
pub struct AutoSaveBody {
    pub blocks: Vec<Block>,
}

#[derive(Debug, Serialize)]
pub struct AutoSaveResponse {
    /// False when the write failed; auto-save failures are logged, not raised.
    pub saved: bool,
    pub last_auto_saved_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct PublishBody {
    /// Current editor blocks. When they differ from the stored draft they are
    /// saved before publishing.
    #[serde(default)]
    pub blocks: Option<Vec<Block>>,
    #[serde(flatten)]
    pub request: PublishRequest,
}

#[derive(Debug, Serialize)]
pub struct PublishResponse {
    pub page: PageView,
    pub navigation_added: bool,
}

#[derive(Debug, Deserialize)]
pub struct SlugQuery {
    pub slug: String,
    #[serde(default)]
    pub exclude: Option<PageId>,
}

async fn load_editable(state: &AppState, id: PageId) -> ApiResult<Page> {
    let page = state.coordinator().get_page(id).await?;
    if !page.status.is_editable() {
        return Err(ApiError::Conflict(format!(
            "page '{}' is archived and can no longer be changed",
            page.slug
        )));
    }
    Ok(page)
}

async fn list_pages(
    State(state): State<AppState>,
    _user: AuthUser,
) -> ApiResult<Json<Vec<PageSummary>>> {
    Ok(Json(state.coordinator().list_pages().await?))
}

async fn create_page(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<CreatePageBody>,
) -> ApiResult<(StatusCode, Json<PageView>)> {
    let slug = match body.slug {
        Some(slug) if !slug.trim().is_empty() => slug.trim().to_string(),
        _ => generate_slug(&body.title),
    };
    let mut blocks = body.blocks;
    normalize_order(&mut blocks);
    let create = CreatePage {
        slug,
        title: body.title,
        description: body.description,
        seo: body.seo,
        blocks,
        created_by: None,
    };
    let page = state
        .coordinator()
        .create_page(create, Some(user.actor))
        .await?;
    Ok((StatusCode::CREATED, Json(page.into())))
}

async fn get_page(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<PageId>,
) -> ApiResult<Json<PageView>> {
    let page = state.coordinator().get_page(id).await?;
    Ok(Json(page.into()))
}

async fn get_page_by_slug(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(slug): Path<String>,
) -> ApiResult<Json<PageView>> {
    let page = state
        .coordinator()
        .get_page_by_slug(&slug)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("page '{slug}' not found")))?;
    Ok(Json(page.into()))
}

async fn save_page(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<PageId>,
    Json(body): Json<SaveBody>,
) -> ApiResult<Json<PageView>> {
    load_editable(&state, id).await?;
    let mut blocks = body.blocks;
    normalize_order(&mut blocks);
    let page = state
        .coordinator()
        .save(id, blocks, body.meta, Some(user.actor))
        .await?;
    Ok(Json(page.into()))
}

async fn auto_save_page(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<PageId>,
    Json(body): Json<AutoSaveBody>,
) -> ApiResult<Json<AutoSaveResponse>> {
    load_editable(&state, id).await?;
    let mut blocks = body.blocks;
    normalize_order(&mut blocks);
    let saved = state
        .coordinator()
        .auto_save(id, blocks, Some(user.actor))
        .await;
    Ok(Json(AutoSaveResponse {
        saved: saved.is_some(),
        last_auto_saved_at: saved.and_then(|page| page.last_auto_saved_at),
    }))
}

async fn publish_page(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<PageId>,
    Json(body): Json<PublishBody>,
) -> ApiResult<Json<PublishResponse>> {
    load_editable(&state, id).await?;
    let blocks = body.blocks.map(|mut blocks| {
        normalize_order(&mut blocks);
        blocks
    });
    let outcome = state
        .coordinator()
        .publish(id, blocks, body.request, Some(user.actor))
        .await?;
    Ok(Json(PublishResponse {
        page: outcome.page.into(),
        navigation_added: outcome.navigation_added,
    }))
}

async fn unpublish_page(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<PageId>,
) -> ApiResult<Json<PageView>> {
    load_editable(&state, id).await?;
    let page = state.coordinator().unpublish(id, Some(user.actor)).await?;
    Ok(Json(page.into()))
}

async fn archive_page(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<PageId>,
) -> ApiResult<Json<PageView>> {
    load_editable(&state, id).await?;
    let page = state.coordinator().archive(id, Some(user.actor)).await?;
    Ok(Json(page.into()))
}

async fn delete_page(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<PageId>,
) -> ApiResult<StatusCode> {
    state.coordinator().delete(id, Some(user.actor)).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn slug_available(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<SlugQuery>,
) -> ApiResult<Json<Value>> {
    let available = state
        .coordinator()
        .is_slug_available(&query.slug, query.exclude)
        .await?;
    Ok(Json(json!({ "slug": query.slug, "available": available })))
}

/// Draft render in editing mode: hidden blocks are shown, marked hidden.
async fn preview_page(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<PageId>,
) -> ApiResult<Html<String>> {
    let page = state.coordinator().get_page(id).await?;
    Ok(Html(
        render_page(&page.blocks, RenderMode::Editing).to_html(),
    ))
}
