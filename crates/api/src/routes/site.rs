use axum::extract::{Path, State};
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use page_builder_core::page::{Page, PageStatus};
use page_builder_core::render::{render_page, RenderMode};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Public site: the published snapshot only, never the draft.
pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/site/{slug}", get(site_page))
}

async fn site_page(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Html<String>> {
    let not_found = || ApiError::NotFound(format!("page '{slug}' not found"));
    let page = state
        .coordinator()
        .get_page_by_slug(&slug)
        .await?
        .ok_or_else(not_found)?;
    if page.status != PageStatus::Published {
        return Err(not_found());
    }
    let blocks = page.published_blocks.as_deref().ok_or_else(not_found)?;
    let body = render_page(blocks, RenderMode::Public).to_html();
    Ok(Html(document(&page, &body)))
}

fn document(page: &Page, body: &str) -> String {
    let title = page.seo.title.as_deref().unwrap_or(&page.title);
    let description = page
        .seo
        .description
        .as_deref()
        .or(page.description.as_deref());
    let mut head = format!(
        "<meta charset=\"utf-8\"><title>{}</title>",
        html_escape::encode_text(title)
    );
    if let Some(description) = description {
        head.push_str(&format!(
            "<meta name=\"description\" content=\"{}\">",
            html_escape::encode_double_quoted_attribute(description)
        ));
    }
    if !page.seo.keywords.is_empty() {
        head.push_str(&format!(
            "<meta name=\"keywords\" content=\"{}\">",
            html_escape::encode_double_quoted_attribute(&page.seo.keywords.join(", "))
        ));
    }
    if let Some(image) = &page.seo.og_image {
        head.push_str(&format!(
            "<meta property=\"og:image\" content=\"{}\">",
            html_escape::encode_double_quoted_attribute(image)
        ));
    }
    format!("<!DOCTYPE html><html><head>{head}</head><body>{body}</body></html>")
}
