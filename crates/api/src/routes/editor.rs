use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use page_builder_core::block::BlockKind;
use page_builder_core::editor::{panel_fields, FieldSpec, StyleField};
use serde::Serialize;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Static metadata the editing UI needs: palette, panels, auto-save timing.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/editor/settings", get(settings))
        .route("/v1/editor/panels/{block_type}", get(panel))
}

#[derive(Debug, Serialize)]
pub struct PaletteEntry {
    #[serde(rename = "type")]
    pub kind: BlockKind,
    pub label: &'static str,
    pub container: bool,
}

#[derive(Debug, Serialize)]
pub struct EditorSettings {
    pub auto_save_interval_secs: u64,
    pub block_kinds: Vec<PaletteEntry>,
}

#[derive(Debug, Serialize)]
pub struct PanelSchema {
    #[serde(rename = "type")]
    pub kind: BlockKind,
    pub fields: &'static [FieldSpec],
    pub styles: [StyleField; 10],
}

async fn settings(State(state): State<AppState>) -> Json<EditorSettings> {
    let block_kinds = BlockKind::ALL
        .into_iter()
        .map(|kind| PaletteEntry {
            kind,
            label: kind.label(),
            container: kind.is_container(),
        })
        .collect();
    Json(EditorSettings {
        auto_save_interval_secs: state.config().auto_save_interval.as_secs(),
        block_kinds,
    })
}

async fn panel(Path(block_type): Path<String>) -> ApiResult<Json<PanelSchema>> {
    let kind: BlockKind = block_type
        .parse()
        .map_err(|_| ApiError::NotFound(format!("block type '{block_type}' not found")))?;
    Ok(Json(PanelSchema {
        kind,
        fields: panel_fields(kind),
        styles: StyleField::ALL,
    }))
}
