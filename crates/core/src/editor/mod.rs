//! Editing a page's draft: the document model, commands, drag-and-drop
//! reordering, the canvas and configuration panels.

pub mod canvas;
pub mod command;
pub mod drag;
pub mod panel;
pub mod state;

pub use canvas::render_canvas;
pub use command::{BlockPatch, BlockUpdate, CommandResult, EditorCommand};
pub use drag::{closest_center, DragController, DropOutcome, Point, Rect};
pub use panel::{panel_fields, FieldInput, FieldSpec, PanelField, PanelView, StyleField};
pub use state::{DraftSnapshot, EditorState};
