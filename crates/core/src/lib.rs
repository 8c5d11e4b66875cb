//! Block model, editor state and draft/publish persistence for the page builder.
//!
//! A page is an ordered sequence of [`block::Block`] values. Editing happens
//! against an in-memory [`editor::EditorState`]; the
//! [`persist::PersistenceCoordinator`] is the only component that writes the
//! draft (`blocks`) or the live snapshot (`published_blocks`) to storage.

pub mod block;
pub mod editor;
pub mod error;
pub mod events;
pub mod page;
pub mod persist;
pub mod render;
pub mod types;
