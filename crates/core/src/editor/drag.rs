//! Pointer-drag reordering of the top-level block list.
//!
//! Drag state lives here, never in the document: the only effect on
//! [`EditorState`] is a single `reorder` when a drag is dropped over a
//! different block.

use serde::{Deserialize, Serialize};

use crate::block::BlockId;

use super::state::EditorState;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Bounding box of a rendered block, in the same space as the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn center(&self) -> Point {
        Point {
            x: self.x + self.width / 2.0,
            y: self.y + self.height / 2.0,
        }
    }
}

/// The target whose center is nearest the pointer. Ties go to the earlier
/// target.
pub fn closest_center<'a>(pointer: Point, targets: &'a [(BlockId, Rect)]) -> Option<&'a BlockId> {
    targets
        .iter()
        .map(|(id, rect)| {
            let c = rect.center();
            let dx = c.x - pointer.x;
            let dy = c.y - pointer.y;
            (id, dx * dx + dy * dy)
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id)
}

/// The reorder a drop resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropOutcome {
    pub from: usize,
    pub to: usize,
}

#[derive(Debug, Default)]
pub struct DragController {
    active: Option<BlockId>,
    over: Option<BlockId>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, id: BlockId) {
        tracing::debug!(block_id = %id, "Drag started");
        self.active = Some(id);
        self.over = None;
    }

    pub fn active(&self) -> Option<&BlockId> {
        self.active.as_ref()
    }

    pub fn over(&self) -> Option<&BlockId> {
        self.over.as_ref()
    }

    pub fn is_dragging(&self, id: &BlockId) -> bool {
        self.active.as_ref() == Some(id)
    }

    /// Track the pointer. `targets` are the currently rendered blocks; an
    /// empty slice means the pointer left the list.
    pub fn move_to(&mut self, pointer: Point, targets: &[(BlockId, Rect)]) -> Option<&BlockId> {
        if self.active.is_none() {
            return None;
        }
        self.over = closest_center(pointer, targets).cloned();
        self.over.as_ref()
    }

    /// Pointer released outside any target.
    pub fn leave(&mut self) {
        self.over = None;
    }

    pub fn cancel(&mut self) {
        self.active = None;
        self.over = None;
    }

    /// Finish the drag, committing a reorder if it was dropped over a
    /// different block still present in the document.
    pub fn end(&mut self, editor: &mut EditorState) -> Option<DropOutcome> {
        let active = self.active.take();
        let over = self.over.take();
        let (active, over) = (active?, over?);
        if active == over {
            return None;
        }
        let from = editor.position(&active)?;
        let to = editor.position(&over)?;
        if !editor.reorder(from, to) {
            return None;
        }
        tracing::debug!(block_id = %active, from, to, "Drag dropped");
        Some(DropOutcome { from, to })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockKind;
    use uuid::Uuid;

    fn stacked(ids: &[BlockId], heights: &[f64]) -> Vec<(BlockId, Rect)> {
        let mut y = 0.0;
        ids.iter()
            .zip(heights)
            .map(|(id, h)| {
                let rect = Rect {
                    x: 0.0,
                    y,
                    width: 600.0,
                    height: *h,
                };
                y += h;
                (id.clone(), rect)
            })
            .collect()
    }

    fn editor(n: usize) -> (EditorState, Vec<BlockId>) {
        let mut editor = EditorState::new(Uuid::new_v4());
        let ids = (0..n).map(|_| editor.insert(BlockKind::Paragraph)).collect();
        (editor, ids)
    }

    #[test]
    fn closest_center_prefers_small_block_center_over_containment() {
        let ids = [BlockId::new("big"), BlockId::new("small")];
        let targets = stacked(&ids, &[400.0, 20.0]);
        // Inside the big block's box, but nearer the small block's center.
        let pointer = Point { x: 300.0, y: 390.0 };
        assert_eq!(closest_center(pointer, &targets), Some(&ids[1]));
    }

    #[test]
    fn closest_center_of_nothing_is_none() {
        assert_eq!(closest_center(Point::default(), &[]), None);
    }

    #[test]
    fn drop_over_other_block_reorders() {
        let (mut editor, ids) = editor(3);
        let targets = stacked(&ids, &[100.0, 100.0, 100.0]);
        let mut drag = DragController::new();
        drag.start(ids[0].clone());
        assert!(drag.is_dragging(&ids[0]));
        drag.move_to(Point { x: 10.0, y: 260.0 }, &targets);
        assert_eq!(drag.over(), Some(&ids[2]));
        let outcome = drag.end(&mut editor);
        assert_eq!(outcome, Some(DropOutcome { from: 0, to: 2 }));
        assert_eq!(editor.blocks()[2].id, ids[0]);
        assert!(drag.active().is_none());
    }

    #[test]
    fn no_mutation_before_drop() {
        let (mut editor, ids) = editor(2);
        editor.mark_saved(editor.revision());
        let targets = stacked(&ids, &[50.0, 50.0]);
        let mut drag = DragController::new();
        drag.start(ids[0].clone());
        drag.move_to(Point { x: 0.0, y: 80.0 }, &targets);
        assert_eq!(editor.blocks()[0].id, ids[0]);
        assert!(!editor.has_unsaved_changes());
        drag.cancel();
        assert_eq!(drag.end(&mut editor), None);
        assert!(!editor.has_unsaved_changes());
    }

    #[test]
    fn drop_on_self_or_outside_is_noop() {
        let (mut editor, ids) = editor(2);
        let targets = stacked(&ids, &[50.0, 50.0]);
        let mut drag = DragController::new();

        drag.start(ids[0].clone());
        drag.move_to(Point { x: 0.0, y: 10.0 }, &targets);
        assert_eq!(drag.end(&mut editor), None);

        drag.start(ids[0].clone());
        drag.move_to(Point { x: 0.0, y: 80.0 }, &targets);
        drag.leave();
        assert_eq!(drag.end(&mut editor), None);
        assert_eq!(editor.blocks()[0].id, ids[0]);
    }

    #[test]
    fn drop_over_block_deleted_mid_drag_is_noop() {
        let (mut editor, ids) = editor(3);
        let targets = stacked(&ids, &[50.0, 50.0, 50.0]);
        let mut drag = DragController::new();
        drag.start(ids[0].clone());
        drag.move_to(Point { x: 0.0, y: 125.0 }, &targets);
        editor.delete(&ids[2]);
        assert_eq!(drag.end(&mut editor), None);
    }

    #[test]
    fn moving_without_active_drag_tracks_nothing() {
        let ids = [BlockId::new("a")];
        let targets = stacked(&ids, &[10.0]);
        let mut drag = DragController::new();
        assert_eq!(drag.move_to(Point::default(), &targets), None);
    }
}
