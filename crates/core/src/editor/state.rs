//! In-session document model for one page.
//!
//! Operations are synchronous and infallible over well-formed data. Each
//! structural edit leaves top-level `order` dense (`0..n`), and every
//! mutation bumps the revision and raises the dirty flag.

use serde::Serialize;

use crate::block::{normalize_order, Block, BlockContent, BlockId, BlockIdGenerator, BlockKind};
use crate::error::CoreError;
use crate::page::Page;
use crate::types::PageId;

use super::command::{BlockUpdate, CommandResult, EditorCommand};

/// Blocks as of a given revision, handed to the persistence layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DraftSnapshot {
    pub page_id: PageId,
    pub blocks: Vec<Block>,
    pub revision: u64,
}

#[derive(Debug)]
pub struct EditorState {
    page_id: PageId,
    blocks: Vec<Block>,
    has_unsaved_changes: bool,
    selected: Option<BlockId>,
    revision: u64,
    saved_revision: u64,
    ids: BlockIdGenerator,
}

impl EditorState {
    pub fn new(page_id: PageId) -> Self {
        Self::from_blocks(page_id, Vec::new())
    }

    /// Start editing the draft of a stored page.
    pub fn load(page: &Page) -> Self {
        Self::from_blocks(page.id, page.blocks.clone())
    }

    pub fn from_blocks(page_id: PageId, mut blocks: Vec<Block>) -> Self {
        normalize_order(&mut blocks);
        Self {
            page_id,
            blocks,
            has_unsaved_changes: false,
            selected: None,
            revision: 0,
            saved_revision: 0,
            ids: BlockIdGenerator::new(),
        }
    }

    pub fn page_id(&self) -> PageId {
        self.page_id
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.has_unsaved_changes
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn selected(&self) -> Option<&BlockId> {
        self.selected.as_ref()
    }

    pub fn selected_block(&self) -> Option<&Block> {
        self.selected.as_ref().and_then(|id| self.find(id))
    }

    pub fn find(&self, id: &BlockId) -> Option<&Block> {
        self.blocks.iter().find(|block| &block.id == id)
    }

    pub fn position(&self, id: &BlockId) -> Option<usize> {
        self.blocks.iter().position(|block| &block.id == id)
    }

    fn touch(&mut self) {
        self.revision += 1;
        self.has_unsaved_changes = true;
    }

    fn renumber(&mut self) {
        for (index, block) in self.blocks.iter_mut().enumerate() {
            block.order = index;
        }
    }

    /// Append a block built from `kind`'s template.
    pub fn insert(&mut self, kind: BlockKind) -> BlockId {
        let id = self.ids.next(kind);
        let block = Block::new(id.clone(), self.blocks.len(), BlockContent::template(kind));
        self.blocks.push(block);
        self.touch();
        tracing::debug!(block_id = %id, kind = %kind, "Inserted block");
        id
    }

    /// Replace fields of the matching block. The content, if given, must be
    /// of the block's own kind.
    pub fn update(&mut self, id: &BlockId, update: BlockUpdate) -> bool {
        let Some(block) = self.blocks.iter_mut().find(|block| &block.id == id) else {
            return false;
        };
        if let Some(content) = update.content {
            if content.kind().is_none() || content.kind() != block.kind() {
                tracing::warn!(
                    block_id = %id,
                    current = block.content.type_name(),
                    attempted = content.type_name(),
                    "Rejected config of a different block kind"
                );
                return false;
            }
            block.content = content;
        }
        if let Some(styles) = update.styles {
            block.styles = if styles.is_empty() { None } else { Some(styles) };
        }
        if let Some(visibility) = update.visibility {
            block.visibility = visibility;
        }
        self.touch();
        true
    }

    /// Remove the matching block and close its panel if it was selected.
    pub fn delete(&mut self, id: &BlockId) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        self.blocks.remove(index);
        self.renumber();
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        self.touch();
        tracing::debug!(block_id = %id, "Deleted block");
        true
    }

    /// Append a copy of the matching block. The copy and every block nested
    /// inside it get fresh ids.
    pub fn duplicate(&mut self, id: &BlockId) -> Option<BlockId> {
        let mut copy = self.find(id)?.clone();
        reassign_ids(&mut self.ids, &mut copy);
        copy.order = self.blocks.len();
        let new_id = copy.id.clone();
        self.blocks.push(copy);
        self.touch();
        Some(new_id)
    }

    /// Move the block at `from` to `to` (list splice, not swap).
    pub fn reorder(&mut self, from: usize, to: usize) -> bool {
        if from == to || from >= self.blocks.len() || to >= self.blocks.len() {
            return false;
        }
        let block = self.blocks.remove(from);
        self.blocks.insert(to, block);
        self.renumber();
        self.touch();
        tracing::debug!(from, to, "Reordered blocks");
        true
    }

    pub fn toggle_visibility(&mut self, id: &BlockId) -> bool {
        let Some(block) = self.blocks.iter_mut().find(|block| &block.id == id) else {
            return false;
        };
        block.visibility = block.visibility.toggled();
        self.touch();
        true
    }

    /// Open the configuration panel for a block. Selection is not an edit.
    pub fn select(&mut self, id: &BlockId) -> bool {
        if self.find(id).is_none() {
            return false;
        }
        self.selected = Some(id.clone());
        true
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    /// Apply one command. Only patch resolution can fail.
    pub fn apply(&mut self, command: EditorCommand) -> Result<CommandResult, CoreError> {
        let op = command.op_name();
        let result = |changed: bool, created: Option<BlockId>| CommandResult {
            op,
            changed,
            created,
        };
        Ok(match command {
            EditorCommand::Insert { kind } => {
                let id = self.insert(kind);
                result(true, Some(id))
            }
            EditorCommand::Update { id, patch } => {
                let Some(block) = self.find(&id) else {
                    return Err(CoreError::NotFound {
                        entity: "block",
                        id: id.to_string(),
                    });
                };
                let update = patch.resolve(block)?;
                result(self.update(&id, update), None)
            }
            EditorCommand::Delete { id } => result(self.delete(&id), None),
            EditorCommand::Duplicate { id } => {
                let created = self.duplicate(&id);
                result(created.is_some(), created)
            }
            EditorCommand::Reorder { from, to } => result(self.reorder(from, to), None),
            EditorCommand::ToggleVisibility { id } => result(self.toggle_visibility(&id), None),
            EditorCommand::Select { id } => result(self.select(&id), None),
            EditorCommand::Deselect => {
                self.deselect();
                result(true, None)
            }
        })
    }

    /// Apply commands in order, stopping at the first failure. Commands
    /// before the failing one stay applied.
    pub fn apply_all(
        &mut self,
        commands: impl IntoIterator<Item = EditorCommand>,
    ) -> Result<Vec<CommandResult>, CoreError> {
        commands.into_iter().map(|cmd| self.apply(cmd)).collect()
    }

    pub fn snapshot(&self) -> DraftSnapshot {
        DraftSnapshot {
            page_id: self.page_id,
            blocks: self.blocks.clone(),
            revision: self.revision,
        }
    }

    /// Record a successful write of `revision`. The dirty flag clears only if
    /// nothing was edited after that snapshot was taken.
    pub fn mark_saved(&mut self, revision: u64) -> bool {
        if revision > self.saved_revision {
            self.saved_revision = revision;
        }
        if revision == self.revision {
            self.has_unsaved_changes = false;
        }
        !self.has_unsaved_changes
    }
}

fn reassign_ids(ids: &mut BlockIdGenerator, block: &mut Block) {
    block.id = match block.kind() {
        Some(kind) => ids.next(kind),
        None => ids.next_named(&format!("{}_copy", block.content.type_name())),
    };
    for nested in block.content.children_mut() {
        for child in nested.iter_mut() {
            reassign_ids(ids, child);
        }
    }
}
