//! Editor command definitions.
//!
//! Every document-model operation has a serializable command so a client can
//! send a batch and have it replayed in dispatch order.
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::block::{Block, BlockContent, BlockId, BlockKind, BlockStyles, Visibility};
use crate::error::CoreError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum EditorCommand {
    Insert {
        #[serde(rename = "type")]
        kind: BlockKind,
    },
    Update {
        id: BlockId,
        patch: BlockPatch,
    },
    Delete {
        id: BlockId,
    },
    Duplicate {
        id: BlockId,
    },
    Reorder {
        from: usize,
        to: usize,
    },
    ToggleVisibility {
        id: BlockId,
    },
    Select {
        id: BlockId,
    },
    Deselect,
}

/// Partial update as sent by a client. `config` keys are shallow-merged over
/// the current payload, `styles` fields over the current overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub styles: Option<BlockStyles>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
}

/// A fully-resolved replacement for some of a block's fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlockUpdate {
    pub content: Option<BlockContent>,
    pub styles: Option<BlockStyles>,
    pub visibility: Option<Visibility>,
}

impl BlockPatch {
    pub fn config(fields: Map<String, Value>) -> Self {
        Self {
            config: Some(fields),
            ..Default::default()
        }
    }

    /// Resolve against the block being edited. Fails if the merged config no
    /// longer fits the block's kind.
    pub fn resolve(&self, current: &Block) -> Result<BlockUpdate, CoreError> {
        let content = match &self.config {
            None => None,
            Some(fields) => {
                let kind = current.kind().ok_or_else(|| {
                    CoreError::Validation(format!(
                        "block '{}' has unrecognized type '{}' and cannot be edited",
                        current.id,
                        current.content.type_name()
                    ))
                })?;
                let mut merged = match current.content.config_value() {
                    Ok(Value::Object(map)) => map,
                    Ok(_) => Map::new(),
                    Err(err) => return Err(CoreError::Validation(err.to_string())),
                };
                for (key, value) in fields {
                    merged.insert(key.clone(), value.clone());
                }
                let content = BlockContent::decode(kind, Value::Object(merged)).map_err(|err| {
                    CoreError::Validation(format!("invalid {kind} config: {err}"))
                })?;
                Some(content)
            }
        };
        let styles = self.styles.as_ref().map(|patch| {
            let mut styles = current.styles.clone().unwrap_or_default();
            styles.merge(patch);
            styles
        });
        Ok(BlockUpdate {
            content,
            styles,
            visibility: self.visibility,
        })
    }
}

/// What applying one command produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResult {
    pub op: &'static str,
    pub changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<BlockId>,
}

impl EditorCommand {
    pub fn op_name(&self) -> &'static str {
        match self {
            EditorCommand::Insert { .. } => "insert",
            EditorCommand::Update { .. } => "update",
            EditorCommand::Delete { .. } => "delete",
            EditorCommand::Duplicate { .. } => "duplicate",
            EditorCommand::Reorder { .. } => "reorder",
            EditorCommand::ToggleVisibility { .. } => "toggleVisibility",
            EditorCommand::Select { .. } => "select",
            EditorCommand::Deselect => "deselect",
        }
    }
}
