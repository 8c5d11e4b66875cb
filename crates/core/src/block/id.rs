//! Block identifier utilities.
//!
//! Block IDs are generated client-side and follow the convention
//! `{type}_{millis}`, e.g. `hero_1718000000000`. IDs loaded from storage are
//! treated as opaque strings; the convention only matters for new blocks.
use std::fmt;

use serde::{Deserialize, Serialize};

use super::kind::BlockKind;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    pub fn new(id: impl Into<String>) -> Self {
        BlockId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The kind prefix of a generated id, if it follows the convention.
    pub fn kind_hint(&self) -> Option<BlockKind> {
        let (prefix, millis) = self.0.rsplit_once('_')?;
        if millis.is_empty() || !millis.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        prefix.parse().ok()
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(s: &str) -> Self {
        BlockId(s.to_string())
    }
}

impl From<String> for BlockId {
    fn from(s: String) -> Self {
        BlockId(s)
    }
}

/// Produces process-unique block ids.
///
/// The millisecond component never repeats for one generator: a second
/// request within the same millisecond is bumped to the next one.
#[derive(Debug, Default)]
pub struct BlockIdGenerator {
    last_millis: i64,
}

impl BlockIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self, kind: BlockKind) -> BlockId {
        self.next_at(kind, chrono::Utc::now().timestamp_millis())
    }

    pub fn next_at(&mut self, kind: BlockKind, now_millis: i64) -> BlockId {
        self.next_named_at(kind.as_str(), now_millis)
    }

    /// Id with an arbitrary prefix, for blocks whose type is not a known kind.
    /// Shares the millisecond sequence with [`Self::next`].
    pub fn next_named(&mut self, prefix: &str) -> BlockId {
        self.next_named_at(prefix, chrono::Utc::now().timestamp_millis())
    }

    pub fn next_named_at(&mut self, prefix: &str, now_millis: i64) -> BlockId {
        let millis = now_millis.max(self.last_millis + 1);
        self.last_millis = millis;
        BlockId(format!("{prefix}_{millis}"))
    }
}
