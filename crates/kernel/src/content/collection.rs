//! Block collection editor.
//!
//! Ordered-sequence mutations over a document's blocks. Sequence position is
//! the only ordering; there is no separate weight field. Every operation is
//! total: a missing id or an out-of-range move is a no-op, reported through
//! the returned `bool`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::block::{BlockContent, BlockId, BlockType, ContentBlock, UnknownContent};
use super::registry;

/// Direction for [`BlockCollection::move_block`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
}

/// Ordered blocks of one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockCollection {
    blocks: Vec<ContentBlock>,
}

impl BlockCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing sequence as loaded from storage.
    pub fn from_blocks(blocks: Vec<ContentBlock>) -> Self {
        Self { blocks }
    }

    pub fn as_slice(&self) -> &[ContentBlock] {
        &self.blocks
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ContentBlock> {
        self.blocks.iter()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn into_inner(self) -> Vec<ContentBlock> {
        self.blocks
    }

    /// Block ids in display order.
    pub fn ids(&self) -> Vec<BlockId> {
        self.blocks.iter().map(|b| b.id.clone()).collect()
    }

    pub fn get(&self, id: &str) -> Option<&ContentBlock> {
        self.blocks.iter().find(|b| b.id.as_str() == id)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.blocks.iter().position(|b| b.id.as_str() == id)
    }

    /// Append a block of `block_type` with its default content.
    ///
    /// Returns the id of the new block.
    pub fn add_block(&mut self, block_type: BlockType) -> BlockId {
        let mut id = BlockId::generate();
        while self.get(id.as_str()).is_some() {
            id = BlockId::generate();
        }
        self.blocks.push(ContentBlock {
            id: id.clone(),
            content: registry::default_content(block_type),
        });
        debug!(block_id = %id, block_type = %block_type, "block added");
        id
    }

    /// Shallow-merge `patch` over the content of block `id`.
    ///
    /// Fields absent from the patch keep their values. A patch that would
    /// leave the content in a shape its type cannot hold is rejected.
    pub fn update_block_content(&mut self, id: &str, patch: &Map<String, Value>) -> bool {
        let Some(block) = self.blocks.iter_mut().find(|b| b.id.as_str() == id) else {
            return false;
        };

        let mut merged = match block.content.to_value() {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        for (key, value) in patch {
            merged.insert(key.clone(), value.clone());
        }

        let updated = match block.content.block_type() {
            Some(block_type) => match BlockContent::parse(block_type, Value::Object(merged)) {
                Ok(content) => content,
                Err(e) => {
                    warn!(block_id = %id, block_type = %block_type, error = %e, "rejected block content patch");
                    return false;
                }
            },
            None => BlockContent::Unknown(UnknownContent {
                type_name: block.content.type_name().to_string(),
                raw: Value::Object(merged),
            }),
        };

        block.content = updated;
        true
    }

    /// Swap block `id` with its neighbour in `direction`.
    pub fn move_block(&mut self, id: &str, direction: MoveDirection) -> bool {
        let Some(index) = self.position(id) else {
            return false;
        };
        let target = match direction {
            MoveDirection::Up => index.checked_sub(1),
            MoveDirection::Down => Some(index + 1).filter(|&i| i < self.blocks.len()),
        };
        let Some(target) = target else {
            return false;
        };
        self.blocks.swap(index, target);
        true
    }

    /// Remove block `id`, keeping the order of the rest.
    pub fn remove_block(&mut self, id: &str) -> bool {
        let before = self.blocks.len();
        self.blocks.retain(|b| b.id.as_str() != id);
        self.blocks.len() != before
    }

    /// Ids that occur more than once, each reported once.
    pub fn duplicate_ids(&self) -> Vec<BlockId> {
        let mut seen = HashSet::new();
        let mut duplicates = Vec::new();
        for block in &self.blocks {
            if !seen.insert(&block.id) && !duplicates.contains(&block.id) {
                duplicates.push(block.id.clone());
            }
        }
        duplicates
    }
}

impl<'a> IntoIterator for &'a BlockCollection {
    type Item = &'a ContentBlock;
    type IntoIter = std::slice::Iter<'a, ContentBlock>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}
