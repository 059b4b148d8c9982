//! Shared test fixtures.

use std::collections::HashMap;

use crate::types::{BlockPosition, BlockState, WorldSource};

/// A map-backed world for tests.
pub(crate) struct MapWorld {
    blocks: HashMap<BlockPosition, BlockState>,
}

impl MapWorld {
    pub(crate) fn new() -> Self {
        Self {
            blocks: HashMap::new(),
        }
    }

    pub(crate) fn set(&mut self, x: i32, y: i32, z: i32, state: BlockState) {
        self.blocks.insert(BlockPosition::new(x, y, z), state);
    }
}

impl WorldSource for MapWorld {
    fn block_at(&self, pos: BlockPosition) -> Option<BlockState> {
        self.blocks.get(&pos).cloned()
    }
}
