//! Shared types used throughout the library.

mod direction;

pub use direction::Direction;

use std::collections::HashMap;

/// A block position in 3D space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockPosition {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPosition {
    pub fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Get the neighboring position in the given direction.
    pub fn neighbor(&self, direction: Direction) -> Self {
        let (dx, dy, dz) = direction.offset();
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }
}

/// A chunk column coordinate (16x16 blocks on the horizontal plane).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkPos {
    pub x: i32,
    pub z: i32,
}

impl ChunkPos {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Block coordinate of this chunk's west/north corner.
    pub fn block_min(&self) -> (i32, i32) {
        (self.x * 16, self.z * 16)
    }
}

/// A captured block state: name plus property map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockState {
    /// Block name, e.g., "minecraft:stone"
    pub name: String,
    /// Block properties, e.g., {"facing": "north"}
    pub properties: HashMap<String, String>,
}

impl BlockState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: HashMap::new(),
        }
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Get the block ID without namespace (e.g., "stone").
    pub fn block_id(&self) -> &str {
        self.name.split(':').nth(1).unwrap_or(&self.name)
    }

    /// Check if this is an air block.
    pub fn is_air(&self) -> bool {
        matches!(
            self.name.as_str(),
            "minecraft:air" | "minecraft:cave_air" | "minecraft:void_air" | "air"
        )
    }
}

/// Trait for live scene state (the scene-reader collaborator).
///
/// Implementors adapt the running simulation. A capture reads many positions
/// in one pass; the implementor is responsible for providing a consistent
/// snapshot (e.g., by only being driven from the thread that owns world
/// state). The engine itself takes no lock.
pub trait WorldSource {
    /// Get the block at a position. `None` means unoccupied (air).
    fn block_at(&self, pos: BlockPosition) -> Option<BlockState>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbor_offsets() {
        let pos = BlockPosition::new(1, 2, 3);
        assert_eq!(pos.neighbor(Direction::Up), BlockPosition::new(1, 3, 3));
        assert_eq!(pos.neighbor(Direction::North), BlockPosition::new(1, 2, 2));
        assert_eq!(pos.neighbor(Direction::East), BlockPosition::new(2, 2, 3));
    }

    #[test]
    fn test_chunk_block_min() {
        assert_eq!(ChunkPos::new(0, 0).block_min(), (0, 0));
        assert_eq!(ChunkPos::new(2, -1).block_min(), (32, -16));
    }

    #[test]
    fn test_block_state_helpers() {
        let state = BlockState::new("minecraft:oak_log").with_property("axis", "y");
        assert_eq!(state.block_id(), "oak_log");
        assert!(!state.is_air());
        assert!(BlockState::new("minecraft:cave_air").is_air());
    }
}
