//! Export session configuration.

use std::time::Duration;

use crate::types::ChunkPos;

/// Configuration for one export session, passed to the exporter constructor.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Bounding box min, in chunk coordinates (inclusive).
    pub min_chunk: ChunkPos,
    /// Bounding box max, in chunk coordinates (inclusive).
    pub max_chunk: ChunkPos,
    /// Lowest captured block y (inclusive).
    pub min_y: i32,
    /// Highest captured block y (exclusive).
    pub max_y: i32,
    /// Upper bound on the wait for the texture atlas readback.
    pub atlas_timeout: Duration,
}

impl ExportConfig {
    /// Create a configuration for the given chunk bounds with default
    /// height range and atlas timeout.
    pub fn new(min_chunk: ChunkPos, max_chunk: ChunkPos) -> Self {
        Self {
            min_chunk,
            max_chunk,
            min_y: 0,
            max_y: 256,
            atlas_timeout: Duration::from_secs(5),
        }
    }

    /// Set the captured vertical range (`min` inclusive, `max` exclusive).
    pub fn with_height_range(mut self, min: i32, max: i32) -> Self {
        self.min_y = min;
        self.max_y = max;
        self
    }

    /// Set the atlas readback wait bound.
    pub fn with_atlas_timeout(mut self, timeout: Duration) -> Self {
        self.atlas_timeout = timeout;
        self
    }
}
