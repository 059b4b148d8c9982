//! # Vcap Export
//!
//! A Rust library for capturing animated voxel scenes and exporting them as
//! self-contained Vcap archives.
//!
//! ## Overview
//!
//! A capture session repeatedly snapshots a bounded volume of a live voxel
//! world into frames, deduplicating generated geometry along the way, and
//! finally serializes everything (frames, meshes, materials, the shared
//! texture atlas, and metadata) into a single zip container that replay
//! tools can read without access to the original simulation.
//!
//! ## Quick Start
//!
//! ```ignore
//! use vcap_export::{
//!     BlockMeshSynthesizer, ChunkPos, ExportConfig, VcapExporter,
//! };
//!
//! // Configure the capture volume
//! let config = ExportConfig::new(ChunkPos::new(-2, -2), ChunkPos::new(2, 2));
//!
//! // Create an export session over the live world
//! let mut exporter = VcapExporter::new(world, config, BlockMeshSynthesizer, textures);
//!
//! // Capture frames while the scene animates
//! exporter.capture_intra_frame(0.0)?;
//! exporter.capture_intra_frame(0.05)?;
//!
//! // Serialize everything into a Vcap archive
//! let file = std::fs::File::create("scene.vcap")?;
//! exporter.finalize(file)?;
//! ```
//!
//! ## Integration
//!
//! The engine reads scene state through the [`WorldSource`] trait and
//! delegates geometry and texture production to the [`MeshSynthesizer`] and
//! [`texture::TextureProvider`] collaborators; implement those against your
//! engine to adapt it. Subsystems that capture their own geometry (entity
//! models, for instance) register it through
//! [`VcapExporter::context_mut`].

pub mod capture;
pub mod config;
pub mod error;
pub mod export;
pub mod material;
pub mod mesh;
pub mod texture;
pub mod tree;
pub mod types;

#[cfg(test)]
mod testutil;

// Re-export main types for convenience
pub use capture::{ExportContext, Frame, IntraFrame, ModelKey, PredictiveFrame};
pub use config::ExportConfig;
pub use error::{Result, VcapError};
pub use export::{VcapExporter, VcapMeta};
pub use material::{Field, Material};
pub use mesh::{BlockMeshSynthesizer, FluidDomain, Mesh, MeshInfo, MeshSynthesizer, Vertex};
pub use texture::{atlas_channel, AtlasRequest, PendingAtlas, TextureProvider};
pub use tree::{BinaryTreeWriter, Compound, TreeWriter, Value};
pub use types::{BlockPosition, BlockState, ChunkPos, Direction, WorldSource};
