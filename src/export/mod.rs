//! Archive serialization.
//!
//! The exporter walks a finished capture session and writes the Vcap
//! container: frame document, deduplicated meshes, canonical materials,
//! texture atlas, and metadata, in that fixed order.

pub mod meta;
pub mod vcap;

pub use meta::VcapMeta;
pub use vcap::VcapExporter;
