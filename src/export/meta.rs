//! Archive metadata.

use serde::{Deserialize, Serialize};

/// Summary record written as the archive's final entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VcapMeta {
    /// Maximum number of material layers any single mesh in the archive
    /// requires. Known only after all meshes are synthesized.
    pub num_layers: u32,
}
