//! Mesh synthesis: the collaborator seam and a built-in block synthesizer.
//!
//! The export context guarantees [`MeshSynthesizer::block_mesh`] is invoked at
//! most once per distinct model key per session, so synthesis cost scales with
//! distinct shapes, not with voxel or frame count.

use std::collections::HashSet;

use rand::RngCore;

use crate::capture::ModelKey;
use crate::mesh::{
    Mesh, MeshInfo, Vertex, TINTED_MAT, TRANSPARENT_MAT, TRANSPARENT_TINTED_MAT, WORLD_MAT,
};
use crate::types::{BlockPosition, Direction};

/// Surface height of a fluid source block, as a fraction of a full block.
const FLUID_HEIGHT: f32 = 8.0 / 9.0;

/// A connected group of same-kind fluid cells captured in one frame.
///
/// One mesh is synthesized per domain; vertices are relative to
/// [`FluidDomain::origin`], the cell the frame anchors the mesh to.
#[derive(Debug, Clone, PartialEq)]
pub struct FluidDomain {
    /// Fluid kind, e.g., "water" or "lava".
    pub kind: String,
    /// Member cells in world coordinates. Never empty.
    pub cells: Vec<BlockPosition>,
}

impl FluidDomain {
    /// The anchor cell: the componentwise minimum corner of the domain.
    pub fn origin(&self) -> BlockPosition {
        let mut origin = self.cells[0];
        for cell in &self.cells[1..] {
            origin.x = origin.x.min(cell.x);
            origin.y = origin.y.min(cell.y);
            origin.z = origin.z.min(cell.z);
        }
        origin
    }
}

/// Converts structural keys into renderable geometry.
///
/// Implementors may be nondeterministic in mesh content (the randomness
/// source exists for that), but the engine's dedup guarantees still hold:
/// ids and entry names never depend on what this trait returns.
pub trait MeshSynthesizer {
    /// Synthesize geometry for a block model. Called at most once per
    /// distinct key per session.
    fn block_mesh(&self, key: &ModelKey, rng: &mut dyn RngCore) -> MeshInfo;

    /// Synthesize the surface mesh for one fluid domain.
    fn fluid_mesh(&self, domain: &FluidDomain) -> Mesh;
}

/// The built-in synthesizer: one unit-cube face per visible-face bit.
///
/// Tinted blocks (grass, foliage) get a second vertex-colored overlay layer,
/// the way world geometry stacks a tint pass over the base texture. The
/// randomness source rotates top-face UVs so repeated full cubes don't tile
/// visibly.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlockMeshSynthesizer;

impl MeshSynthesizer for BlockMeshSynthesizer {
    fn block_mesh(&self, key: &ModelKey, rng: &mut dyn RngCore) -> MeshInfo {
        if key.visible_faces == 0 {
            return MeshInfo::empty();
        }

        let mut mesh = Mesh::new();
        let tinted = is_tinted(&key.name);
        let base_mat = if key.transparent { TRANSPARENT_MAT } else { WORLD_MAT };
        let overlay_mat = if key.transparent {
            TRANSPARENT_TINTED_MAT
        } else {
            TINTED_MAT
        };

        let top_rotation = (rng.next_u32() % 4) as usize;

        for direction in Direction::ALL {
            if key.visible_faces & direction.bit() == 0 {
                continue;
            }
            let rotation = if direction == Direction::Up { top_rotation } else { 0 };
            add_face(&mut mesh, base_mat, direction, rotation);
            if tinted {
                add_face(&mut mesh, overlay_mat, direction, rotation);
            }
        }

        let num_layers = if tinted { 2 } else { 1 };
        MeshInfo { mesh, num_layers }
    }

    fn fluid_mesh(&self, domain: &FluidDomain) -> Mesh {
        let mut mesh = Mesh::new();
        let origin = domain.origin();
        let cells: HashSet<BlockPosition> = domain.cells.iter().copied().collect();
        // Lava is opaque; everything else renders like water.
        let material = if domain.kind == "lava" { WORLD_MAT } else { TRANSPARENT_MAT };

        for cell in &domain.cells {
            let above = cell.neighbor(Direction::Up);
            if cells.contains(&above) {
                continue; // submerged cell, no surface here
            }

            let x = (cell.x - origin.x) as f32;
            let y = (cell.y - origin.y) as f32 + FLUID_HEIGHT;
            let z = (cell.z - origin.z) as f32;
            let normal = Direction::Up.normal();

            let i0 = mesh.add_vertex(Vertex::new([x, y, z], normal, [0.0, 0.0]));
            let i1 = mesh.add_vertex(Vertex::new([x + 1.0, y, z], normal, [1.0, 0.0]));
            let i2 = mesh.add_vertex(Vertex::new([x + 1.0, y, z + 1.0], normal, [1.0, 1.0]));
            let i3 = mesh.add_vertex(Vertex::new([x, y, z + 1.0], normal, [0.0, 1.0]));
            mesh.group(material).add_quad(i0, i1, i2, i3);
        }

        mesh
    }
}

/// Corner positions of a unit-cube face, in ring order around the quad.
fn face_corners(direction: Direction) -> [[f32; 3]; 4] {
    match direction {
        Direction::Down => [
            [0.0, 0.0, 1.0],
            [1.0, 0.0, 1.0],
            [1.0, 0.0, 0.0],
            [0.0, 0.0, 0.0],
        ],
        Direction::Up => [
            [0.0, 1.0, 0.0],
            [1.0, 1.0, 0.0],
            [1.0, 1.0, 1.0],
            [0.0, 1.0, 1.0],
        ],
        Direction::North => [
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
        ],
        Direction::South => [
            [0.0, 1.0, 1.0],
            [1.0, 1.0, 1.0],
            [1.0, 0.0, 1.0],
            [0.0, 0.0, 1.0],
        ],
        Direction::West => [
            [0.0, 1.0, 0.0],
            [0.0, 1.0, 1.0],
            [0.0, 0.0, 1.0],
            [0.0, 0.0, 0.0],
        ],
        Direction::East => [
            [1.0, 1.0, 1.0],
            [1.0, 1.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 0.0, 1.0],
        ],
    }
}

fn add_face(mesh: &mut Mesh, material: &str, direction: Direction, rotation: usize) {
    const UVS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

    let corners = face_corners(direction);
    let normal = direction.normal();
    let mut indices = [0u32; 4];
    for (i, corner) in corners.iter().enumerate() {
        let uv = UVS[(i + rotation) % 4];
        indices[i] = mesh.add_vertex(Vertex::new(*corner, normal, uv));
    }
    mesh.group(material)
        .add_quad(indices[0], indices[1], indices[2], indices[3]);
}

/// Whether a block's base color comes from vertex tinting (grass, foliage).
fn is_tinted(name: &str) -> bool {
    let id = name.split(':').nth(1).unwrap_or(name);
    id == "grass_block"
        || id == "vine"
        || id == "fern"
        || id == "large_fern"
        || id == "short_grass"
        || id == "tall_grass"
        || id == "sugar_cane"
        || id == "lily_pad"
        || id.ends_with("_leaves")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BlockState;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn synthesize(name: &str, faces: u8, transparent: bool) -> MeshInfo {
        let key = ModelKey::new(&BlockState::new(name), faces, transparent);
        let mut rng = StdRng::seed_from_u64(7);
        BlockMeshSynthesizer.block_mesh(&key, &mut rng)
    }

    #[test]
    fn test_full_cube() {
        let info = synthesize("minecraft:stone", 0x3f, false);

        assert_eq!(info.num_layers, 1);
        assert_eq!(info.mesh.groups.len(), 1);
        assert_eq!(info.mesh.groups[0].material, WORLD_MAT);
        assert_eq!(info.mesh.triangle_count(), 12); // 6 faces x 2 triangles
    }

    #[test]
    fn test_culled_faces_are_skipped() {
        let visible = Direction::Up.bit() | Direction::North.bit();
        let info = synthesize("minecraft:stone", visible, false);
        assert_eq!(info.mesh.triangle_count(), 4);
    }

    #[test]
    fn test_enclosed_block_is_empty() {
        let info = synthesize("minecraft:stone", 0, false);
        assert!(info.mesh.is_empty());
        assert_eq!(info.num_layers, 0);
    }

    #[test]
    fn test_transparent_material() {
        let info = synthesize("minecraft:glass", 0x3f, true);
        assert_eq!(info.mesh.groups[0].material, TRANSPARENT_MAT);
    }

    #[test]
    fn test_tinted_overlay_layer() {
        let info = synthesize("minecraft:grass_block", 0x3f, false);

        assert_eq!(info.num_layers, 2);
        let materials: Vec<&str> = info
            .mesh
            .groups
            .iter()
            .map(|g| g.material.as_str())
            .collect();
        assert!(materials.contains(&WORLD_MAT));
        assert!(materials.contains(&TINTED_MAT));
    }

    #[test]
    fn test_same_seed_same_mesh() {
        let key = ModelKey::new(&BlockState::new("minecraft:stone"), 0x3f, false);
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);

        let mesh_a = BlockMeshSynthesizer.block_mesh(&key, &mut a).mesh;
        let mesh_b = BlockMeshSynthesizer.block_mesh(&key, &mut b).mesh;
        assert_eq!(mesh_a, mesh_b);
    }

    #[test]
    fn test_fluid_surface_only_on_exposed_cells() {
        let domain = FluidDomain {
            kind: "water".to_string(),
            cells: vec![
                BlockPosition::new(4, 1, 4),
                BlockPosition::new(4, 2, 4), // stacked above the first
                BlockPosition::new(5, 2, 4),
            ],
        };

        let mesh = BlockMeshSynthesizer.fluid_mesh(&domain);

        // two exposed cells, one quad each
        assert_eq!(mesh.triangle_count(), 4);
        assert_eq!(mesh.groups.len(), 1);
        assert_eq!(mesh.groups[0].material, TRANSPARENT_MAT);

        // vertices are relative to the domain origin (4, 1, 4)
        let max_x = mesh
            .vertices
            .iter()
            .map(|v| v.position[0])
            .fold(f32::MIN, f32::max);
        assert_eq!(max_x, 2.0);
    }

    #[test]
    fn test_lava_is_opaque() {
        let domain = FluidDomain {
            kind: "lava".to_string(),
            cells: vec![BlockPosition::new(0, 0, 0)],
        };
        let mesh = BlockMeshSynthesizer.fluid_mesh(&domain);
        assert_eq!(mesh.groups[0].material, WORLD_MAT);
    }
}
