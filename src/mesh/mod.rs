//! Mesh geometry types and the synthesis seam.
//!
//! Archive meshes carry per-material face groups: a group's material name
//! selects one of the canonical world materials, and stacked groups on the
//! same block are the "layers" counted in the archive metadata.

pub mod obj;
pub mod synth;

pub use synth::{BlockMeshSynthesizer, FluidDomain, MeshSynthesizer};

/// Material id for opaque world geometry.
pub const WORLD_MAT: &str = "world";
/// Material id for transparent world geometry.
pub const TRANSPARENT_MAT: &str = "world_transparent";
/// Material id for opaque vertex-tinted geometry.
pub const TINTED_MAT: &str = "world_tinted";
/// Material id for transparent vertex-tinted geometry.
pub const TRANSPARENT_TINTED_MAT: &str = "world_trans_tinted";

/// Mesh id of the reserved empty mesh entry. Fluid capture assumes this
/// entry exists, so the exporter writes it unconditionally.
pub const EMPTY_MESH: &str = "empty";

/// A vertex in an output mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    /// Position in 3D space.
    pub position: [f32; 3],
    /// Normal vector.
    pub normal: [f32; 3],
    /// Texture coordinates.
    pub uv: [f32; 2],
    /// Vertex color (RGBA).
    pub color: [f32; 4],
}

impl Vertex {
    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
            color: [1.0, 1.0, 1.0, 1.0], // White by default
        }
    }

    pub fn with_color(mut self, color: [f32; 4]) -> Self {
        self.color = color;
        self
    }
}

/// Faces sharing one material.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialGroup {
    /// Material id (one of the canonical material constants).
    pub material: String,
    /// Triangle indices (3 per triangle) into the mesh's vertex pool.
    pub indices: Vec<u32>,
}

impl MaterialGroup {
    pub fn new(material: impl Into<String>) -> Self {
        Self {
            material: material.into(),
            indices: Vec::new(),
        }
    }

    /// Add a triangle by vertex indices.
    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.push(i0);
        self.indices.push(i1);
        self.indices.push(i2);
    }

    /// Add a quad (two triangles) by vertex indices.
    /// Vertices are provided in order around the quad; triangles are wound
    /// CCW for front-facing.
    pub fn add_quad(&mut self, i0: u32, i1: u32, i2: u32, i3: u32) {
        self.add_triangle(i0, i2, i1);
        self.add_triangle(i0, i3, i2);
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// A triangle mesh with a shared vertex pool and per-material face groups.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex data.
    pub vertices: Vec<Vertex>,
    /// Face groups in emission order.
    pub groups: Vec<MaterialGroup>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a vertex and return its index.
    pub fn add_vertex(&mut self, vertex: Vertex) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(vertex);
        index
    }

    /// Get the face group for a material, creating it if absent.
    pub fn group(&mut self, material: &str) -> &mut MaterialGroup {
        if let Some(i) = self.groups.iter().position(|g| g.material == material) {
            &mut self.groups[i]
        } else {
            self.groups.push(MaterialGroup::new(material));
            self.groups.last_mut().unwrap()
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.groups.iter().map(|g| g.triangle_count()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.iter().all(|g| g.indices.is_empty())
    }
}

/// Output of converting a model key into renderable geometry.
#[derive(Debug, Clone)]
pub struct MeshInfo {
    /// The synthesized mesh.
    pub mesh: Mesh,
    /// Number of stacked material layers this mesh requires.
    pub num_layers: u32,
}

impl MeshInfo {
    /// The reserved empty mesh: no geometry, no layers.
    pub fn empty() -> Self {
        Self {
            mesh: Mesh::new(),
            num_layers: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mesh_creation() {
        let mut mesh = Mesh::new();
        assert!(mesh.is_empty());

        let v0 = mesh.add_vertex(Vertex::new([0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0]));
        let v1 = mesh.add_vertex(Vertex::new([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 0.0]));
        let v2 = mesh.add_vertex(Vertex::new([1.0, 0.0, 1.0], [0.0, 1.0, 0.0], [1.0, 1.0]));
        mesh.group(WORLD_MAT).add_triangle(v0, v1, v2);

        assert_eq!(mesh.vertex_count(), 3);
        assert_eq!(mesh.triangle_count(), 1);
        assert!(!mesh.is_empty());
    }

    #[test]
    fn test_quad_winding() {
        let mut mesh = Mesh::new();
        for i in 0..4 {
            mesh.add_vertex(Vertex::new(
                [i as f32, 0.0, 0.0],
                [0.0, 1.0, 0.0],
                [0.0, 0.0],
            ));
        }
        mesh.group(WORLD_MAT).add_quad(0, 1, 2, 3);

        // CCW winding: (0,2,1) and (0,3,2)
        assert_eq!(mesh.groups[0].indices, vec![0, 2, 1, 0, 3, 2]);
    }

    #[test]
    fn test_group_reuse() {
        let mut mesh = Mesh::new();
        mesh.group(WORLD_MAT).add_triangle(0, 1, 2);
        mesh.group(TINTED_MAT).add_triangle(0, 1, 2);
        mesh.group(WORLD_MAT).add_triangle(2, 1, 0);

        assert_eq!(mesh.groups.len(), 2);
        assert_eq!(mesh.groups[0].triangle_count(), 2);
        assert_eq!(mesh.groups[1].triangle_count(), 1);
    }

    #[test]
    fn test_empty_mesh_info() {
        let info = MeshInfo::empty();
        assert!(info.mesh.is_empty());
        assert_eq!(info.num_layers, 0);
    }
}
