//! Wavefront OBJ serialization for archive mesh entries.
//!
//! OBJ is a simple, widely-supported text-based 3D format. Each archive mesh
//! becomes one `mesh/<id>.obj` entry; material layers map to `usemtl` groups
//! naming the canonical materials, which a reader resolves against the
//! `mat/` entries.

use crate::mesh::Mesh;
use std::fmt::Write;

/// Serialize a mesh to OBJ text. Vertex colors ride along on the `v` lines,
/// which downstream importers accept as an extension.
pub fn write_obj(mesh: &Mesh, name: &str) -> String {
    let verts = mesh.vertex_count();
    let tris = mesh.triangle_count();

    // Pre-size: ~60 bytes per vertex line (v/vt/vn) x 3 + ~40 per face
    let mut obj = String::with_capacity(128 + verts * 180 + tris * 40);

    writeln!(obj, "o {}", name).unwrap();
    writeln!(obj).unwrap();

    for vertex in &mesh.vertices {
        writeln!(
            obj,
            "v {} {} {} {} {} {}",
            vertex.position[0],
            vertex.position[1],
            vertex.position[2],
            vertex.color[0],
            vertex.color[1],
            vertex.color[2]
        )
        .unwrap();
    }
    writeln!(obj).unwrap();

    for vertex in &mesh.vertices {
        writeln!(obj, "vt {} {}", vertex.uv[0], vertex.uv[1]).unwrap();
    }
    writeln!(obj).unwrap();

    for vertex in &mesh.vertices {
        writeln!(
            obj,
            "vn {} {} {}",
            vertex.normal[0], vertex.normal[1], vertex.normal[2]
        )
        .unwrap();
    }
    writeln!(obj).unwrap();

    for group in &mesh.groups {
        if group.indices.is_empty() {
            continue;
        }
        writeln!(obj, "usemtl {}", group.material).unwrap();
        for i in (0..group.indices.len()).step_by(3) {
            let i0 = group.indices[i] as usize + 1;
            let i1 = group.indices[i + 1] as usize + 1;
            let i2 = group.indices[i + 2] as usize + 1;
            writeln!(
                obj,
                "f {}/{}/{} {}/{}/{} {}/{}/{}",
                i0, i0, i0, i1, i1, i1, i2, i2, i2
            )
            .unwrap();
        }
    }

    obj
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::{Vertex, WORLD_MAT};

    #[test]
    fn test_write_simple_obj() {
        let mut mesh = Mesh::new();
        let v0 = mesh.add_vertex(Vertex::new([0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0]));
        let v1 = mesh.add_vertex(Vertex::new([1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 0.0]));
        let v2 = mesh.add_vertex(Vertex::new([0.0, 0.0, 1.0], [0.0, 1.0, 0.0], [0.0, 1.0]));
        mesh.group(WORLD_MAT).add_triangle(v0, v1, v2);

        let obj = write_obj(&mesh, "stone");

        assert!(obj.contains("o stone"));
        assert!(obj.contains("v 0 0 0"));
        assert!(obj.contains("vt 0 0"));
        assert!(obj.contains("vn 0 1 0"));
        assert!(obj.contains("usemtl world"));
        assert!(obj.contains("f 1/1/1 2/2/2 3/3/3"));
    }

    #[test]
    fn test_empty_mesh_has_no_faces() {
        let obj = write_obj(&Mesh::new(), "empty");
        assert!(obj.contains("o empty"));
        assert!(!obj.contains("usemtl"));
        assert!(!obj.contains("\nf "));
    }
}
