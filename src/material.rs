//! Material definitions emitted into the archive.
//!
//! A material describes a surface's shading inputs. Every field that can be
//! either a uniform value or a texture reference uses [`Field`], which
//! serializes untagged: a JSON string names a texture, a number is a constant.

use serde::{Deserialize, Serialize};

use crate::mesh::{TINTED_MAT, TRANSPARENT_MAT, TRANSPARENT_TINTED_MAT, WORLD_MAT};

/// Name of the shared world atlas texture referenced by canonical materials.
pub const WORLD_TEX: &str = "world";

/// A shading input that is either a constant or a texture reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Field {
    /// Named texture reference.
    Texture(String),
    /// Uniform numeric value.
    Value(f64),
}

impl Field {
    pub fn texture(name: impl Into<String>) -> Self {
        Field::Texture(name.into())
    }
}

/// An immutable surface description. Equality is structural.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Material {
    /// Base color: flat value or texture reference.
    pub color: Field,
    /// Surface roughness: numeric or texture reference.
    pub roughness: Field,
    /// Whether the surface renders with alpha blending.
    pub transparent: bool,
    /// Whether vertex colors tint the base color.
    pub use_vertex_colors: bool,
}

impl Material {
    /// Serialize this material as a pretty-printed JSON document.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    fn world(transparent: bool, use_vertex_colors: bool) -> Self {
        Self {
            color: Field::texture(WORLD_TEX),
            roughness: Field::Value(0.7),
            transparent,
            use_vertex_colors,
        }
    }

    /// The four canonical world materials, in archive emission order,
    /// paired with the entry id each is written under.
    pub fn canonical() -> [(&'static str, Material); 4] {
        [
            (WORLD_MAT, Material::world(false, false)),
            (TRANSPARENT_MAT, Material::world(true, false)),
            (TINTED_MAT, Material::world(false, true)),
            (TRANSPARENT_TINTED_MAT, Material::world(true, true)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_serializes_untagged() {
        let texture = serde_json::to_string(&Field::texture("world")).unwrap();
        assert_eq!(texture, "\"world\"");

        let value = serde_json::to_string(&Field::Value(0.7)).unwrap();
        assert_eq!(value, "0.7");
    }

    #[test]
    fn test_material_document_keys() {
        let (_, opaque) = &Material::canonical()[0];
        let json: serde_json::Value =
            serde_json::from_str(&opaque.to_json().unwrap()).unwrap();

        assert_eq!(json["color"], "world");
        assert_eq!(json["roughness"], 0.7);
        assert_eq!(json["transparent"], false);
        assert_eq!(json["useVertexColors"], false);
    }

    #[test]
    fn test_canonical_variants() {
        let materials = Material::canonical();
        assert_eq!(materials.len(), 4);

        // all reference the shared atlas
        for (_, mat) in &materials {
            assert_eq!(mat.color, Field::texture(WORLD_TEX));
        }

        let flags: Vec<(bool, bool)> = materials
            .iter()
            .map(|(_, m)| (m.transparent, m.use_vertex_colors))
            .collect();
        assert_eq!(
            flags,
            vec![(false, false), (true, false), (false, true), (true, true)]
        );
    }

    #[test]
    fn test_roundtrip() {
        let (_, original) = &Material::canonical()[3];
        let json = original.to_json().unwrap();
        let parsed: Material = serde_json::from_str(&json).unwrap();
        assert_eq!(&parsed, original);
    }
}
