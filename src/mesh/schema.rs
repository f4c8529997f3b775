//! Per-mesh attribute schema.

use crate::types::Vertex;

/// Component bit width declared for every float attribute.
pub const COMPONENT_BITS: u32 = 32;

/// One named per-vertex attribute as declared in the SMF/T header.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Attribute {
    Position,
    Normal,
    Uv(String),
    Group(String),
}

impl Attribute {
    /// The serialized attribute name, e.g. `UV:UVMap` or `GROUP:spine`.
    pub fn name(&self) -> String {
        match self {
            Attribute::Position => "POSITION".to_string(),
            Attribute::Normal => "NORMAL".to_string(),
            Attribute::Uv(layer) => format!("UV:{}", layer),
            Attribute::Group(group) => format!("GROUP:{}", group),
        }
    }

    pub fn component_count(&self) -> u32 {
        match self {
            Attribute::Position | Attribute::Normal => 3,
            Attribute::Uv(_) => 2,
            Attribute::Group(_) => 1,
        }
    }
}

/// The sorted UV layer and group names every vertex of one mesh carries.
///
/// Captured from the first vertex added to a mesh; two vertices agree on
/// the schema when their key sets are equal, whatever order the source
/// discovered them in.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AttributeSchema {
    uv_layers: Vec<String>,
    groups: Vec<String>,
}

impl AttributeSchema {
    /// Derive the schema carried by a vertex.
    pub fn of(vertex: &Vertex) -> Self {
        Self {
            uv_layers: vertex.uv.keys().cloned().collect(),
            groups: vertex.weights.keys().cloned().collect(),
        }
    }

    /// Check whether a vertex carries exactly this schema's names.
    pub fn matches(&self, vertex: &Vertex) -> bool {
        self.uv_layers.iter().eq(vertex.uv.keys()) && self.groups.iter().eq(vertex.weights.keys())
    }

    /// UV layer names, sorted.
    pub fn uv_layers(&self) -> &[String] {
        &self.uv_layers
    }

    /// Group names, sorted.
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    /// All attributes in header order: POSITION, NORMAL, UV layers, groups.
    pub fn attributes(&self) -> Vec<Attribute> {
        let mut attributes = vec![Attribute::Position, Attribute::Normal];
        attributes.extend(self.uv_layers.iter().cloned().map(Attribute::Uv));
        attributes.extend(self.groups.iter().cloned().map(Attribute::Group));
        attributes
    }
}

impl std::fmt::Display for AttributeSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "uv {:?} groups {:?}", self.uv_layers, self.groups)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{DVec2, DVec3};

    #[test]
    fn test_schema_sorted_regardless_of_insertion_order() {
        let v = Vertex::new(DVec3::ZERO, DVec3::Z)
            .with_uv("b", DVec2::ZERO)
            .with_uv("a", DVec2::ZERO)
            .with_weight("z", 0.0)
            .with_weight("m", 1.0);
        let schema = AttributeSchema::of(&v);

        assert_eq!(schema.uv_layers(), &["a".to_string(), "b".to_string()]);
        assert_eq!(schema.groups(), &["m".to_string(), "z".to_string()]);
        assert!(schema.matches(&v));
    }

    #[test]
    fn test_schema_mismatch_detected() {
        let a = Vertex::new(DVec3::ZERO, DVec3::Z).with_uv("UVMap", DVec2::ZERO);
        let b = Vertex::new(DVec3::ZERO, DVec3::Z).with_uv("Other", DVec2::ZERO);
        let c = Vertex::new(DVec3::ZERO, DVec3::Z)
            .with_uv("UVMap", DVec2::ZERO)
            .with_weight("arm", 0.0);

        let schema = AttributeSchema::of(&a);
        assert!(!schema.matches(&b));
        assert!(!schema.matches(&c));
    }

    #[test]
    fn test_attribute_order() {
        let v = Vertex::new(DVec3::ZERO, DVec3::Z)
            .with_weight("spine", 0.0)
            .with_uv("UVMap", DVec2::ZERO)
            .with_weight("arm", 0.0);
        let names: Vec<_> = AttributeSchema::of(&v)
            .attributes()
            .iter()
            .map(Attribute::name)
            .collect();

        assert_eq!(
            names,
            vec!["POSITION", "NORMAL", "UV:UVMap", "GROUP:arm", "GROUP:spine"]
        );
    }

    #[test]
    fn test_component_counts() {
        assert_eq!(Attribute::Position.component_count(), 3);
        assert_eq!(Attribute::Uv("a".into()).component_count(), 2);
        assert_eq!(Attribute::Group("a".into()).component_count(), 1);
    }
}
