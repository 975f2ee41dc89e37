//! Scene objects and their transforms

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::shader::{PrincipledParams, ShaderNode, PRINCIPLED_NODE_NAME};

/// Object type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    Mesh,
    Camera,
    /// Lights, empties, curves and anything else the exporter ignores
    #[default]
    #[serde(other)]
    Other,
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectKind::Mesh => write!(f, "mesh"),
            ObjectKind::Camera => write!(f, "camera"),
            ObjectKind::Other => write!(f, "other"),
        }
    }
}

/// Translation, rotation and non-uniform scale in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn from_translation_rotation(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
            scale: Vec3::ONE,
        }
    }

    /// World matrix, scale applied first then rotation then translation
    pub fn world_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    /// Interpolate towards `other`; `t` is clamped to `[0, 1]`
    pub fn lerp(&self, other: &Transform, t: f32) -> Transform {
        let t = t.clamp(0.0, 1.0);
        Transform {
            translation: self.translation.lerp(other.translation, t),
            rotation: self.rotation.slerp(other.rotation, t),
            scale: self.scale.lerp(other.scale, t),
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Transform pinned to a frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub frame: i32,
    pub transform: Transform,
}

/// Camera lens data
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraData {
    /// Horizontal field of view in radians
    pub angle_x: f32,
}

impl Default for CameraData {
    fn default() -> Self {
        // 50mm lens on a 36mm sensor
        Self { angle_x: 0.691_150_4 }
    }
}

/// Polygon mesh in object space
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshGeometry {
    pub positions: Vec<Vec3>,
    /// Per-vertex normals; empty when the mesh carries none
    pub normals: Vec<Vec3>,
    /// Zero-based vertex indices per polygon
    pub faces: Vec<Vec<u32>>,
}

impl MeshGeometry {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }
}

/// One material slot on a mesh
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialSlot {
    pub name: String,
    pub nodes: Vec<ShaderNode>,
    /// Shorthand for a principled node, expanded when the scene is loaded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub principled: Option<PrincipledParams>,
}

impl MaterialSlot {
    /// Material whose node tree holds a single principled node
    pub fn principled(name: impl Into<String>, params: PrincipledParams) -> Self {
        Self {
            name: name.into(),
            nodes: vec![params.to_node()],
            principled: None,
        }
    }

    /// Material with an explicit node list
    pub fn with_nodes(name: impl Into<String>, nodes: Vec<ShaderNode>) -> Self {
        Self {
            name: name.into(),
            nodes,
            principled: None,
        }
    }

    /// Find a node by name
    pub fn node(&self, name: &str) -> Option<&ShaderNode> {
        self.nodes.iter().find(|node| node.name == name)
    }

    /// The principled shader node, if any
    pub fn principled_node(&self) -> Option<&ShaderNode> {
        self.node(PRINCIPLED_NODE_NAME)
    }

    /// Move the `principled` shorthand into the node list
    pub(crate) fn expand_shorthand(&mut self) {
        if let Some(params) = self.principled.take() {
            if self.principled_node().is_none() {
                self.nodes.push(params.to_node());
            }
        }
    }
}

fn default_visible() -> bool {
    true
}

/// Object in the scene
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneObject {
    pub name: String,
    pub kind: ObjectKind,
    pub transform: Transform,
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Transient flag used by the mesh export handshake
    #[serde(skip)]
    pub selected: bool,
    pub materials: Vec<MaterialSlot>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub camera: Option<CameraData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geometry: Option<MeshGeometry>,
    /// Keyframes sorted by frame
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub animation: Vec<Keyframe>,
}

impl SceneObject {
    fn new(name: impl Into<String>, kind: ObjectKind) -> Self {
        Self {
            name: name.into(),
            kind,
            visible: true,
            ..Default::default()
        }
    }

    /// Visible mesh object with no material and no geometry
    pub fn mesh(name: impl Into<String>) -> Self {
        Self::new(name, ObjectKind::Mesh)
    }

    /// Visible camera with default lens
    pub fn camera(name: impl Into<String>, camera: CameraData) -> Self {
        Self {
            camera: Some(camera),
            ..Self::new(name, ObjectKind::Camera)
        }
    }

    /// Visible object of a type the exporter ignores
    pub fn other(name: impl Into<String>) -> Self {
        Self::new(name, ObjectKind::Other)
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_material(mut self, material: MaterialSlot) -> Self {
        self.materials.push(material);
        self
    }

    pub fn with_geometry(mut self, geometry: MeshGeometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn with_keyframe(mut self, frame: i32, transform: Transform) -> Self {
        self.animation.push(Keyframe { frame, transform });
        self.animation.sort_by_key(|key| key.frame);
        self
    }

    /// World-space location
    pub fn location(&self) -> Vec3 {
        self.transform.translation
    }

    pub fn world_matrix(&self) -> Mat4 {
        self.transform.world_matrix()
    }

    /// First material slot
    pub fn primary_material(&self) -> Option<&MaterialSlot> {
        self.materials.first()
    }

    /// Principled node of the first material slot
    pub fn primary_shader(&self) -> Option<&ShaderNode> {
        self.primary_material().and_then(MaterialSlot::principled_node)
    }

    /// Transform at `frame` from the keyframes, or `None` when unanimated.
    /// Frames outside the keyed range hold the nearest key.
    pub fn sample_animation(&self, frame: i32) -> Option<Transform> {
        let first = self.animation.first()?;
        let last = self.animation.last()?;

        if frame <= first.frame {
            return Some(first.transform);
        }
        if frame >= last.frame {
            return Some(last.transform);
        }

        let next_index = self.animation.iter().position(|key| key.frame >= frame)?;
        let next = &self.animation[next_index];
        if next.frame == frame || next_index == 0 {
            return Some(next.transform);
        }

        let prev = &self.animation[next_index - 1];
        // Keys may sit at opposite ends of the i32 range.
        let elapsed = i64::from(frame) - i64::from(prev.frame);
        let span = i64::from(next.frame) - i64::from(prev.frame);
        let t = elapsed as f32 / span as f32;
        Some(prev.transform.lerp(&next.transform, t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_deserializes_unknown_as_other() {
        let kind: ObjectKind = serde_json::from_str("\"light\"").unwrap();
        assert_eq!(kind, ObjectKind::Other);
        let kind: ObjectKind = serde_json::from_str("\"camera\"").unwrap();
        assert_eq!(kind, ObjectKind::Camera);
    }

    #[test]
    fn test_world_matrix_translation() {
        let transform = Transform::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let point = transform.world_matrix().transform_point3(Vec3::ZERO);
        assert_eq!(point, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_sample_animation_interpolates() {
        let object = SceneObject::other("Empty")
            .with_keyframe(10, Transform::from_translation(Vec3::new(10.0, 0.0, 0.0)))
            .with_keyframe(0, Transform::from_translation(Vec3::ZERO));

        let mid = object.sample_animation(5).unwrap();
        assert!((mid.translation.x - 5.0).abs() < 1e-5);

        assert_eq!(object.sample_animation(-3).unwrap().translation, Vec3::ZERO);
        assert_eq!(object.sample_animation(40).unwrap().translation.x, 10.0);
        assert_eq!(object.sample_animation(10).unwrap().translation.x, 10.0);
    }

    #[test]
    fn test_sample_animation_wide_key_span() {
        let object = SceneObject::other("Empty")
            .with_keyframe(-2_000_000_000, Transform::from_translation(Vec3::ZERO))
            .with_keyframe(2_000_000_000, Transform::from_translation(Vec3::new(8.0, 0.0, 0.0)));

        let mid = object.sample_animation(0).unwrap();
        assert!((mid.translation.x - 4.0).abs() < 1e-3);

        let near_end = object.sample_animation(1_999_999_999).unwrap();
        assert!(near_end.translation.x > 7.9 && near_end.translation.x <= 8.0);
    }

    #[test]
    fn test_sample_animation_without_keys() {
        assert!(SceneObject::mesh("Cube").sample_animation(1).is_none());
    }

    #[test]
    fn test_primary_shader_uses_first_slot() {
        let object = SceneObject::mesh("Cube")
            .with_material(MaterialSlot::with_nodes("Empty", vec![]))
            .with_material(MaterialSlot::principled("Red", PrincipledParams::default()));

        assert!(object.primary_material().is_some());
        assert!(object.primary_shader().is_none());
    }

    #[test]
    fn test_expand_shorthand() {
        let mut slot = MaterialSlot {
            name: "Glass".into(),
            nodes: vec![],
            principled: Some(PrincipledParams::default()),
        };
        slot.expand_shorthand();
        assert!(slot.principled_node().is_some());
        assert!(slot.principled.is_none());
    }
}
