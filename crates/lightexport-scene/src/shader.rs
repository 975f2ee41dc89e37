//! Shader-parameter graph access
//!
//! A shader node exposes an ordered list of input slots. Only a fixed set of
//! slots of the principled node is understood; `PrincipledInputs` gives each
//! of them a name and checks the stored value type on every read.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use lightexport_core::{Error, Result};

/// Name of the principled node inside a material's node tree
pub const PRINCIPLED_NODE_NAME: &str = "Principled BSDF";

/// Slot indices of the principled node inputs the exporter reads
pub mod slots {
    pub const BASE_COLOR: usize = 0;
    pub const METALLIC: usize = 6;
    pub const ROUGHNESS: usize = 9;
    pub const IOR: usize = 16;
    pub const TRANSMISSION: usize = 17;
    pub const EMISSION_COLOR: usize = 19;
    pub const EMISSION_STRENGTH: usize = 20;
    /// Number of slots written by `PrincipledParams::to_node`
    pub const COUNT: usize = 22;
}

/// Value stored in a shader input slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ShaderValue {
    Flag(bool),
    Scalar(f32),
    /// Color or vector, three or more components
    Color(Vec<f32>),
}

impl ShaderValue {
    /// Human-readable type name for error messages
    pub fn type_name(&self) -> String {
        match self {
            ShaderValue::Flag(_) => "flag".to_string(),
            ShaderValue::Scalar(_) => "scalar".to_string(),
            ShaderValue::Color(components) => format!("{}-component color", components.len()),
        }
    }

    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        ShaderValue::Color(vec![r, g, b, 1.0])
    }
}

/// Node in a material's shader graph
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShaderNode {
    pub name: String,
    pub inputs: Vec<ShaderValue>,
}

impl ShaderNode {
    pub fn new(name: impl Into<String>, inputs: Vec<ShaderValue>) -> Self {
        Self {
            name: name.into(),
            inputs,
        }
    }

    /// Typed view over the principled inputs of this node
    pub fn principled_inputs(&self) -> PrincipledInputs<'_> {
        PrincipledInputs::new(&self.inputs)
    }
}

/// Named, type-checked accessors for the recognized principled slots.
/// Slots past the recognized set are never read.
#[derive(Debug, Clone, Copy)]
pub struct PrincipledInputs<'a> {
    inputs: &'a [ShaderValue],
}

impl<'a> PrincipledInputs<'a> {
    pub fn new(inputs: &'a [ShaderValue]) -> Self {
        Self { inputs }
    }

    /// Slot 0, first three components
    pub fn base_color(&self) -> Result<Vec3> {
        self.color(slots::BASE_COLOR, "base color")
    }

    /// Slot 6; zero selects a diffuse base layer
    pub fn metallic(&self) -> Result<f32> {
        self.scalar(slots::METALLIC, "metallic")
    }

    /// Slot 9
    pub fn roughness(&self) -> Result<f32> {
        self.scalar(slots::ROUGHNESS, "roughness")
    }

    /// Slot 16
    pub fn ior(&self) -> Result<f32> {
        self.scalar(slots::IOR, "ior")
    }

    /// Slot 17. Accepts a flag, or a scalar weight that counts when nonzero.
    pub fn transmission(&self) -> Result<bool> {
        const NAME: &str = "transmission";
        match self.slot(slots::TRANSMISSION, NAME)? {
            ShaderValue::Flag(flag) => Ok(*flag),
            ShaderValue::Scalar(weight) => Ok(*weight != 0.0),
            other => Err(mismatch(slots::TRANSMISSION, NAME, "flag", other)),
        }
    }

    /// Slot 19, first three components
    pub fn emission_color(&self) -> Result<Vec3> {
        self.color(slots::EMISSION_COLOR, "emission color")
    }

    /// Slot 20
    pub fn emission_strength(&self) -> Result<f32> {
        self.scalar(slots::EMISSION_STRENGTH, "emission strength")
    }

    fn slot(&self, slot: usize, name: &'static str) -> Result<&'a ShaderValue> {
        self.inputs.get(slot).ok_or(Error::MissingSlot { slot, name })
    }

    fn scalar(&self, slot: usize, name: &'static str) -> Result<f32> {
        match self.slot(slot, name)? {
            ShaderValue::Scalar(value) => Ok(*value),
            other => Err(mismatch(slot, name, "scalar", other)),
        }
    }

    fn color(&self, slot: usize, name: &'static str) -> Result<Vec3> {
        match self.slot(slot, name)? {
            ShaderValue::Color(components) if components.len() >= 3 => {
                Ok(Vec3::new(components[0], components[1], components[2]))
            }
            other => Err(mismatch(slot, name, "color", other)),
        }
    }
}

fn mismatch(slot: usize, name: &'static str, expected: &'static str, found: &ShaderValue) -> Error {
    Error::SlotTypeMismatch {
        slot,
        name,
        expected,
        found: found.type_name(),
    }
}

/// Compact description of a principled node for scene files and tests.
/// Missing fields take the authoring tool's defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrincipledParams {
    pub base_color: Vec3,
    pub metallic: f32,
    pub roughness: f32,
    pub ior: f32,
    pub transmission: f32,
    pub emission_color: Vec3,
    pub emission_strength: f32,
}

impl PrincipledParams {
    pub fn with_base_color(mut self, color: Vec3) -> Self {
        self.base_color = color;
        self
    }

    pub fn with_metallic(mut self, metallic: f32) -> Self {
        self.metallic = metallic;
        self
    }

    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness;
        self
    }

    pub fn with_emission(mut self, color: Vec3, strength: f32) -> Self {
        self.emission_color = color;
        self.emission_strength = strength;
        self
    }

    pub fn with_transmission(mut self, transmission: f32, ior: f32) -> Self {
        self.transmission = transmission;
        self.ior = ior;
        self
    }

    /// Expand into the full principled slot layout
    pub fn to_node(&self) -> ShaderNode {
        let color = |c: Vec3| ShaderValue::rgb(c.x, c.y, c.z);

        let inputs = vec![
            color(self.base_color),                  // 0 base color
            ShaderValue::Scalar(0.0),                // 1 subsurface
            ShaderValue::Color(vec![1.0, 0.2, 0.1]), // 2 subsurface radius
            ShaderValue::rgb(0.8, 0.8, 0.8),         // 3 subsurface color
            ShaderValue::Scalar(1.4),                // 4 subsurface ior
            ShaderValue::Scalar(0.0),                // 5 subsurface anisotropy
            ShaderValue::Scalar(self.metallic),      // 6 metallic
            ShaderValue::Scalar(0.5),                // 7 specular
            ShaderValue::Scalar(0.0),                // 8 specular tint
            ShaderValue::Scalar(self.roughness),     // 9 roughness
            ShaderValue::Scalar(0.0),                // 10 anisotropic
            ShaderValue::Scalar(0.0),                // 11 anisotropic rotation
            ShaderValue::Scalar(0.0),                // 12 sheen
            ShaderValue::Scalar(0.5),                // 13 sheen tint
            ShaderValue::Scalar(0.0),                // 14 clearcoat
            ShaderValue::Scalar(0.03),               // 15 clearcoat roughness
            ShaderValue::Scalar(self.ior),           // 16 ior
            ShaderValue::Scalar(self.transmission),  // 17 transmission
            ShaderValue::Scalar(0.0),                // 18 transmission roughness
            color(self.emission_color),              // 19 emission
            ShaderValue::Scalar(self.emission_strength), // 20 emission strength
            ShaderValue::Scalar(1.0),                // 21 alpha
        ];
        debug_assert_eq!(inputs.len(), slots::COUNT);

        ShaderNode::new(PRINCIPLED_NODE_NAME, inputs)
    }
}

impl Default for PrincipledParams {
    fn default() -> Self {
        Self {
            base_color: Vec3::splat(0.8),
            metallic: 0.0,
            roughness: 0.5,
            ior: 1.45,
            transmission: 0.0,
            emission_color: Vec3::ZERO,
            emission_strength: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_node_reads_back() {
        let node = PrincipledParams::default().to_node();
        let inputs = node.principled_inputs();

        assert_eq!(node.name, PRINCIPLED_NODE_NAME);
        assert_eq!(inputs.base_color().unwrap(), Vec3::splat(0.8));
        assert_eq!(inputs.metallic().unwrap(), 0.0);
        assert_eq!(inputs.roughness().unwrap(), 0.5);
        assert_eq!(inputs.ior().unwrap(), 1.45);
        assert!(!inputs.transmission().unwrap());
        assert_eq!(inputs.emission_color().unwrap(), Vec3::ZERO);
        assert_eq!(inputs.emission_strength().unwrap(), 1.0);
    }

    #[test]
    fn test_wrong_slot_type_is_rejected() {
        let mut node = PrincipledParams::default().to_node();
        node.inputs[slots::METALLIC] = ShaderValue::rgb(1.0, 0.0, 0.0);

        let err = node.principled_inputs().metallic().unwrap_err();
        assert!(matches!(
            err,
            Error::SlotTypeMismatch { slot: 6, expected: "scalar", .. }
        ));
    }

    #[test]
    fn test_short_color_is_rejected() {
        let mut node = PrincipledParams::default().to_node();
        node.inputs[slots::BASE_COLOR] = ShaderValue::Color(vec![1.0, 0.5]);

        assert!(matches!(
            node.principled_inputs().base_color(),
            Err(Error::SlotTypeMismatch { slot: 0, .. })
        ));
    }

    #[test]
    fn test_missing_slot() {
        let inputs = [ShaderValue::rgb(1.0, 1.0, 1.0)];
        let view = PrincipledInputs::new(&inputs);

        assert!(view.base_color().is_ok());
        assert!(matches!(
            view.emission_strength(),
            Err(Error::MissingSlot { slot: 20, .. })
        ));
    }

    #[test]
    fn test_transmission_accepts_flag_and_weight() {
        let mut node = PrincipledParams::default().to_node();

        node.inputs[slots::TRANSMISSION] = ShaderValue::Flag(true);
        assert!(node.principled_inputs().transmission().unwrap());

        node.inputs[slots::TRANSMISSION] = ShaderValue::Scalar(0.25);
        assert!(node.principled_inputs().transmission().unwrap());

        node.inputs[slots::TRANSMISSION] = ShaderValue::Scalar(0.0);
        assert!(!node.principled_inputs().transmission().unwrap());
    }

    #[test]
    fn test_untagged_values_from_json() {
        let values: Vec<ShaderValue> = serde_json::from_str("[true, 0.5, [1.0, 0.0, 0.0, 1.0]]").unwrap();
        assert_eq!(values[0], ShaderValue::Flag(true));
        assert_eq!(values[1], ShaderValue::Scalar(0.5));
        assert_eq!(values[2], ShaderValue::rgb(1.0, 0.0, 0.0));
    }
}
