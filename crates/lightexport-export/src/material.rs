//! Material classification
//!
//! A principled shader is read as a stack of independent layers: a base layer
//! that is either diffuse or metallic, an optional emission layer and an
//! optional transmission layer. Every active layer yields its own record, so
//! one surface can produce up to three records.

use glam::Vec3;
use serde::Serialize;

use lightexport_core::{Error, Result};
use lightexport_scene::{PrincipledInputs, SceneObject};

use crate::document::{format_scalar, format_vec3};

/// One classified material layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "material_type", rename_all = "snake_case")]
pub enum MaterialRecord {
    Diffuse { albedo: Vec3 },
    Metallic { albedo: Vec3, roughness: f32 },
    Emissive { emission_color: Vec3, strength: f32 },
    Dielectric { albedo: Vec3, ior: f32 },
}

impl MaterialRecord {
    /// Value of the `material_type` line
    pub fn type_name(&self) -> &'static str {
        match self {
            MaterialRecord::Diffuse { .. } => "diffuse_material",
            MaterialRecord::Metallic { .. } => "metallic_material",
            MaterialRecord::Emissive { .. } => "emissive_material",
            MaterialRecord::Dielectric { .. } => "dielectric_material",
        }
    }

    /// Document lines for this record, `material_type` first
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![format!("material_type = {}", self.type_name())];
        match self {
            MaterialRecord::Diffuse { albedo } => {
                lines.push(format!("albedo = {}", format_vec3(*albedo)));
            }
            MaterialRecord::Metallic { albedo, roughness } => {
                lines.push(format!("albedo = {}", format_vec3(*albedo)));
                lines.push(format!("roughness = {}", format_scalar(*roughness)));
            }
            MaterialRecord::Emissive { emission_color, strength } => {
                lines.push(format!("emission_color = {}", format_vec3(*emission_color)));
                lines.push(format!("strength = {}", format_scalar(*strength)));
            }
            MaterialRecord::Dielectric { albedo, ior } => {
                lines.push(format!("albedo = {}", format_vec3(*albedo)));
                lines.push(format!("ior = {}", format_scalar(*ior)));
            }
        }
        lines
    }
}

/// Classify a principled shader into material records.
///
/// Records come out in layer order: base, emission, transmission. Slots are
/// only read when the layer that needs them is active.
pub fn classify(shader: &PrincipledInputs<'_>) -> Result<Vec<MaterialRecord>> {
    let mut records = Vec::with_capacity(3);

    let albedo = shader.base_color()?;
    // Any nonzero metallic value, however small, selects the metallic base.
    if shader.metallic()? == 0.0 {
        records.push(MaterialRecord::Diffuse { albedo });
    } else {
        records.push(MaterialRecord::Metallic {
            albedo,
            roughness: shader.roughness()?,
        });
    }

    let emission_color = shader.emission_color()?;
    if emission_color.cmpne(Vec3::ZERO).any() {
        records.push(MaterialRecord::Emissive {
            emission_color,
            strength: shader.emission_strength()?,
        });
    }

    if shader.transmission()? {
        records.push(MaterialRecord::Dielectric {
            albedo,
            ior: shader.ior()?,
        });
    }

    Ok(records)
}

/// Classify the primary shader of a mesh object
pub fn classify_object(object: &SceneObject) -> Result<Vec<MaterialRecord>> {
    let shader = object.primary_shader().ok_or_else(|| Error::MissingMaterial {
        object: object.name.clone(),
    })?;
    classify(&shader.principled_inputs())
}
