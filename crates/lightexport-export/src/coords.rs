//! Axis conversion between the authoring space (Z up) and the export space (Y up)

use glam::Vec3;

/// Map a position into export space: `(x, y, z) -> (x, z, -y)`.
/// The sign flip keeps the frame right-handed.
pub fn to_export_space(positional: Vec3) -> Vec3 {
    Vec3::new(positional.x, positional.z, -positional.y)
}

/// Map a direction or rotation vector into export space.
///
/// Identity: forward offsets are added to positions in authoring space and
/// only the resulting point goes through [`to_export_space`].
pub fn to_export_space_rotation(v: Vec3) -> Vec3 {
    v
}
