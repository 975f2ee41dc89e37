//! Camera records

use glam::{Mat4, Vec3, Vec4};
use serde::Serialize;

use lightexport_core::Resolution;
use lightexport_scene::SceneObject;

use crate::coords::{to_export_space, to_export_space_rotation};
use crate::document::{format_scalar, format_vec3};

/// Camera parameters for one frame, positions already in export space
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CameraRecord {
    #[serde(skip)]
    pub object: String,
    /// Horizontal field of view in degrees
    pub fov: f32,
    pub position: Vec3,
    pub target: Vec3,
    pub width: u32,
    pub height: u32,
}

impl CameraRecord {
    pub const HEADER: &'static str = "[camera]";

    /// Build the record from a camera object's current world transform
    pub fn from_object(object: &SceneObject, resolution: Resolution) -> Self {
        let lens = object.camera.unwrap_or_default();
        let location = object.location();
        let forward = camera_forward(object.world_matrix());
        let target = location + to_export_space_rotation(forward);

        Self {
            object: object.name.clone(),
            fov: lens.angle_x.to_degrees(),
            position: to_export_space(location),
            target: to_export_space(target),
            width: resolution.width,
            height: resolution.height,
        }
    }

    /// Document lines, section header first
    pub fn lines(&self) -> Vec<String> {
        vec![
            Self::HEADER.to_string(),
            format!("fov = {}", format_scalar(self.fov)),
            format!("position = {}", format_vec3(self.position)),
            format!("target = {}", format_vec3(self.target)),
            format!("width = {}", self.width),
            format!("height = {}", self.height),
        ]
    }
}

/// Local `-Z` pushed through the inverse world matrix as a row vector,
/// which for a rigid transform is the camera's world-space view direction.
pub fn camera_forward(world: Mat4) -> Vec3 {
    let inverse = world.inverse();
    (inverse.transpose() * Vec4::new(0.0, 0.0, -1.0, 1.0)).truncate()
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use glam::Quat;
    use lightexport_scene::{CameraData, Transform};

    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-5
    }

    #[test]
    fn test_fov_radians_to_degrees() {
        let camera = SceneObject::camera("Camera", CameraData { angle_x: FRAC_PI_2 });
        let record = CameraRecord::from_object(&camera, Resolution::new(800, 600));

        assert!((record.fov - 90.0).abs() < 1e-4);
        assert_eq!((record.width, record.height), (800, 600));
    }

    #[test]
    fn test_unrotated_camera_looks_down_negative_z() {
        assert!(approx(camera_forward(Mat4::IDENTITY), Vec3::NEG_Z));
    }

    #[test]
    fn test_forward_ignores_translation() {
        let world = Mat4::from_translation(Vec3::new(5.0, -3.0, 2.0));
        assert!(approx(camera_forward(world), Vec3::NEG_Z));
    }

    #[test]
    fn test_forward_follows_rotation() {
        // Tilting the camera up by 90 degrees about X points it along +Y.
        let world = Mat4::from_quat(Quat::from_rotation_x(FRAC_PI_2));
        assert!(approx(camera_forward(world), Vec3::Y));
    }

    #[test]
    fn test_position_and_target_in_export_space() {
        let transform = Transform::from_translation_rotation(
            Vec3::new(1.0, 2.0, 3.0),
            Quat::from_rotation_x(FRAC_PI_2),
        );
        let camera = SceneObject::camera("Camera", CameraData::default()).with_transform(transform);
        let record = CameraRecord::from_object(&camera, Resolution::default());

        assert_eq!(record.position, Vec3::new(1.0, 3.0, -2.0));
        // Authoring-space target is (1, 3, 3).
        assert!(approx(record.target, Vec3::new(1.0, 3.0, -3.0)));
    }

    #[test]
    fn test_lines_grammar() {
        let record = CameraRecord {
            object: "Camera".into(),
            fov: 90.0,
            position: Vec3::new(1.0, 3.0, -2.0),
            target: Vec3::new(1.0, 2.0, -2.0),
            width: 1920,
            height: 1080,
        };

        assert_eq!(
            record.lines(),
            vec![
                "[camera]",
                "fov = 90.0",
                "position = 1.0;3.0;-2.0",
                "target = 1.0;2.0;-2.0",
                "width = 1920",
                "height = 1080",
            ]
        );
    }
}
