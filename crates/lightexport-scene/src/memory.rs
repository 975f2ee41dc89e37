//! In-memory scene
//!
//! Backs the command-line front end (scenes described as JSON) and every test
//! that needs a scene without the authoring tool.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use lightexport_core::{Error, FrameRange, ObjectId, Resolution, Result};

use crate::context::SceneContext;
use crate::object::SceneObject;

/// Scene held entirely in memory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryScene {
    pub name: String,
    pub frame_range: FrameRange,
    pub current_frame: i32,
    pub resolution: Resolution,
    pub objects: Vec<SceneObject>,
}

impl Default for MemoryScene {
    fn default() -> Self {
        Self {
            name: "Scene".to_string(),
            frame_range: FrameRange::default(),
            current_frame: 1,
            resolution: Resolution::default(),
            objects: Vec::new(),
        }
    }
}

impl MemoryScene {
    /// Empty scene with default range and resolution
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_frame_range(mut self, range: FrameRange) -> Self {
        self.frame_range = range;
        self
    }

    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    /// Parse a JSON scene description
    pub fn from_json_str(json: &str) -> Result<Self> {
        let mut scene: MemoryScene =
            serde_json::from_str(json).map_err(|e| Error::scene_format(e.to_string()))?;
        scene.prepare()?;

        debug!(
            scene = %scene.name,
            objects = scene.objects.len(),
            range = %scene.frame_range,
            "Loaded scene description"
        );

        Ok(scene)
    }

    /// Read and parse a JSON scene description from disk
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
            .map_err(|e| e.with_context(format!("loading scene {}", path.display())))
    }

    /// Serialize back to pretty JSON
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::scene_format(e.to_string()))
    }

    /// Append an object, keeping its keyframes ordered, and return its id
    pub fn add_object(&mut self, mut object: SceneObject) -> ObjectId {
        object.animation.sort_by_key(|key| key.frame);
        if let Some(transform) = object.sample_animation(self.current_frame) {
            object.transform = transform;
        }
        self.objects.push(object);
        ObjectId::new(self.objects.len() - 1)
    }

    pub fn get_object_by_name(&self, name: &str) -> Option<ObjectId> {
        self.objects
            .iter()
            .position(|object| object.name == name)
            .map(ObjectId::new)
    }

    pub fn get_object_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.get_mut(id.index())
    }

    /// Validate a freshly deserialized scene and evaluate it at its cursor
    fn prepare(&mut self) -> Result<()> {
        self.frame_range.validate()?;

        for object in &mut self.objects {
            object.selected = false;
            object.animation.sort_by_key(|key| key.frame);
            for material in &mut object.materials {
                material.expand_shorthand();
            }
        }

        self.evaluate_animation();
        Ok(())
    }

    fn evaluate_animation(&mut self) {
        let frame = self.current_frame;
        for object in &mut self.objects {
            if let Some(transform) = object.sample_animation(frame) {
                trace!(object = %object.name, frame, "Evaluated keyframes");
                object.transform = transform;
            }
        }
    }
}

impl SceneContext for MemoryScene {
    fn frame_range(&self) -> FrameRange {
        self.frame_range
    }

    fn current_frame(&self) -> i32 {
        self.current_frame
    }

    fn set_current_frame(&mut self, frame: i32) {
        self.current_frame = frame;
        self.evaluate_animation();
    }

    fn resolution(&self) -> Resolution {
        self.resolution
    }

    fn object_ids(&self) -> Vec<ObjectId> {
        (0..self.objects.len()).map(ObjectId::new).collect()
    }

    fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(id.index())
    }

    fn deselect_all(&mut self) {
        for object in &mut self.objects {
            object.selected = false;
        }
    }

    fn set_selected(&mut self, id: ObjectId, selected: bool) -> Result<()> {
        let object = self
            .objects
            .get_mut(id.index())
            .ok_or_else(|| Error::ObjectNotFound { name: id.to_string() })?;
        object.selected = selected;
        Ok(())
    }
}
