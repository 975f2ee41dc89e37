//! Scene context abstraction
//!
//! The host environment owns the scene; the exporter only sees it through this
//! trait. The frame cursor and selection flags are shared mutable state, so
//! callers must drive a context from a single thread.

use lightexport_core::{FrameRange, ObjectId, Resolution, Result};

use crate::object::{MeshGeometry, SceneObject};

/// Read/mutate contract the exporter needs from a scene
pub trait SceneContext {
    /// Configured animation range, inclusive on both ends
    fn frame_range(&self) -> FrameRange;

    /// Current position of the frame cursor
    fn current_frame(&self) -> i32;

    /// Move the frame cursor and re-evaluate animated state
    fn set_current_frame(&mut self, frame: i32);

    /// Configured output resolution
    fn resolution(&self) -> Resolution;

    /// All object ids in the scene's native enumeration order
    fn object_ids(&self) -> Vec<ObjectId>;

    /// Look up an object
    fn object(&self, id: ObjectId) -> Option<&SceneObject>;

    /// Clear the selection flag on every object
    fn deselect_all(&mut self);

    /// Set or clear the selection flag on one object
    fn set_selected(&mut self, id: ObjectId, selected: bool) -> Result<()>;

    /// Whether `id` resolves to a visible object
    fn is_visible(&self, id: ObjectId) -> bool {
        self.object(id).is_some_and(|object| object.visible)
    }

    /// Geometry carried by an object, if any
    fn mesh_geometry(&self, id: ObjectId) -> Option<&MeshGeometry> {
        self.object(id).and_then(|object| object.geometry.as_ref())
    }

    /// Ids of visible objects, native order preserved
    fn visible_ids(&self) -> Vec<ObjectId> {
        self.object_ids()
            .into_iter()
            .filter(|id| self.is_visible(*id))
            .collect()
    }

    /// Ids of currently selected objects, native order preserved
    fn selected_ids(&self) -> Vec<ObjectId> {
        self.object_ids()
            .into_iter()
            .filter(|id| self.object(*id).is_some_and(|object| object.selected))
            .collect()
    }
}
