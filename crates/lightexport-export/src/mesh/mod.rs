//! Mesh exporter collaborator
//!
//! Geometry never goes into a frame document. Each mesh object is written to
//! its own file by a `MeshExporter` while it is the only selected object, and
//! the document records the file path.

mod obj;
mod recording;

pub use obj::ObjMeshExporter;
pub use recording::{MeshExportCall, RecordingMeshExporter};

use std::path::Path;

use lightexport_scene::SceneContext;

/// Mesh export errors
#[derive(Debug, thiserror::Error)]
pub enum MeshExportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("No mesh objects to export")]
    NothingSelected,

    #[error("Object '{object}' has no geometry")]
    MissingGeometry { object: String },

    #[error("Object '{object}': face {face} has {vertices} vertices")]
    DegenerateFace {
        object: String,
        face: usize,
        vertices: usize,
    },

    #[error("Object '{object}': vertex index {index} out of range ({count} vertices)")]
    IndexOutOfRange {
        object: String,
        index: u32,
        count: usize,
    },

    #[error("Export failed: {0}")]
    ExportFailed(String),
}

pub type MeshExportResult<T> = Result<T, MeshExportError>;

/// Mesh export options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshExportOptions {
    /// Only export selected objects
    pub selected_only: bool,
    /// Split polygons into triangles
    pub triangulate: bool,
    /// Write material references
    pub export_materials: bool,
    /// Write smoothing groups
    pub smooth_groups: bool,
}

impl MeshExportOptions {
    /// The fixed set used for every mesh in a frame document
    pub const FRAME_EXPORT: Self = Self {
        selected_only: true,
        triangulate: true,
        export_materials: false,
        smooth_groups: true,
    };
}

impl Default for MeshExportOptions {
    fn default() -> Self {
        Self::FRAME_EXPORT
    }
}

/// Writes mesh objects of a scene to a file
pub trait MeshExporter {
    /// Export the selected mesh objects (or every visible mesh when
    /// `selected_only` is false) to `path`
    fn export_selected(
        &mut self,
        scene: &dyn SceneContext,
        path: &Path,
        options: &MeshExportOptions,
    ) -> MeshExportResult<()>;
}

impl<M: MeshExporter + ?Sized> MeshExporter for Box<M> {
    fn export_selected(
        &mut self,
        scene: &dyn SceneContext,
        path: &Path,
        options: &MeshExportOptions,
    ) -> MeshExportResult<()> {
        (**self).export_selected(scene, path, options)
    }
}
