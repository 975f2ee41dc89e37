//! Mesh exporter that records calls instead of writing files

use std::path::{Path, PathBuf};

use lightexport_scene::SceneContext;

use super::{MeshExportError, MeshExportOptions, MeshExportResult, MeshExporter};

/// One recorded export call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshExportCall {
    pub path: PathBuf,
    /// Names of the objects selected at call time, native order
    pub selected: Vec<String>,
    pub options: MeshExportOptions,
}

/// Records every call; can be told to fail for one object name
#[derive(Debug, Default, Clone)]
pub struct RecordingMeshExporter {
    calls: Vec<MeshExportCall>,
    fail_on: Option<String>,
}

impl RecordingMeshExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail any call made while `object` is selected
    pub fn failing_on(object: impl Into<String>) -> Self {
        Self {
            calls: Vec::new(),
            fail_on: Some(object.into()),
        }
    }

    pub fn calls(&self) -> &[MeshExportCall] {
        &self.calls
    }
}

impl MeshExporter for RecordingMeshExporter {
    fn export_selected(
        &mut self,
        scene: &dyn SceneContext,
        path: &Path,
        options: &MeshExportOptions,
    ) -> MeshExportResult<()> {
        let selected: Vec<String> = scene
            .selected_ids()
            .into_iter()
            .filter_map(|id| scene.object(id).map(|object| object.name.clone()))
            .collect();

        let failing = self
            .fail_on
            .as_ref()
            .is_some_and(|name| selected.iter().any(|s| s == name));

        self.calls.push(MeshExportCall {
            path: path.to_path_buf(),
            selected,
            options: *options,
        });

        if failing {
            return Err(MeshExportError::ExportFailed(format!(
                "refusing to export {}",
                path.display()
            )));
        }
        Ok(())
    }
}
