//! Frame serialization
//!
//! Walks the visible objects of a scene once and emits a `[mesh]` block per
//! mesh and a `[camera]` block per camera. Each line goes to the document
//! sink first and is then mirrored to the console.

use lightexport_core::logging::instrument_frame;
use lightexport_core::{Error, ObjectId, Result};
use lightexport_scene::{ObjectKind, SceneContext};
use tracing::{debug, warn};

use crate::camera::CameraRecord;
use crate::console::ConsoleSink;
use crate::document::{DocumentSink, FrameDocument, MeshSection, Section};
use crate::material::classify_object;
use crate::mesh::{MeshExportOptions, MeshExporter};
use crate::options::ExportOptions;

const BANNER_WIDTH: usize = 50;

/// Serializes one frame of a scene
pub struct FrameSerializer<M, C> {
    options: ExportOptions,
    mesh_exporter: M,
    console: C,
}

impl<M: MeshExporter, C: ConsoleSink> FrameSerializer<M, C> {
    pub fn new(options: ExportOptions, mesh_exporter: M, console: C) -> Self {
        Self {
            options,
            mesh_exporter,
            console,
        }
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    pub fn mesh_exporter(&self) -> &M {
        &self.mesh_exporter
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut C {
        &mut self.console
    }

    /// Serialize the scene at `frame` (or at its current state) into `sink`.
    ///
    /// Moves the scene's frame cursor when `frame` is given and leaves every
    /// object deselected. Errors are reported on the console before they are
    /// returned.
    pub fn serialize_frame(
        &mut self,
        scene: &mut dyn SceneContext,
        frame: Option<i32>,
        sink: &mut dyn DocumentSink,
    ) -> Result<FrameDocument> {
        instrument_frame(frame, || {
            self.serialize_frame_inner(scene, frame, sink).map_err(|err| {
                self.console.error(&err.to_string());
                err
            })
        })
    }

    fn serialize_frame_inner(
        &mut self,
        scene: &mut dyn SceneContext,
        frame: Option<i32>,
        sink: &mut dyn DocumentSink,
    ) -> Result<FrameDocument> {
        if let Some(frame) = frame {
            scene.set_current_frame(frame);
        }
        scene.deselect_all();

        let title = match frame {
            Some(frame) => format!("Frame {frame}"),
            None => "Scene".to_string(),
        };
        self.console.output(&format!("{title:=^width$}", width = BANNER_WIDTH));

        let mut document = FrameDocument::new(frame);

        for id in scene.visible_ids() {
            let Some(object) = scene.object(id) else {
                warn!(%id, "Visible object vanished from the scene");
                continue;
            };
            let name = object.name.clone();

            match object.kind {
                ObjectKind::Mesh => {
                    let section = self.serialize_mesh(scene, id, &name, frame, sink)?;
                    document.sections.push(Section::Mesh(section));
                }
                ObjectKind::Camera => {
                    let record = CameraRecord::from_object(object, scene.resolution());
                    for line in record.lines() {
                        self.emit(sink, &line)?;
                    }
                    document.sections.push(Section::Camera(record));
                }
                ObjectKind::Other => {
                    debug!(object = %name, "Skipping object of unsupported type");
                }
            }
        }

        self.console.output(&"=".repeat(BANNER_WIDTH));

        Ok(document)
    }

    fn serialize_mesh(
        &mut self,
        scene: &mut dyn SceneContext,
        id: ObjectId,
        name: &str,
        frame: Option<i32>,
        sink: &mut dyn DocumentSink,
    ) -> Result<MeshSection> {
        let path = self.options.mesh_path(name, frame);
        self.emit(sink, MeshSection::HEADER)?;

        // The exporter only writes selected objects; the selection must be
        // cleared again whether or not it succeeds.
        scene.set_selected(id, true)?;
        let exported = self
            .mesh_exporter
            .export_selected(&*scene, &path, &MeshExportOptions::FRAME_EXPORT);
        scene.set_selected(id, false)?;
        exported.map_err(|e| Error::ExternalExport {
            object: name.to_string(),
            message: e.to_string(),
        })?;

        let mesh_file = path.display().to_string();
        self.emit(sink, &MeshSection::mesh_file_line(&mesh_file))?;

        let object = scene.object(id).ok_or_else(|| Error::ObjectNotFound {
            name: name.to_string(),
        })?;
        let materials = classify_object(object)?;
        for line in materials.iter().flat_map(|record| record.lines()) {
            self.emit(sink, &line)?;
        }

        Ok(MeshSection {
            object: name.to_string(),
            mesh_file,
            materials,
        })
    }

    fn emit(&mut self, sink: &mut dyn DocumentSink, line: &str) -> Result<()> {
        sink.write_line(line)?;
        self.console.info(line);
        Ok(())
    }
}
