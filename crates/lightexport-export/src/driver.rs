//! Animation export driver
//!
//! Opens one document per frame and hands it to the [`FrameSerializer`].
//! Frames run sequentially in ascending order; the first failing frame aborts
//! the run and earlier documents stay on disk.

use lightexport_core::{FrameRange, Result, ResultExt};
use lightexport_scene::SceneContext;
use tracing::info;

use crate::console::ConsoleSink;
use crate::document::{DocumentSink, FileDocumentSink, FrameDocument};
use crate::frame::FrameSerializer;
use crate::mesh::MeshExporter;
use crate::options::ExportOptions;

/// Writes frame documents to the configured output directory
pub struct ExportDriver<M, C> {
    serializer: FrameSerializer<M, C>,
}

impl<M: MeshExporter, C: ConsoleSink> ExportDriver<M, C> {
    pub fn new(options: ExportOptions, mesh_exporter: M, console: C) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            serializer: FrameSerializer::new(options, mesh_exporter, console),
        })
    }

    pub fn serializer(&self) -> &FrameSerializer<M, C> {
        &self.serializer
    }

    pub fn options(&self) -> &ExportOptions {
        self.serializer.options()
    }

    pub fn console(&self) -> &C {
        self.serializer.console()
    }

    /// Frames to export: the configured override, else the scene's own range
    pub fn frame_range(&self, scene: &dyn SceneContext) -> Result<FrameRange> {
        let range = self.options().frame_range.unwrap_or_else(|| scene.frame_range());
        range.validate()?;
        Ok(range)
    }

    /// Export one frame (or the current state) to its document file.
    /// An existing document for the same frame is overwritten.
    pub fn export_frame(&mut self, scene: &mut dyn SceneContext, frame: Option<i32>) -> Result<FrameDocument> {
        let path = self.options().document_path(frame);

        let mut sink = match self.open_document(&path) {
            Ok(sink) => sink,
            Err(err) => {
                self.serializer.console_mut().error(&err.to_string());
                return Err(err);
            }
        };

        let document = self.serializer.serialize_frame(scene, frame, &mut sink)?;

        if let Err(err) = sink.finish().with_context(|| format!("Failed to flush {}", path.display())) {
            self.serializer.console_mut().error(&err.to_string());
            return Err(err);
        }

        info!(path = %path.display(), sections = document.sections.len(), "Wrote frame document");
        Ok(document)
    }

    /// Serialize one frame into a caller-provided sink
    pub fn export_frame_to(
        &mut self,
        scene: &mut dyn SceneContext,
        frame: Option<i32>,
        sink: &mut dyn DocumentSink,
    ) -> Result<FrameDocument> {
        let document = self.serializer.serialize_frame(scene, frame, sink)?;
        sink.finish()?;
        Ok(document)
    }

    /// Export every frame of the range, ascending
    pub fn export_animation(&mut self, scene: &mut dyn SceneContext) -> Result<Vec<FrameDocument>> {
        let range = match self.frame_range(scene) {
            Ok(range) => range,
            Err(err) => {
                self.serializer.console_mut().error(&err.to_string());
                return Err(err);
            }
        };

        let request = format!("export frames {range} to {}", self.options().output_dir.display());
        self.serializer.console_mut().input(&request);
        info!(%range, frames = range.len(), "Exporting animation");

        let mut documents = Vec::new();
        for frame in range.frames() {
            documents.push(self.export_frame(scene, Some(frame))?);
        }

        Ok(documents)
    }

    fn open_document(&self, path: &std::path::Path) -> Result<FileDocumentSink> {
        std::fs::create_dir_all(&self.options().output_dir)
            .map_err(lightexport_core::Error::from)
            .with_context(|| format!("Failed to create {}", self.options().output_dir.display()))?;
        FileDocumentSink::create(path).with_context(|| format!("Failed to open {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;
    use lightexport_core::Error;
    use lightexport_scene::{CameraData, MaterialSlot, MemoryScene, PrincipledParams, SceneObject, Transform};

    use super::*;
    use crate::console::{ConsoleCategory, MemoryConsole};
    use crate::document::VecDocumentSink;
    use crate::mesh::RecordingMeshExporter;

    fn animated_scene() -> MemoryScene {
        let mut scene = MemoryScene::new().with_frame_range(FrameRange { start: 1, end: 3 });
        scene.add_object(SceneObject::mesh("Cube").with_material(MaterialSlot::principled(
            "Paint",
            PrincipledParams::default().with_base_color(Vec3::new(0.0, 0.5, 1.0)),
        )));
        scene.add_object(
            SceneObject::camera("Camera", CameraData::default())
                .with_keyframe(1, Transform::from_translation(Vec3::ZERO))
                .with_keyframe(3, Transform::from_translation(Vec3::new(2.0, 0.0, 0.0))),
        );
        scene
    }

    fn driver(dir: &std::path::Path) -> ExportDriver<RecordingMeshExporter, MemoryConsole> {
        ExportDriver::new(
            ExportOptions::in_dir(dir),
            RecordingMeshExporter::new(),
            MemoryConsole::new(),
        )
        .unwrap()
    }

    #[test]
    fn test_animation_writes_one_document_per_frame() {
        let dir = tempfile::tempdir().unwrap();
        let mut scene = animated_scene();
        let mut driver = driver(dir.path());

        let documents = driver.export_animation(&mut scene).unwrap();

        let frames: Vec<_> = documents.iter().map(|d| d.frame).collect();
        assert_eq!(frames, vec![Some(1), Some(2), Some(3)]);
        for frame in 1..=3 {
            let path = dir.path().join(format!("blender_export{frame}.toml"));
            let text = std::fs::read_to_string(&path).unwrap();
            assert!(text.starts_with("[mesh]\n"));
            assert!(text.contains(&format!("blender_export_Cube{frame}.obj")));
            assert!(text.contains("[camera]\n"));
        }
        assert_eq!(scene.current_frame(), 3);

        let calls = driver.serializer().mesh_exporter().calls();
        assert_eq!(calls.len(), 3);
        assert!(calls[2].path.ends_with("blender_export_Cube3.obj"));
    }

    #[test]
    fn test_camera_follows_animation() {
        let dir = tempfile::tempdir().unwrap();
        let mut scene = animated_scene();

        let documents = driver(dir.path()).export_animation(&mut scene).unwrap();

        let positions: Vec<Vec3> = documents
            .iter()
            .map(|d| d.cameras().next().unwrap().position)
            .collect();
        assert_eq!(positions[0], Vec3::ZERO);
        assert_eq!(positions[1], Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(positions[2], Vec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_range_override() {
        let dir = tempfile::tempdir().unwrap();
        let mut scene = animated_scene();
        let options = ExportOptions {
            frame_range: Some(FrameRange::single(2)),
            ..ExportOptions::in_dir(dir.path())
        };
        let mut driver = ExportDriver::new(options, RecordingMeshExporter::new(), MemoryConsole::new()).unwrap();

        let documents = driver.export_animation(&mut scene).unwrap();

        assert_eq!(documents.len(), 1);
        assert!(dir.path().join("blender_export2.toml").exists());
        assert!(!dir.path().join("blender_export1.toml").exists());
        assert_eq!(driver.console().texts(ConsoleCategory::Input).len(), 1);
    }

    #[test]
    fn test_invalid_range_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let options = ExportOptions {
            frame_range: Some(FrameRange { start: 5, end: 2 }),
            ..ExportOptions::in_dir(dir.path())
        };
        assert!(matches!(
            ExportDriver::new(options, RecordingMeshExporter::new(), MemoryConsole::new()),
            Err(Error::InvalidFrameRange { start: 5, end: 2 })
        ));

        let mut scene = animated_scene();
        scene.frame_range = FrameRange { start: 4, end: 1 };
        let mut driver = driver(dir.path());

        assert!(driver.export_animation(&mut scene).is_err());
        assert_eq!(driver.console().texts(ConsoleCategory::Error).len(), 1);
        assert!(driver.serializer().mesh_exporter().calls().is_empty());
    }

    #[test]
    fn test_failure_aborts_remaining_frames() {
        let dir = tempfile::tempdir().unwrap();
        let mut scene = animated_scene();
        let mut driver = ExportDriver::new(
            ExportOptions::in_dir(dir.path()),
            RecordingMeshExporter::failing_on("Cube"),
            MemoryConsole::new(),
        )
        .unwrap();

        let err = driver.export_animation(&mut scene).unwrap_err();

        assert!(matches!(err, Error::ExternalExport { .. }));
        assert_eq!(driver.serializer().mesh_exporter().calls().len(), 1);
        assert!(!dir.path().join("blender_export2.toml").exists());
        assert_eq!(driver.console().texts(ConsoleCategory::Error).len(), 1);
    }

    #[test]
    fn test_full_i32_range_fails_on_first_frame() {
        let dir = tempfile::tempdir().unwrap();
        let mut scene = animated_scene();
        scene.frame_range = FrameRange { start: i32::MIN, end: i32::MAX };
        let mut driver = ExportDriver::new(
            ExportOptions::in_dir(dir.path()),
            RecordingMeshExporter::failing_on("Cube"),
            MemoryConsole::new(),
        )
        .unwrap();

        let err = driver.export_animation(&mut scene).unwrap_err();

        assert!(matches!(err, Error::ExternalExport { .. }));
        assert_eq!(scene.current_frame(), i32::MIN);
        assert_eq!(driver.serializer().mesh_exporter().calls().len(), 1);
    }

    #[test]
    fn test_reexport_overwrites_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blender_export5.toml");
        std::fs::write(&path, "stale contents that are much longer than the real document\n".repeat(20)).unwrap();

        let mut scene = MemoryScene::new();
        scene.add_object(SceneObject::camera("Camera", CameraData::default()));
        driver(dir.path()).export_frame(&mut scene, Some(5)).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("[camera]\n"));
        assert!(!text.contains("stale"));
    }

    #[test]
    fn test_current_state_document_has_no_frame_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let mut scene = MemoryScene::new();

        let document = driver(dir.path()).export_frame(&mut scene, None).unwrap();

        assert!(document.is_empty());
        let text = std::fs::read_to_string(dir.path().join("blender_export.toml")).unwrap();
        assert!(text.is_empty());
    }

    #[test]
    fn test_export_frame_to_custom_sink() {
        let dir = tempfile::tempdir().unwrap();
        let mut scene = animated_scene();
        let mut sink = VecDocumentSink::new();

        let document = driver(dir.path())
            .export_frame_to(&mut scene, Some(2), &mut sink)
            .unwrap();

        assert_eq!(document.lines(), sink.lines());
        assert!(!dir.path().join("blender_export2.toml").exists());
    }
}
