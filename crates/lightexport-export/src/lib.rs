//! lightexport export pipeline
//!
//! Turns an animated scene into one text document per frame:
//! - `coords`: axis conversion from the Z-up authoring space to Y-up
//! - `material`: layered material classification of principled shaders
//! - `camera`: camera records (fov, eye, look-at target, resolution)
//! - `document`: frame documents and the sinks they are written to
//! - `console`: the live observability channel every line is mirrored to
//! - `mesh`: the mesh exporter collaborator (OBJ writer included)
//! - `frame` / `driver`: per-frame serialization and the animation loop

pub mod camera;
pub mod console;
pub mod coords;
pub mod document;
pub mod driver;
pub mod frame;
pub mod material;
pub mod mesh;
pub mod options;

pub use camera::CameraRecord;
pub use console::{ConsoleCategory, ConsoleEntry, ConsoleSink, MemoryConsole, TracingConsole};
pub use coords::{to_export_space, to_export_space_rotation};
pub use document::{DocumentSink, FileDocumentSink, FrameDocument, MeshSection, Section, VecDocumentSink};
pub use driver::ExportDriver;
pub use frame::FrameSerializer;
pub use material::{classify, classify_object, MaterialRecord};
pub use mesh::{MeshExportError, MeshExportOptions, MeshExporter, ObjMeshExporter, RecordingMeshExporter};
pub use options::ExportOptions;
