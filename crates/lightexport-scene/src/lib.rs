//! lightexport scene model
//!
//! Read/mutate view of the authoring tool's scene consumed by the exporter:
//! - `SceneContext`: the frame cursor, object enumeration and selection
//!   handshake the exporter drives explicitly
//! - `SceneObject`: typed objects (mesh, camera, other) with world transforms
//! - `PrincipledInputs`: named, type-checked access to shader slots
//! - `MemoryScene`: an in-memory scene loaded from JSON, with keyframed
//!   transforms that follow the frame cursor
//!
//! # Example
//! ```
//! use lightexport_scene::{MemoryScene, SceneContext, SceneObject};
//!
//! let mut scene = MemoryScene::new();
//! scene.add_object(SceneObject::other("Empty"));
//! scene.set_current_frame(12);
//! assert_eq!(scene.current_frame(), 12);
//! assert_eq!(scene.visible_ids().len(), 1);
//! ```

pub mod context;
pub mod memory;
pub mod object;
pub mod shader;

pub use context::SceneContext;
pub use memory::MemoryScene;
pub use object::{CameraData, Keyframe, MaterialSlot, MeshGeometry, ObjectKind, SceneObject, Transform};
pub use shader::{PrincipledInputs, PrincipledParams, ShaderNode, ShaderValue, PRINCIPLED_NODE_NAME};
