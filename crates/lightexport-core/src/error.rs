//! Unified error handling for lightexport
//!
//! Every fallible export operation returns this error type. Object types the
//! exporter does not understand are skipped, so there is no variant for them.

use thiserror::Error;

/// Unified error type for all lightexport operations
#[derive(Error, Debug)]
pub enum Error {
    // ==================== I/O Errors ====================

    /// Standard I/O error (frame document or mesh path could not be written)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Scene Errors ====================

    /// Mesh object has no material, or its material has no shader node
    #[error("Object '{object}' has no material with a shader node")]
    MissingMaterial {
        object: String,
    },

    /// A recognized shader slot holds a value of the wrong type
    #[error("Shader slot {slot} ({name}): expected {expected}, found {found}")]
    SlotTypeMismatch {
        slot: usize,
        name: &'static str,
        expected: &'static str,
        found: String,
    },

    /// A recognized shader slot is absent from the parameter set
    #[error("Shader slot {slot} ({name}) is missing")]
    MissingSlot {
        slot: usize,
        name: &'static str,
    },

    /// Object id does not resolve in the scene
    #[error("Object not found: {name}")]
    ObjectNotFound {
        name: String,
    },

    /// Scene description could not be read
    #[error("Invalid scene description: {message}")]
    SceneFormat {
        message: String,
    },

    // ==================== Export Errors ====================

    /// The external mesh exporter failed
    #[error("Mesh export failed for '{object}': {message}")]
    ExternalExport {
        object: String,
        message: String,
    },

    /// Frame range with start after end
    #[error("Invalid frame range: {start}..={end}")]
    InvalidFrameRange {
        start: i32,
        end: i32,
    },

    // ==================== Configuration Errors ====================

    /// Invalid configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        message: String,
    },

    // ==================== General Errors ====================

    /// Custom error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<Error>,
    },
}

/// Result type using the unified Error
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error with additional context
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Error::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Error::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a scene format error
    pub fn scene_format(message: impl Into<String>) -> Self {
        Error::SceneFormat {
            message: message.into(),
        }
    }

    /// Strip any number of context wrappers
    pub fn root(&self) -> &Error {
        match self {
            Error::WithContext { source, .. } => source.root(),
            other => other,
        }
    }

    /// Errors caused by malformed shader data on a single object
    pub fn is_fatal_for_frame(&self) -> bool {
        matches!(
            self.root(),
            Error::MissingMaterial { .. } | Error::SlotTypeMismatch { .. } | Error::MissingSlot { .. }
        )
    }

    /// Check if this is an I/O error
    pub fn is_io(&self) -> bool {
        matches!(self.root(), Error::Io(_))
    }
}

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}
