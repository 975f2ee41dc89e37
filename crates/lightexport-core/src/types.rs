//! Common types used across lightexport
//!
//! This module provides shared type definitions used by multiple crates.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub use glam::{Mat4, Quat, Vec3, Vec4};

/// Index of an object inside a scene, stable for the lifetime of the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub usize);

impl ObjectId {
    /// Create a new object ID
    pub fn new(id: usize) -> Self {
        Self(id)
    }

    /// Get the raw index
    pub fn index(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<usize> for ObjectId {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

/// Inclusive animation frame range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameRange {
    pub start: i32,
    pub end: i32,
}

impl FrameRange {
    /// Create a validated frame range
    pub fn new(start: i32, end: i32) -> Result<Self> {
        let range = Self { start, end };
        range.validate()?;
        Ok(range)
    }

    /// A range covering a single frame
    pub fn single(frame: i32) -> Self {
        Self { start: frame, end: frame }
    }

    /// Reject ranges whose start lies after their end
    pub fn validate(&self) -> Result<()> {
        if self.start > self.end {
            return Err(Error::InvalidFrameRange {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }

    /// Number of frames in the range
    pub fn len(&self) -> usize {
        if self.start > self.end {
            0
        } else {
            (i64::from(self.end) - i64::from(self.start) + 1) as usize
        }
    }

    /// True when the range holds no frames
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Frames in ascending order
    pub fn frames(&self) -> std::ops::RangeInclusive<i32> {
        self.start..=self.end
    }
}

impl Default for FrameRange {
    fn default() -> Self {
        Self { start: 1, end: 250 }
    }
}

impl std::fmt::Display for FrameRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..={}", self.start, self.end)
    }
}

/// Output render resolution in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self { width: 1920, height: 1080 }
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_range_len() {
        assert_eq!(FrameRange::single(7).len(), 1);
        assert_eq!(FrameRange { start: 1, end: 3 }.len(), 3);
        assert_eq!(FrameRange { start: -2, end: 2 }.len(), 5);
        assert!(FrameRange { start: 4, end: 3 }.is_empty());
    }

    #[test]
    fn test_frame_range_frames_ascending() {
        let frames: Vec<_> = FrameRange { start: 1, end: 3 }.frames().collect();
        assert_eq!(frames, vec![1, 2, 3]);
    }

    #[test]
    fn test_frame_range_validation() {
        assert!(FrameRange::new(1, 250).is_ok());
        assert!(matches!(
            FrameRange::new(10, 2),
            Err(Error::InvalidFrameRange { start: 10, end: 2 })
        ));
    }

    #[test]
    fn test_object_id_display() {
        assert_eq!(ObjectId::new(4).to_string(), "#4");
        assert_eq!(ObjectId::from(2).index(), 2);
    }
}
