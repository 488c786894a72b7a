//! Page information needed by the geometry pipeline.

use crate::geometry::Rect;

/// A page as seen by appearance regeneration.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Page {
    pub media_box: Rect,
    /// Stored `/Rotate` value in clockwise degrees.
    pub rotation: i32,
}

impl Page {
    pub fn new(media_box: Rect, rotation: i32) -> Self {
        Self {
            media_box,
            rotation,
        }
    }

    /// A US Letter page without rotation.
    pub fn letter() -> Self {
        Self::new(Rect::new(0.0, 0.0, 612.0, 792.0), 0)
    }
}
