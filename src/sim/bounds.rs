//! Container dimensions

use serde::{Deserialize, Serialize};

/// Size of the rectangular container in pixels, origin at the top-left
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    /// Measured container size, or `None` while it has no layout yet
    pub fn new(width: f32, height: f32) -> Option<Self> {
        if width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite() {
            Some(Self { width, height })
        } else {
            None
        }
    }
}
