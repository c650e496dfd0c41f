use crate::error::{Result, SceneError};

/// Viewport the scene is rendered into, fixed at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayContext {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl DisplayContext {
    /// Create new display context
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Create a display context, rejecting empty dimensions
    pub fn validated(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(SceneError::InvalidViewport { width, height });
        }
        Ok(Self::new(width, height))
    }

    /// Total number of pixels
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Total size in bytes for RGBA buffer
    pub fn buffer_size(&self) -> usize {
        self.pixel_count() * 4
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Normalized device coordinates of a pixel centre, +Y up
    pub fn pixel_to_ndc(&self, x: u32, y: u32) -> (f32, f32) {
        let u = (x as f32 + 0.5) / self.width as f32;
        let v = (y as f32 + 0.5) / self.height as f32;
        (u * 2.0 - 1.0, 1.0 - v * 2.0)
    }
}
