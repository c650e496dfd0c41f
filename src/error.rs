use thiserror::Error;

/// Errors raised while building, animating or drawing a scene
///
/// Every variant is fatal at the point of detection: callers propagate it
/// instead of falling back to default geometry or skipping a frame step.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// A primitive constructor received a non-finite or illegal value
    #[error("invalid {parameter}: {value}")]
    InvalidGeometryParameter { parameter: &'static str, value: String },

    /// A named lookup failed where the caller assumed the node exists
    #[error("no node named '{0}' in the scene")]
    NodeNotFound(String),

    /// The output surface could not be attached to its container
    #[error("cannot attach render surface to container '{container}': {reason}")]
    SurfaceAttachment { container: String, reason: String },

    /// Viewport dimensions must be positive
    #[error("invalid viewport {width}x{height}")]
    InvalidViewport { width: u32, height: u32 },

    /// A frame was ticked before the driver was scheduled
    #[error("frame driver is not scheduled")]
    NotScheduled,

    /// A GUI binding targets a property the node does not carry
    #[error("node '{node}' has no {property} property")]
    MissingProperty { node: String, property: &'static str },

    /// A GUI binding was declared with an empty or non-finite range
    #[error("invalid control range [{min}, {max}]")]
    InvalidControlRange { min: f32, max: f32 },

    /// The renderer failed to produce or present a frame
    #[error("render failed: {0}")]
    Render(String),
}

impl SceneError {
    pub(crate) fn invalid(parameter: &'static str, value: impl ToString) -> Self {
        Self::InvalidGeometryParameter {
            parameter,
            value: value.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SceneError>;
