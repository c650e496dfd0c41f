mod empty;
mod lighting;
mod mesh_animation;

pub use empty::create_empty_scene;
pub use lighting::create_lighting_scene;
pub use mesh_animation::create_mesh_animation_scene;

use crate::camera::PerspectiveCamera;
use crate::config::{AppConfig, ConfigError, SceneKind};
use crate::core::DisplayContext;
use crate::driver::FrameMutation;
use crate::error::{Result, SceneError};
use crate::gui::GuiPanel;
use crate::scene::{Scene, SceneNode};

/// Name of the plane the animated demos spin
pub const PLANE_NAME: &str = "plane-1";
/// Name of the movable point light in the lighting demo
pub const LIGHT_NAME: &str = "point-light";

/// Everything a demo contributes before the frame loop starts
pub struct SceneSetup {
    pub scene: Scene,
    pub camera: PerspectiveCamera,
    pub mutations: Vec<FrameMutation>,
    /// Attach orbit controls around the camera target
    pub orbit: bool,
    pub gui: Option<GuiPanel>,
}

impl SceneSetup {
    /// Render-only setup: no mutations, controls or panel
    pub fn still(scene: Scene, camera: PerspectiveCamera) -> Self {
        Self {
            scene,
            camera,
            mutations: Vec::new(),
            orbit: false,
            gui: None,
        }
    }
}

pub fn create_scene(config: &AppConfig, viewport: &DisplayContext) -> Result<SceneSetup> {
    config.validate().map_err(|err| match err {
        ConfigError::InvalidRate { field, value } => SceneError::invalid(field, value),
        other => SceneError::invalid("config", other),
    })?;

    match config.scene {
        SceneKind::Empty => Ok(create_empty_scene(viewport)),
        SceneKind::MeshAnimation => create_mesh_animation_scene(viewport, config.spin_rate, config.grow_rate),
        SceneKind::Lighting => create_lighting_scene(viewport, config.spin_rate),
    }
}

/// Move a mesh up by half its height so it rests on y = 0 instead of
/// straddling it
pub fn rest_on_ground(node: &mut SceneNode) {
    if let Some(geometry) = node.geometry {
        node.transform.position.y = geometry.bounds().half_size().y;
    }
}
