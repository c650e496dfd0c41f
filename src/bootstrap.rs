//! One-time assembly of the scene, camera and frame loop

use log::info;

use crate::camera::PerspectiveCamera;
use crate::config::AppConfig;
use crate::controls::{Controls, OrbitControls};
use crate::core::{DisplayContext, WindowContext};
use crate::driver::FrameDriver;
use crate::error::Result;
use crate::gui::GuiPanel;
use crate::scene::Scene;
use crate::scenes::{create_scene, SceneSetup};

/// Everything the frame loop reads and mutates
pub struct Stage {
    pub scene: Scene,
    pub camera: PerspectiveCamera,
    pub controls: Option<Box<dyn Controls>>,
    pub gui: Option<GuiPanel>,
}

impl Stage {
    pub fn new(scene: Scene, camera: PerspectiveCamera) -> Self {
        Self {
            scene,
            camera,
            controls: None,
            gui: None,
        }
    }

    pub fn with_controls(mut self, controls: impl Controls + 'static) -> Self {
        self.controls = Some(Box::new(controls));
        self
    }
}

/// Build the configured demo for `viewport` and start its frame driver
///
/// The returned driver is already scheduled: the first redraw has been
/// requested from `window`.
pub fn bootstrap(config: &AppConfig, viewport: DisplayContext, window: &dyn WindowContext) -> Result<(Stage, FrameDriver)> {
    let viewport = DisplayContext::validated(viewport.width, viewport.height)?;

    let SceneSetup {
        scene,
        camera,
        mutations,
        orbit,
        gui,
    } = create_scene(config, &viewport)?;

    let mut stage = Stage::new(scene, camera);
    if orbit {
        let controls = OrbitControls::from_camera(&stage.camera);
        stage = stage.with_controls(controls);
    }
    if config.show_ui {
        stage.gui = gui;
    }

    info!(
        "scene '{}' ready: {} nodes, {}x{} viewport",
        config.scene,
        stage.scene.node_count(),
        viewport.width,
        viewport.height
    );

    let mut driver = FrameDriver::new(mutations);
    driver.schedule(window);
    Ok((stage, driver))
}
