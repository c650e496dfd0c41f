use crate::camera::PerspectiveCamera;
use crate::core::DisplayContext;
use crate::scene::Scene;

use super::SceneSetup;

/// An empty scene drawn once per frame; shows only the clear colour
pub fn create_empty_scene(viewport: &DisplayContext) -> SceneSetup {
    SceneSetup::still(Scene::new(), PerspectiveCamera::for_viewport(viewport))
}
