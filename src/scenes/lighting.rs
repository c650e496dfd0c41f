use std::f32::consts::FRAC_PI_2;

use glam::Vec3;

use crate::camera::PerspectiveCamera;
use crate::core::DisplayContext;
use crate::driver::FrameMutation;
use crate::error::Result;
use crate::gui::{GuiPanel, PropertyPath};
use crate::primitives::{
    make_ambient_light, make_box_with, make_plane_with, make_point_light, make_sphere, Material, BOX_COLOR,
    PLANE_COLOR,
};
use crate::scene::{Fog, Scene};

use super::{rest_on_ground, SceneSetup, LIGHT_NAME, PLANE_NAME};

const FOG_COLOR: u32 = 0xffffff;
const FOG_DENSITY: f32 = 0.2;

/// Phong box on a lit plane, a movable point light with a marker sphere,
/// white fog, orbit controls and sliders for the light
pub fn create_lighting_scene(viewport: &DisplayContext, spin_rate: f32) -> Result<SceneSetup> {
    let mut cube = make_box_with(1.0, 1.0, 1.0, Material::phong(BOX_COLOR))?;
    rest_on_ground(&mut cube);

    let mut plane = make_plane_with(20.0, 20.0, Material::phong(PLANE_COLOR))?.with_name(PLANE_NAME);
    plane.transform.rotation.x = FRAC_PI_2;

    let mut light = make_point_light(1.0)?.with_name(LIGHT_NAME);
    light.transform.position.y = 2.0;
    light.add_child(make_sphere(0.05, 24, 24)?);

    let mut scene = Scene::new();
    scene.fog = Some(Fog::new(FOG_COLOR, FOG_DENSITY));
    scene.add(plane);
    scene.add(cube);
    scene.add(light);
    scene.add(make_ambient_light(0.2)?);

    let mut camera = PerspectiveCamera::for_viewport(viewport).with_position(Vec3::new(1.0, 2.0, 5.0));
    camera.look_at(Vec3::ZERO);

    let mut gui = GuiPanel::new();
    gui.add_control(LIGHT_NAME, PropertyPath::Intensity, 0.0, 10.0)?;
    gui.add_control(LIGHT_NAME, PropertyPath::PositionY, 0.0, 20.0)?;

    Ok(SceneSetup {
        mutations: vec![FrameMutation::spin(PLANE_NAME, spin_rate)],
        orbit: true,
        gui: Some(gui),
        ..SceneSetup::still(scene, camera)
    })
}
