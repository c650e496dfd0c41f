use std::f32::consts::FRAC_PI_2;

use glam::Vec3;

use crate::camera::PerspectiveCamera;
use crate::core::DisplayContext;
use crate::driver::{Axis, FrameMutation};
use crate::error::Result;
use crate::primitives::{make_box, make_plane};
use crate::scene::Scene;

use super::{rest_on_ground, SceneSetup, PLANE_NAME};

/// Box parented to a 4x4 plane; the plane spins and everything stretches on X
pub fn create_mesh_animation_scene(viewport: &DisplayContext, spin_rate: f32, grow_rate: f32) -> Result<SceneSetup> {
    let mut cube = make_box(1.0, 1.0, 1.0)?;
    rest_on_ground(&mut cube);

    let mut plane = make_plane(4.0, 4.0)?.with_name(PLANE_NAME);
    plane.transform.rotation.x = FRAC_PI_2;
    plane.add_child(cube);

    let mut scene = Scene::new();
    scene.add(plane);

    let mut camera = PerspectiveCamera::for_viewport(viewport).with_position(Vec3::new(1.0, 2.0, 5.0));
    camera.look_at(Vec3::ZERO);

    Ok(SceneSetup {
        mutations: vec![
            FrameMutation::spin(PLANE_NAME, spin_rate),
            FrameMutation::Grow { axis: Axis::X, rate: grow_rate },
        ],
        ..SceneSetup::still(scene, camera)
    })
}
