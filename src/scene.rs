//! Retained-mode scene graph
//!
//! A [`Scene`] owns a tree of [`SceneNode`]s. Children are owned by value,
//! so removing a node drops its whole subtree. Lookups walk the tree
//! depth-first in pre-order and stop at the first match.

use glam::{EulerRot, Mat4, Quat, Vec3};

use crate::error::{Result, SceneError};
use crate::math::hex_to_rgb;
use crate::primitives::{Geometry, LightProperties, Material};

/// Local transform; rotation is XYZ Euler angles in radians
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Vec3::ZERO,
        scale: Vec3::ONE,
    };

    /// Matrix mapping local coordinates into the parent's space
    pub fn matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z);
        Mat4::from_scale_rotation_translation(self.scale, rotation, self.position)
    }

    pub fn is_finite(&self) -> bool {
        self.position.is_finite() && self.rotation.is_finite() && self.scale.is_finite()
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// One entity of the scene: a group, a mesh, or a light
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneNode {
    pub name: Option<String>,
    pub transform: Transform,
    pub geometry: Option<Geometry>,
    pub material: Option<Material>,
    pub light: Option<LightProperties>,
    children: Vec<SceneNode>,
}

impl SceneNode {
    /// Empty node used purely to group children
    pub fn group() -> Self {
        Self::default()
    }

    pub fn mesh(geometry: Geometry, material: Material) -> Self {
        Self {
            geometry: Some(geometry),
            material: Some(material),
            ..Self::default()
        }
    }

    pub fn light(light: LightProperties) -> Self {
        Self {
            light: Some(light),
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: Vec3) -> Self {
        self.transform.rotation = rotation;
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Append `child` after any existing children
    pub fn add_child(&mut self, child: SceneNode) -> &mut SceneNode {
        self.children.push(child);
        let last = self.children.len() - 1;
        &mut self.children[last]
    }

    pub fn children(&self) -> &[SceneNode] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [SceneNode] {
        &mut self.children
    }

    /// First node named `name` in pre-order, starting with `self`
    pub fn find_by_name(&self, name: &str) -> Option<&SceneNode> {
        if self.name() == Some(name) {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find_by_name(name))
    }

    pub fn find_by_name_mut(&mut self, name: &str) -> Option<&mut SceneNode> {
        if self.name() == Some(name) {
            return Some(self);
        }
        self.children
            .iter_mut()
            .find_map(|child| child.find_by_name_mut(name))
    }

    /// Visit `self` then every descendant, parents before children
    pub fn traverse<F: FnMut(&SceneNode)>(&self, visit: &mut F) {
        visit(self);
        for child in &self.children {
            child.traverse(visit);
        }
    }

    pub fn traverse_mut<F: FnMut(&mut SceneNode)>(&mut self, visit: &mut F) {
        visit(self);
        for child in &mut self.children {
            child.traverse_mut(visit);
        }
    }

    /// Pre-order walk handing each node its world matrix
    pub fn visit_world<F: FnMut(&SceneNode, Mat4)>(&self, parent: Mat4, visit: &mut F) {
        let world = parent * self.transform.matrix();
        visit(self, world);
        for child in &self.children {
            child.visit_world(world, visit);
        }
    }

    /// Number of nodes in this subtree, `self` included
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(SceneNode::count).sum::<usize>()
    }
}

/// Exponential-squared distance fog
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fog {
    pub color: u32,
    pub density: f32,
}

impl Fog {
    pub fn new(color: u32, density: f32) -> Self {
        Self { color, density }
    }

    /// Share of the fog colour at `distance` from the eye, in [0, 1]
    pub fn factor(&self, distance: f32) -> f32 {
        let d = self.density * distance;
        (1.0 - (-d * d).exp()).clamp(0.0, 1.0)
    }

    pub fn rgb(&self) -> [f32; 3] {
        hex_to_rgb(self.color)
    }
}

/// Root container owning every node of a scene
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    root: SceneNode,
    pub fog: Option<Fog>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a top-level node
    pub fn add(&mut self, node: SceneNode) -> &mut SceneNode {
        self.root.add_child(node)
    }

    pub fn root(&self) -> &SceneNode {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut SceneNode {
        &mut self.root
    }

    pub fn children(&self) -> &[SceneNode] {
        self.root.children()
    }

    pub fn find_by_name(&self, name: &str) -> Option<&SceneNode> {
        self.root.find_by_name(name)
    }

    pub fn find_by_name_mut(&mut self, name: &str) -> Option<&mut SceneNode> {
        self.root.find_by_name_mut(name)
    }

    /// Like [`Scene::find_by_name`], but a miss is an error
    pub fn get_by_name(&self, name: &str) -> Result<&SceneNode> {
        self.find_by_name(name)
            .ok_or_else(|| SceneError::NodeNotFound(name.to_string()))
    }

    pub fn get_by_name_mut(&mut self, name: &str) -> Result<&mut SceneNode> {
        self.find_by_name_mut(name)
            .ok_or_else(|| SceneError::NodeNotFound(name.to_string()))
    }

    /// Visit the root and all of its descendants in pre-order
    pub fn traverse<F: FnMut(&SceneNode)>(&self, mut visit: F) {
        self.root.traverse(&mut visit);
    }

    pub fn traverse_mut<F: FnMut(&mut SceneNode)>(&mut self, mut visit: F) {
        self.root.traverse_mut(&mut visit);
    }

    pub fn visit_world<F: FnMut(&SceneNode, Mat4)>(&self, mut visit: F) {
        self.root.visit_world(Mat4::IDENTITY, &mut visit);
    }

    /// Number of nodes including the root
    pub fn node_count(&self) -> usize {
        self.root.count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_identity_transform() {
        let transform = Transform::default();
        assert_eq!(transform.scale, Vec3::ONE);
        assert_eq!(transform.matrix(), Mat4::IDENTITY);
        assert!(transform.is_finite());
    }

    #[test]
    fn test_rotation_about_x_lays_local_y_along_z() {
        let transform = Transform {
            rotation: Vec3::new(FRAC_PI_2, 0.0, 0.0),
            ..Transform::default()
        };
        let mapped = transform.matrix().transform_vector3(Vec3::Y);
        assert!((mapped - Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_child_inherits_parent_translation() {
        let mut parent = SceneNode::group().with_position(Vec3::new(1.0, 0.0, 0.0));
        parent.add_child(SceneNode::group().with_name("child").with_position(Vec3::new(0.0, 2.0, 0.0)));

        let mut world_of_child = None;
        parent.visit_world(Mat4::IDENTITY, &mut |node, world| {
            if node.name() == Some("child") {
                world_of_child = Some(world.transform_point3(Vec3::ZERO));
            }
        });
        assert_eq!(world_of_child, Some(Vec3::new(1.0, 2.0, 0.0)));
    }

    #[test]
    fn test_add_child_returns_inserted_node() {
        let mut scene = Scene::new();
        scene.add(SceneNode::group()).transform.position.y = 3.0;
        assert_eq!(scene.children()[0].transform.position.y, 3.0);
    }

    #[test]
    fn test_get_by_name_miss_is_error() {
        let scene = Scene::new();
        assert_eq!(
            scene.get_by_name("ghost").unwrap_err(),
            SceneError::NodeNotFound("ghost".into())
        );
    }

    #[test]
    fn test_fog_factor_grows_with_distance() {
        let fog = Fog::new(0xffffff, 0.2);
        assert_eq!(fog.factor(0.0), 0.0);
        assert!(fog.factor(1.0) < fog.factor(5.0));
        assert!(fog.factor(1000.0) > 0.99);
    }

    #[test]
    fn test_node_count_includes_root() {
        let mut scene = Scene::new();
        scene.add(SceneNode::group()).add_child(SceneNode::group());
        assert_eq!(scene.node_count(), 3);
    }
}
