//! Constructors for the renderable building blocks of a scene
//!
//! Each constructor validates its numeric input and returns a fresh
//! [`SceneNode`] with an identity transform, so callers position it
//! afterwards.

use glam::Vec3;

use crate::error::{Result, SceneError};
use crate::math::{hex_to_rgb, AABB};
use crate::scene::SceneNode;

/// Colour of the default box material
pub const BOX_COLOR: u32 = 0xf7786b;
/// Colour of the default plane material
pub const PLANE_COLOR: u32 = 0xf7cac9;
/// Colour of light markers and lights
pub const WHITE: u32 = 0xffffff;

/// Shape of a mesh node, in local units
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    /// Axis-aligned box centred on the local origin
    Box { width: f32, height: f32, depth: f32 },
    /// Rectangle in the local XY plane; `depth` runs along local Y
    Plane { width: f32, depth: f32 },
    /// Sphere centred on the local origin
    Sphere {
        radius: f32,
        latitude_segments: u32,
        longitude_segments: u32,
    },
}

impl Geometry {
    /// Local-space bounding box
    pub fn bounds(&self) -> AABB {
        match *self {
            Geometry::Box { width, height, depth } => AABB::centered(Vec3::new(width, height, depth)),
            Geometry::Plane { width, depth } => AABB::centered(Vec3::new(width, depth, 0.0)),
            Geometry::Sphere { radius, .. } => AABB::centered(Vec3::splat(radius * 2.0)),
        }
    }
}

/// Shading model of a material
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shading {
    /// Flat colour, ignores lights
    Basic,
    /// Diffuse plus specular response to the scene's lights
    Phong,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// 0xRRGGBB
    pub color: u32,
    pub shading: Shading,
    /// Visible from both faces; only meaningful for planes
    pub double_sided: bool,
}

impl Material {
    pub fn basic(color: u32) -> Self {
        Self {
            color,
            shading: Shading::Basic,
            double_sided: false,
        }
    }

    pub fn phong(color: u32) -> Self {
        Self {
            color,
            shading: Shading::Phong,
            double_sided: false,
        }
    }

    pub fn double_sided(mut self) -> Self {
        self.double_sided = true;
        self
    }

    pub fn is_lit(&self) -> bool {
        self.shading == Shading::Phong
    }

    pub fn rgb(&self) -> [f32; 3] {
        hex_to_rgb(self.color)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightKind {
    /// Emits from the node's world position in all directions
    Point,
    /// Uniform term added to every lit surface
    Ambient,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightProperties {
    pub kind: LightKind,
    pub color: u32,
    pub intensity: f32,
}

impl LightProperties {
    pub fn rgb(&self) -> [f32; 3] {
        hex_to_rgb(self.color)
    }
}

fn positive(parameter: &'static str, value: f32) -> Result<f32> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SceneError::invalid(parameter, value))
    }
}

fn non_negative(parameter: &'static str, value: f32) -> Result<f32> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(SceneError::invalid(parameter, value))
    }
}

fn at_least(parameter: &'static str, value: u32, min: u32) -> Result<u32> {
    if value >= min {
        Ok(value)
    } else {
        Err(SceneError::invalid(parameter, value))
    }
}

fn validate_material(material: Material) -> Result<Material> {
    if material.color > WHITE {
        return Err(SceneError::invalid("color", format!("{:#x}", material.color)));
    }
    Ok(material)
}

/// Unlit box of the default colour
pub fn make_box(width: f32, height: f32, depth: f32) -> Result<SceneNode> {
    make_box_with(width, height, depth, Material::basic(BOX_COLOR))
}

/// Box with a caller-chosen material, e.g. `Material::phong` for a lit box
pub fn make_box_with(width: f32, height: f32, depth: f32, material: Material) -> Result<SceneNode> {
    let geometry = Geometry::Box {
        width: positive("width", width)?,
        height: positive("height", height)?,
        depth: positive("depth", depth)?,
    };
    Ok(SceneNode::mesh(geometry, validate_material(material)?))
}

/// Double-sided unlit plane of the default colour
pub fn make_plane(width: f32, depth: f32) -> Result<SceneNode> {
    make_plane_with(width, depth, Material::basic(PLANE_COLOR))
}

/// Plane with a caller-chosen material; always forced double-sided
pub fn make_plane_with(width: f32, depth: f32, material: Material) -> Result<SceneNode> {
    let geometry = Geometry::Plane {
        width: positive("width", width)?,
        depth: positive("depth", depth)?,
    };
    Ok(SceneNode::mesh(geometry, validate_material(material)?.double_sided()))
}

/// Unlit white sphere, used to mark where a light sits
pub fn make_sphere(radius: f32, latitude_segments: u32, longitude_segments: u32) -> Result<SceneNode> {
    let geometry = Geometry::Sphere {
        radius: positive("radius", radius)?,
        latitude_segments: at_least("latitude segments", latitude_segments, 2)?,
        longitude_segments: at_least("longitude segments", longitude_segments, 3)?,
    };
    Ok(SceneNode::mesh(geometry, Material::basic(WHITE)))
}

/// White point light without geometry
pub fn make_point_light(intensity: f32) -> Result<SceneNode> {
    Ok(SceneNode::light(LightProperties {
        kind: LightKind::Point,
        color: WHITE,
        intensity: non_negative("intensity", intensity)?,
    }))
}

/// White ambient light without geometry
pub fn make_ambient_light(intensity: f32) -> Result<SceneNode> {
    Ok(SceneNode::light(LightProperties {
        kind: LightKind::Ambient,
        color: WHITE,
        intensity: non_negative("intensity", intensity)?,
    }))
}
