//! Draws a [`Scene`] as seen from a [`PerspectiveCamera`]
//!
//! [`SoftwareRenderer`] casts one ray per pixel against every mesh in the
//! scene and shades the closest hit. The result lands in a [`Framebuffer`]
//! that the windowed renderer uploads to the GPU, or that tests inspect
//! directly.

use glam::{Mat3, Mat4, Vec3};

use crate::camera::PerspectiveCamera;
use crate::core::DisplayContext;
use crate::error::{Result, SceneError};
use crate::math::{hex_to_rgb, intersect_aabb, intersect_sphere, intersect_xy_rect, mix_rgb, rgb_to_rgba8};
use crate::primitives::{Geometry, LightKind, Material, Shading};
use crate::scene::Scene;

/// Blinn-Phong exponent of lit materials
const SHININESS: f32 = 30.0;
/// Specular tint of lit materials (0x111111)
const SPECULAR: f32 = 17.0 / 255.0;

/// Draws scenes; the frame driver calls `render` once per tick
pub trait Renderer {
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<()>;

    /// Colour used where no geometry is hit, as 0xRRGGBB
    fn clear_color(&self) -> u32;

    fn set_clear_color(&mut self, color: u32);
}

/// RGBA8 pixel buffer, row 0 at the top
#[derive(Debug, Clone, PartialEq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
}

impl Framebuffer {
    pub fn new(viewport: DisplayContext) -> Self {
        Self {
            width: viewport.width,
            height: viewport.height,
            pixels: vec![[0, 0, 0, 255]; viewport.pixel_count()],
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Tightly packed RGBA bytes, ready for a texture upload
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    fn fill(&mut self, pixel: [u8; 4]) {
        self.pixels.fill(pixel);
    }
}

/// A mesh flattened into world space for one frame
struct Drawable {
    inverse: Mat4,
    normal_matrix: Mat3,
    geometry: Geometry,
    material: Material,
}

struct Light {
    kind: LightKind,
    position: Vec3,
    /// Colour premultiplied by intensity
    radiance: [f32; 3],
}

struct Hit {
    distance: f32,
    normal: Vec3,
    material: Material,
}

impl Drawable {
    fn intersect(&self, origin: Vec3, dir: Vec3) -> Option<Hit> {
        // dir stays unnormalized in local space so t is still a world distance
        let local_origin = self.inverse.transform_point3(origin);
        let local_dir = self.inverse.transform_vector3(dir);

        let (t, local_normal) = match self.geometry {
            Geometry::Box { .. } => {
                let bounds = self.geometry.bounds();
                let t = intersect_aabb(local_origin, local_dir, bounds.min, bounds.max);
                if t < 0.0 {
                    return None;
                }
                let p = (local_origin + local_dir * t) / bounds.half_size();
                let normal = if p.x.abs() >= p.y.abs() && p.x.abs() >= p.z.abs() {
                    Vec3::X * p.x.signum()
                } else if p.y.abs() >= p.z.abs() {
                    Vec3::Y * p.y.signum()
                } else {
                    Vec3::Z * p.z.signum()
                };
                (t, normal)
            }
            Geometry::Plane { width, depth } => {
                let t = intersect_xy_rect(local_origin, local_dir, width * 0.5, depth * 0.5)?;
                (t, Vec3::Z)
            }
            Geometry::Sphere { radius, .. } => {
                let t = intersect_sphere(local_origin, local_dir, Vec3::ZERO, radius)?;
                (t, (local_origin + local_dir * t) / radius)
            }
        };

        let mut normal = (self.normal_matrix * local_normal).normalize_or_zero();
        if normal.dot(dir) > 0.0 {
            if !self.material.double_sided && matches!(self.geometry, Geometry::Plane { .. }) {
                return None;
            }
            normal = -normal;
        }

        Some(Hit {
            distance: t,
            normal,
            material: self.material,
        })
    }
}

/// CPU ray caster writing into a [`Framebuffer`]
pub struct SoftwareRenderer {
    viewport: DisplayContext,
    clear_color: u32,
    framebuffer: Framebuffer,
    frames_drawn: u64,
}

impl SoftwareRenderer {
    pub fn new(viewport: DisplayContext, clear_color: u32) -> Self {
        Self {
            viewport,
            clear_color,
            framebuffer: Framebuffer::new(viewport),
            frames_drawn: 0,
        }
    }

    pub fn viewport(&self) -> DisplayContext {
        self.viewport
    }

    pub fn framebuffer(&self) -> &Framebuffer {
        &self.framebuffer
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames_drawn
    }

    fn collect(scene: &Scene) -> Result<(Vec<Drawable>, Vec<Light>)> {
        let mut drawables = Vec::new();
        let mut lights = Vec::new();
        let mut invalid = None;

        scene.visit_world(|node, world| {
            if !node.transform.is_finite() {
                invalid.get_or_insert_with(|| node.name().unwrap_or("<unnamed>").to_string());
                return;
            }

            if let Some(light) = node.light {
                let rgb = light.rgb();
                lights.push(Light {
                    kind: light.kind,
                    position: world.transform_point3(Vec3::ZERO),
                    radiance: rgb.map(|c| c * light.intensity),
                });
            }

            if let (Some(geometry), Some(material)) = (node.geometry, node.material) {
                // Zero scale collapses the mesh; nothing to hit
                if world.determinant().abs() <= f32::EPSILON {
                    return;
                }
                let inverse = world.inverse();
                drawables.push(Drawable {
                    inverse,
                    normal_matrix: Mat3::from_mat4(inverse).transpose(),
                    geometry,
                    material,
                });
            }
        });

        match invalid {
            Some(name) => Err(SceneError::Render(format!("non-finite transform on node '{}'", name))),
            None => Ok((drawables, lights)),
        }
    }

    fn shade(hit: &Hit, point: Vec3, view_dir: Vec3, lights: &[Light]) -> [f32; 3] {
        let base = hit.material.rgb();
        if hit.material.shading == Shading::Basic {
            return base;
        }

        let mut diffuse = [0.0f32; 3];
        let mut specular = [0.0f32; 3];

        for light in lights {
            let (weight, highlight) = match light.kind {
                LightKind::Ambient => (1.0, 0.0),
                LightKind::Point => {
                    let Some(to_light) = (light.position - point).try_normalize() else {
                        continue;
                    };
                    let n_dot_l = hit.normal.dot(to_light).max(0.0);
                    let half = (to_light - view_dir).normalize_or_zero();
                    let highlight = if n_dot_l > 0.0 {
                        hit.normal.dot(half).max(0.0).powf(SHININESS) * SPECULAR
                    } else {
                        0.0
                    };
                    (n_dot_l, highlight)
                }
            };

            for c in 0..3 {
                diffuse[c] += light.radiance[c] * weight;
                specular[c] += light.radiance[c] * highlight;
            }
        }

        [
            base[0] * diffuse[0] + specular[0],
            base[1] * diffuse[1] + specular[1],
            base[2] * diffuse[2] + specular[2],
        ]
    }
}

impl Renderer for SoftwareRenderer {
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<()> {
        let (drawables, lights) = Self::collect(scene)?;
        let background = rgb_to_rgba8(hex_to_rgb(self.clear_color));
        self.framebuffer.fill(background);

        if !drawables.is_empty() {
            let width = self.viewport.width;
            for y in 0..self.viewport.height {
                for x in 0..width {
                    let (ndc_x, ndc_y) = self.viewport.pixel_to_ndc(x, y);
                    let (origin, dir) = camera.primary_ray(ndc_x, ndc_y);

                    let closest = drawables
                        .iter()
                        .filter_map(|d| d.intersect(origin, dir))
                        .filter(|hit| hit.distance >= camera.near && hit.distance <= camera.far)
                        .min_by(|a, b| a.distance.total_cmp(&b.distance));

                    let Some(hit) = closest else {
                        continue;
                    };

                    let point = origin + dir * hit.distance;
                    let mut color = Self::shade(&hit, point, dir, &lights);
                    if let Some(fog) = scene.fog {
                        color = mix_rgb(color, fog.rgb(), fog.factor(hit.distance));
                    }
                    self.framebuffer.pixels[(y * width + x) as usize] = rgb_to_rgba8(color);
                }
            }
        }

        self.frames_drawn += 1;
        Ok(())
    }

    fn clear_color(&self) -> u32 {
        self.clear_color
    }

    fn set_clear_color(&mut self, color: u32) {
        self.clear_color = color;
    }
}
