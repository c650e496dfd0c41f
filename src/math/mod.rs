mod aabb;
mod color;
mod ray;

pub use aabb::AABB;
pub use color::{hex_to_rgb, mix_rgb, rgb_to_rgba8};
pub use ray::{intersect_aabb, intersect_sphere, intersect_xy_rect};
