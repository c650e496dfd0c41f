use glam::Vec3;

/// Closest hit distances below this are treated as self-intersection
const MIN_HIT: f32 = 1e-4;

/// Slab test against an axis-aligned box, returns -1.0 on a miss
pub fn intersect_aabb(ray_origin: Vec3, ray_dir: Vec3, box_min: Vec3, box_max: Vec3) -> f32 {
    const EPSILON: f32 = 1e-8;

    // Near-zero direction components are clamped so the slab bounds go to +-infinity
    let inv_dir = Vec3::new(
        if ray_dir.x.abs() < EPSILON { 1.0 / EPSILON.copysign(ray_dir.x) } else { 1.0 / ray_dir.x },
        if ray_dir.y.abs() < EPSILON { 1.0 / EPSILON.copysign(ray_dir.y) } else { 1.0 / ray_dir.y },
        if ray_dir.z.abs() < EPSILON { 1.0 / EPSILON.copysign(ray_dir.z) } else { 1.0 / ray_dir.z },
    );

    let t_min = (box_min - ray_origin) * inv_dir;
    let t_max = (box_max - ray_origin) * inv_dir;

    let t1 = t_min.min(t_max);
    let t2 = t_min.max(t_max);

    let t_near = t1.x.max(t1.y).max(t1.z);
    let t_far = t2.x.min(t2.y).min(t2.z);

    if t_near > t_far || t_far < 0.0 {
        return -1.0;
    }

    if t_near < 0.0 {
        if t_far > 0.001 {
            t_far
        } else {
            -1.0
        }
    } else {
        t_near
    }
}

/// Ray/sphere test; `ray_dir` need not be normalized
pub fn intersect_sphere(ray_origin: Vec3, ray_dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray_origin - center;
    let a = ray_dir.dot(ray_dir);
    let half_b = oc.dot(ray_dir);
    let c = oc.dot(oc) - radius * radius;

    let discriminant = half_b * half_b - a * c;
    if discriminant < 0.0 {
        return None;
    }

    let sqrt_d = discriminant.sqrt();
    let near = (-half_b - sqrt_d) / a;
    if near > MIN_HIT {
        return Some(near);
    }

    let far = (-half_b + sqrt_d) / a;
    (far > MIN_HIT).then_some(far)
}

/// Ray against the rectangle `|x| <= half_width, |y| <= half_height` on z = 0
pub fn intersect_xy_rect(ray_origin: Vec3, ray_dir: Vec3, half_width: f32, half_height: f32) -> Option<f32> {
    if ray_dir.z.abs() < 1e-8 {
        return None;
    }

    let t = -ray_origin.z / ray_dir.z;
    if t <= MIN_HIT {
        return None;
    }

    let hit = ray_origin + ray_dir * t;
    (hit.x.abs() <= half_width && hit.y.abs() <= half_height).then_some(t)
}
