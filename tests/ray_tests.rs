use glam::Vec3;
use mesh_scenes::math::{intersect_aabb, intersect_sphere, intersect_xy_rect, AABB};

#[cfg(test)]
mod ray_intersection_tests {
    use super::*;

    #[test]
    fn test_ray_hits_aabb_from_outside() {
        let ray_origin = Vec3::new(0.0, 0.0, 0.0);
        let ray_dir = Vec3::new(1.0, 0.0, 0.0);
        let box_min = Vec3::new(5.0, -1.0, -1.0);
        let box_max = Vec3::new(10.0, 1.0, 1.0);

        let t = intersect_aabb(ray_origin, ray_dir, box_min, box_max);

        assert!((t - 5.0).abs() < 0.001, "Hit distance should be ~5.0, got {}", t);
    }

    #[test]
    fn test_ray_pointing_away_from_aabb() {
        let t = intersect_aabb(
            Vec3::ZERO,
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(5.0, -1.0, -1.0),
            Vec3::new(10.0, 1.0, 1.0),
        );

        assert_eq!(t, -1.0, "Ray pointing away should not hit AABB");
    }

    #[test]
    fn test_ray_hits_centered_box_corner() {
        let bounds = AABB::centered(Vec3::ONE);
        let ray_origin = Vec3::splat(-5.0);
        let ray_dir = (bounds.min - ray_origin).normalize();

        let t = intersect_aabb(ray_origin, ray_dir, bounds.min, bounds.max);

        let hit_point = ray_origin + ray_dir * t;
        assert!(
            (hit_point - bounds.min).length() < 0.001,
            "Hit point should be at the min corner, got {:?}",
            hit_point
        );
    }

    #[test]
    fn test_unnormalized_direction_scales_distance() {
        // Half-length direction doubles the parametric distance
        let t = intersect_sphere(Vec3::new(0.0, 0.0, 5.0), Vec3::new(0.0, 0.0, -0.5), Vec3::ZERO, 1.0).unwrap();
        assert!((t - 8.0).abs() < 0.001, "got {}", t);
    }

    #[test]
    fn test_sphere_from_inside_returns_exit() {
        let t = intersect_sphere(Vec3::ZERO, Vec3::X, Vec3::ZERO, 2.0).unwrap();
        assert!((t - 2.0).abs() < 0.001);
    }

    #[test]
    fn test_rect_bounds_are_half_extents() {
        let origin = Vec3::new(1.9, 0.0, 3.0);
        assert!(intersect_xy_rect(origin, Vec3::NEG_Z, 2.0, 2.0).is_some());

        let outside = Vec3::new(2.1, 0.0, 3.0);
        assert!(intersect_xy_rect(outside, Vec3::NEG_Z, 2.0, 2.0).is_none());
    }

    #[test]
    fn test_rect_parallel_ray_misses() {
        assert!(intersect_xy_rect(Vec3::new(0.0, 0.0, 1.0), Vec3::X, 2.0, 2.0).is_none());
    }
}
