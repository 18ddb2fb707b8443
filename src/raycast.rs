//! Screen-space picking rays and the shared ray intersection helpers used by
//! actor picking and gizmo handle tests.

use crate::view::{View, Viewport};
use glam::{Mat4, Vec2, Vec3};

/// World-space picking ray. `dir` is normalized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self {
            origin,
            dir: dir.normalize_or_zero(),
        }
    }

    pub fn point_at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }
}

/// Unproject a window-client point through the active view into a world ray.
///
/// The point is unprojected at near depth (z = 0) and far depth (z = 1); the
/// near point becomes the origin and the normalized near-to-far difference the
/// direction. A degenerate viewport or singular transform falls back to the
/// view's forward axis so callers never observe NaN.
pub fn screen_to_ray(screen: Vec2, view: &mut View, viewport: Viewport) -> Ray {
    let fallback = Ray::new(view.position(), view.forward());
    if viewport.is_degenerate() {
        return fallback;
    }

    let view_matrix = view.view_matrix();
    let projection = view.projection_matrix(viewport);
    let inverse = (projection * view_matrix).inverse();
    if !inverse.is_finite() {
        return fallback;
    }

    let ndc_x = (screen.x - viewport.x) / viewport.width * 2.0 - 1.0;
    let ndc_y = 1.0 - (screen.y - viewport.y) / viewport.height * 2.0;

    let near = inverse.project_point3(Vec3::new(ndc_x, ndc_y, 0.0));
    let far = inverse.project_point3(Vec3::new(ndc_x, ndc_y, 1.0));
    let dir = far - near;
    if !near.is_finite() || !dir.is_finite() || dir.length_squared() < 1e-12 {
        return fallback;
    }

    Ray::new(near, dir)
}

/// Slab test against an axis-aligned box, returning the entry distance along
/// the ray (zero when the origin is inside).
pub fn ray_aabb(ray: &Ray, min: Vec3, max: Vec3) -> Option<f32> {
    let mut t_near = f32::NEG_INFINITY;
    let mut t_far = f32::INFINITY;

    for axis in 0..3 {
        let origin = ray.origin[axis];
        let dir = ray.dir[axis];
        if dir.abs() < 1e-8 {
            if origin < min[axis] || origin > max[axis] {
                return None;
            }
            continue;
        }
        let inv = 1.0 / dir;
        let mut t0 = (min[axis] - origin) * inv;
        let mut t1 = (max[axis] - origin) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_near = t_near.max(t0);
        t_far = t_far.min(t1);
        if t_near > t_far {
            return None;
        }
    }

    if t_far < 0.0 {
        return None;
    }
    Some(t_near.max(0.0))
}

/// Box test in the frame of `world` (a rigid transform: rotation plus
/// translation). The returned distance is along the world-space ray.
pub fn ray_obb(ray: &Ray, world: Mat4, min: Vec3, max: Vec3) -> Option<f32> {
    let inverse = world.inverse();
    if !inverse.is_finite() {
        return None;
    }
    let local = Ray {
        origin: inverse.transform_point3(ray.origin),
        dir: inverse.transform_vector3(ray.dir),
    };
    ray_aabb(&local, min, max)
}

/// Intersect with the plane through `plane_origin` with normal `plane_normal`.
pub fn ray_plane(ray: &Ray, plane_origin: Vec3, plane_normal: Vec3) -> Option<Vec3> {
    let denom = plane_normal.dot(ray.dir);
    if denom.abs() < 1e-6 {
        return None;
    }
    let t = (plane_origin - ray.origin).dot(plane_normal) / denom;
    if t < 0.0 {
        return None;
    }
    Some(ray.point_at(t))
}

pub fn ray_sphere(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let to_center = center - ray.origin;
    let projected = to_center.dot(ray.dir);
    let closest_sq = to_center.length_squared() - projected * projected;
    let radius_sq = radius * radius;
    if closest_sq > radius_sq {
        return None;
    }
    let half_chord = (radius_sq - closest_sq).sqrt();
    let t = if projected - half_chord >= 0.0 {
        projected - half_chord
    } else {
        projected + half_chord
    };
    if t < 0.0 {
        return None;
    }
    Some(t)
}
