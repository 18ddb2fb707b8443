//! Editor view slots: one free-look perspective view plus three fixed
//! orthographic views (top, left, front).
//!
//! Each slot keeps position/yaw/pitch and derives its view matrix on demand.
//! Projection matrices are cached and lazily rebuilt: any slot mutation marks
//! the projection dirty, and orthographic slots size their extent from the
//! slot's distance to the origin so zooming (`walk`) changes framing.

use glam::{Mat4, Vec3};

pub const PERSPECTIVE_FOV_Y: f32 = std::f32::consts::FRAC_PI_2;
pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ViewType {
    Perspective,
    Top,
    Left,
    Front,
}

impl ViewType {
    pub const ALL: [ViewType; 4] = [
        ViewType::Perspective,
        ViewType::Top,
        ViewType::Left,
        ViewType::Front,
    ];

    fn index(self) -> usize {
        match self {
            ViewType::Perspective => 0,
            ViewType::Top => 1,
            ViewType::Left => 2,
            ViewType::Front => 3,
        }
    }
}

/// Window-client viewport rectangle, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width,
            height,
        }
    }

    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

#[derive(Debug, Clone)]
pub struct View {
    view_type: ViewType,
    position: Vec3,
    yaw: f32,
    pitch: f32,
    projection: Mat4,
    projection_dirty: bool,
}

impl View {
    fn new(view_type: ViewType) -> Self {
        Self {
            view_type,
            position: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            projection: Mat4::IDENTITY,
            projection_dirty: true,
        }
    }

    pub fn view_type(&self) -> ViewType {
        self.view_type
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// Left-handed basis: yaw 0 / pitch 0 looks down +Z.
    pub fn forward(&self) -> Vec3 {
        let cos_pitch = self.pitch.cos();
        Vec3::new(
            cos_pitch * self.yaw.sin(),
            -self.pitch.sin(),
            cos_pitch * self.yaw.cos(),
        )
    }

    pub fn right(&self) -> Vec3 {
        Vec3::new(self.yaw.cos(), 0.0, -self.yaw.sin())
    }

    pub fn up(&self) -> Vec3 {
        self.forward().cross(self.right()).normalize_or_zero()
    }

    /// Move along the view's forward axis. Zero distance is a no-op.
    pub fn walk(&mut self, distance: f32) {
        if distance == 0.0 {
            return;
        }
        self.position += self.forward() * distance;
        self.projection_dirty = true;
    }

    /// Move along the view's right axis. Zero distance is a no-op.
    pub fn strafe(&mut self, distance: f32) {
        if distance == 0.0 {
            return;
        }
        self.position += self.right() * distance;
        self.projection_dirty = true;
    }

    /// Move along the view's up axis. Zero distance is a no-op.
    pub fn fly(&mut self, distance: f32) {
        if distance == 0.0 {
            return;
        }
        self.position += self.up() * distance;
        self.projection_dirty = true;
    }

    pub fn yaw(&mut self, radians: f32) {
        if radians == 0.0 {
            return;
        }
        self.yaw = wrap_angle(self.yaw + radians);
        self.projection_dirty = true;
    }

    pub fn pitch(&mut self, radians: f32) {
        if radians == 0.0 {
            return;
        }
        self.pitch = wrap_angle(self.pitch + radians);
        self.projection_dirty = true;
    }

    pub fn view_matrix(&self) -> Mat4 {
        let eye = self.position;
        Mat4::look_at_lh(eye, eye + self.forward(), self.up())
    }

    /// Cached projection, rebuilt when the slot has mutated since the last
    /// request. Perspective slots follow the viewport aspect; orthographic
    /// slots take their extent from the slot's distance to the origin.
    pub fn projection_matrix(&mut self, viewport: Viewport) -> Mat4 {
        if self.projection_dirty {
            self.projection = match self.view_type {
                ViewType::Perspective => Mat4::perspective_lh(
                    PERSPECTIVE_FOV_Y,
                    viewport.aspect().max(1e-4),
                    NEAR_PLANE,
                    FAR_PLANE,
                ),
                _ => {
                    let size = self.position.length().max(1e-3);
                    let half = size * 0.5;
                    Mat4::orthographic_lh(-half, half, -half, half, -FAR_PLANE, FAR_PLANE)
                }
            };
            self.projection_dirty = false;
        }
        self.projection
    }

    fn mark_projection_dirty(&mut self) {
        self.projection_dirty = true;
    }

    fn reset(&mut self) {
        self.position = Vec3::ZERO;
        self.yaw = 0.0;
        self.pitch = 0.0;
        self.projection_dirty = true;
    }
}

/// The four fixed view slots plus the active-slot marker and the shared
/// viewport rectangle.
pub struct ViewSet {
    views: [View; 4],
    active: ViewType,
    viewport: Viewport,
}

impl ViewSet {
    pub fn new(viewport: Viewport) -> Self {
        let mut set = Self {
            views: [
                View::new(ViewType::Perspective),
                View::new(ViewType::Top),
                View::new(ViewType::Left),
                View::new(ViewType::Front),
            ],
            active: ViewType::Perspective,
            viewport,
        };
        set.reset_views();
        set
    }

    /// Restore every slot to its preset pose.
    pub fn reset_views(&mut self) {
        use std::f32::consts::{FRAC_PI_2, PI};
        for view in &mut self.views {
            view.reset();
        }
        let perspective = &mut self.views[ViewType::Perspective.index()];
        perspective.fly(2.0);
        perspective.walk(-5.0);

        let top = &mut self.views[ViewType::Top.index()];
        top.fly(12.0);
        top.pitch(FRAC_PI_2);

        let left = &mut self.views[ViewType::Left.index()];
        left.yaw(FRAC_PI_2);
        left.walk(-12.0);

        let front = &mut self.views[ViewType::Front.index()];
        front.yaw(PI);
        front.walk(-12.0);
    }

    pub fn set_active(&mut self, view_type: ViewType) {
        self.active = view_type;
        self.views[view_type.index()].mark_projection_dirty();
        log::debug!("active view set to {:?}", view_type);
    }

    pub fn active_type(&self) -> ViewType {
        self.active
    }

    pub fn active(&self) -> &View {
        &self.views[self.active.index()]
    }

    pub fn active_mut(&mut self) -> &mut View {
        &mut self.views[self.active.index()]
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Called on host resize events.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        if viewport == self.viewport {
            return;
        }
        self.viewport = viewport;
        for view in &mut self.views {
            view.mark_projection_dirty();
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.active().view_matrix()
    }

    pub fn projection_matrix(&mut self) -> Mat4 {
        let viewport = self.viewport;
        self.active_mut().projection_matrix(viewport)
    }
}

fn wrap_angle(angle: f32) -> f32 {
    const TWO_PI: f32 = std::f32::consts::PI * 2.0;
    if angle.is_finite() {
        (angle + std::f32::consts::PI).rem_euclid(TWO_PI) - std::f32::consts::PI
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_look_at_origin() {
        let set = ViewSet::new(Viewport::new(800.0, 600.0));
        // Top view sits above the origin looking straight down.
        let top = &set.views[ViewType::Top.index()];
        assert!(top.position().abs_diff_eq(Vec3::new(0.0, 12.0, 0.0), 1e-4));
        assert!(top.forward().abs_diff_eq(Vec3::new(0.0, -1.0, 0.0), 1e-4));
        // Left view looks down +X, front view looks down -Z.
        let left = &set.views[ViewType::Left.index()];
        assert!(left.forward().abs_diff_eq(Vec3::X, 1e-4));
        let front = &set.views[ViewType::Front.index()];
        assert!(front.forward().abs_diff_eq(Vec3::NEG_Z, 1e-4));
    }

    #[test]
    fn switching_active_does_not_mutate_inactive_slots() {
        let mut set = ViewSet::new(Viewport::new(800.0, 600.0));
        let top_before = set.views[ViewType::Top.index()].position();
        set.set_active(ViewType::Front);
        set.active_mut().walk(3.0);
        set.set_active(ViewType::Perspective);
        assert_eq!(set.views[ViewType::Top.index()].position(), top_before);
    }

    #[test]
    fn zero_movement_is_a_noop() {
        let mut set = ViewSet::new(Viewport::new(800.0, 600.0));
        let view = set.active_mut();
        let before = view.position();
        view.walk(0.0);
        view.strafe(0.0);
        view.fly(0.0);
        view.yaw(0.0);
        view.pitch(0.0);
        assert_eq!(view.position(), before);
    }

    #[test]
    fn ortho_extent_follows_distance_from_origin() {
        let mut set = ViewSet::new(Viewport::new(800.0, 600.0));
        set.set_active(ViewType::Top);
        let near_projection = set.projection_matrix();
        set.active_mut().walk(-6.0); // back away from the origin
        let far_projection = set.projection_matrix();
        assert_ne!(near_projection, far_projection);
    }

    #[test]
    fn perspective_projection_tracks_resize() {
        let mut set = ViewSet::new(Viewport::new(800.0, 600.0));
        let before = set.projection_matrix();
        set.set_viewport(Viewport::new(400.0, 600.0));
        let after = set.projection_matrix();
        assert_ne!(before, after);
    }

    #[test]
    fn view_matrix_centers_eye() {
        let set = ViewSet::new(Viewport::new(800.0, 600.0));
        let view = set.active();
        let eye = view.position();
        let transformed = view.view_matrix().transform_point3(eye);
        assert!(transformed.abs_diff_eq(Vec3::ZERO, 1e-4));
    }
}
