//! Transform gizmo: the axis-handle state machine that turns mouse rays into
//! translate/rotate/scale deltas for the selected actors.
//!
//! The gizmo is Idle until a handle hit-test succeeds while the primary
//! button goes down, then Engaged until release. Engagement atomically
//! captures the ray and the anchor's transform; every following frame
//! measures the total drag against that origin and emits the incremental
//! delta since the previous frame, so snapping quantizes the whole drag
//! rather than each frame's noise.

use crate::raycast::{ray_obb, ray_plane, Ray};
use crate::transform::{snap, Transform};
use glam::{Mat3, Mat4, Quat, Vec3};

/// Default linear snap increment for translate and scale deltas.
pub const DEFAULT_SNAP_INCREMENT: f32 = 0.5;
/// Fixed angular snap increment for rotation, in degrees.
pub const ROTATE_SNAP_DEG: f32 = 15.0;

/// Length of a translate/scale axis handle, in gizmo-local units.
const AXIS_LEN: f32 = 1.0;
/// Half thickness of the axis handle boxes.
const AXIS_THICKNESS: f32 = 0.08;
/// Outer reach of the rotation ring bounding slabs.
const RING_REACH: f32 = 1.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GizmoModifier {
    Translate,
    Rotate,
    Scale,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GizmoAxis {
    X,
    Y,
    Z,
}

impl GizmoAxis {
    pub const ALL: [GizmoAxis; 3] = [GizmoAxis::X, GizmoAxis::Y, GizmoAxis::Z];

    pub fn component(self) -> usize {
        match self {
            GizmoAxis::X => 0,
            GizmoAxis::Y => 1,
            GizmoAxis::Z => 2,
        }
    }

    fn unit(self) -> Vec3 {
        match self {
            GizmoAxis::X => Vec3::X,
            GizmoAxis::Y => Vec3::Y,
            GizmoAxis::Z => Vec3::Z,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GizmoSpace {
    Local,
    World,
}

/// Incremental transform change for one frame of a drag, applied uniformly to
/// every selected actor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransformDelta {
    Translate(Vec3),
    Rotate { axis: Vec3, angle: f32, pivot: Vec3 },
    Scale { component: usize, factor: f32 },
}

impl TransformDelta {
    pub fn apply(&self, transform: &mut Transform) {
        match *self {
            TransformDelta::Translate(delta) => transform.translate(delta),
            TransformDelta::Rotate { axis, angle, pivot } => {
                let rotation = Quat::from_axis_angle(axis, angle);
                let offset = transform.position_vec3() - pivot;
                transform.set_position(pivot + rotation * offset);
                transform.set_rotation_quat(rotation * transform.rotation_quat());
            }
            TransformDelta::Scale { component, factor } => {
                transform.scale_component(component, factor);
            }
        }
    }
}

/// Data captured atomically on the Idle -> Engaged transition.
struct DragOrigin {
    ray: Ray,
    anchor: Transform,
    /// Axis frame resolved against the anchor at engagement time, so a
    /// rotation drag does not feed back into its own constraint axes.
    frame: Mat3,
    /// Total (snapped) drag already handed out as incremental deltas.
    applied: f32,
}

pub struct Gizmo {
    modifier: GizmoModifier,
    space: GizmoSpace,
    active_axis: Option<GizmoAxis>,
    snap_enabled: bool,
    snap_increment: f32,
    drag: Option<DragOrigin>,
}

impl Default for Gizmo {
    fn default() -> Self {
        Self::new()
    }
}

impl Gizmo {
    pub fn new() -> Self {
        Self {
            modifier: GizmoModifier::Translate,
            space: GizmoSpace::World,
            active_axis: None,
            snap_enabled: false,
            snap_increment: DEFAULT_SNAP_INCREMENT,
            drag: None,
        }
    }

    pub fn modifier(&self) -> GizmoModifier {
        self.modifier
    }

    pub fn space(&self) -> GizmoSpace {
        self.space
    }

    pub fn snap_enabled(&self) -> bool {
        self.snap_enabled
    }

    pub fn active_axis(&self) -> Option<GizmoAxis> {
        self.active_axis
    }

    pub fn is_engaged(&self) -> bool {
        self.drag.is_some()
    }

    /// Switch the manipulation mode. A drag in progress is force-reset first;
    /// continuing a drag across modes with a stale snapshot would corrupt it.
    pub fn set_modifier(&mut self, modifier: GizmoModifier) {
        if self.modifier == modifier {
            return;
        }
        self.reset();
        self.modifier = modifier;
    }

    /// Flip Local/World handle orientation, returning the resulting state.
    pub fn toggle_space(&mut self) -> GizmoSpace {
        self.space = match self.space {
            GizmoSpace::Local => GizmoSpace::World,
            GizmoSpace::World => GizmoSpace::Local,
        };
        self.space
    }

    /// Flip snapping, returning the resulting state.
    pub fn toggle_snapping(&mut self) -> bool {
        self.snap_enabled = !self.snap_enabled;
        self.snap_enabled
    }

    /// Back to Idle: clears the active axis and discards any drag-origin
    /// snapshot. Safe to call every frame the button is up.
    pub fn reset(&mut self) {
        if self.drag.take().is_some() {
            log::debug!("gizmo drag ended");
        }
        self.active_axis = None;
    }

    /// Hit-test the ray against the axis handles oriented for the current
    /// modifier and space, recording the hit axis for hover highlighting.
    /// Does not start a drag. When several handles intersect, the hit point
    /// nearest the ray origin wins.
    pub fn select(&mut self, ray: &Ray, anchor: &Transform) -> bool {
        if self.drag.is_some() {
            return true;
        }

        let frame = self.axis_frame(anchor);
        let world = Mat4::from_translation(anchor.position_vec3()) * Mat4::from_mat3(frame);

        let mut nearest: Option<(GizmoAxis, f32)> = None;
        for axis in GizmoAxis::ALL {
            let (min, max) = self.handle_bounds(axis);
            if let Some(distance) = ray_obb(ray, world, min, max) {
                if nearest.map_or(true, |(_, best)| distance < best) {
                    nearest = Some((axis, distance));
                }
            }
        }

        self.active_axis = nearest.map(|(axis, _)| axis);
        self.active_axis.is_some()
    }

    /// One frame of an engaged manipulation. The first call after Idle
    /// captures the drag origin; later calls return the incremental delta to
    /// apply to every selected actor this frame.
    pub fn update(&mut self, ray: &Ray, anchor: &Transform) -> Option<TransformDelta> {
        let axis = self.active_axis?;

        if self.drag.is_none() {
            let frame = self.axis_frame(anchor);
            self.drag = Some(DragOrigin {
                ray: *ray,
                anchor: *anchor,
                frame,
                applied: if self.modifier == GizmoModifier::Scale {
                    1.0
                } else {
                    0.0
                },
            });
            log::debug!("gizmo drag engaged on {:?} axis", axis);
            return None;
        }

        match self.modifier {
            GizmoModifier::Translate => self.translate_delta(ray, axis),
            GizmoModifier::Rotate => self.rotate_delta(ray, axis),
            GizmoModifier::Scale => self.scale_delta(ray, axis),
        }
    }

    fn axis_frame(&self, anchor: &Transform) -> Mat3 {
        match self.space {
            GizmoSpace::World => Mat3::IDENTITY,
            GizmoSpace::Local => anchor.basis(),
        }
    }

    /// Local-space bounding box of one axis handle under the current
    /// modifier. Translate and scale share arm-shaped boxes along the axis;
    /// rotate uses ring-reach slabs perpendicular to it.
    fn handle_bounds(&self, axis: GizmoAxis) -> (Vec3, Vec3) {
        let t = AXIS_THICKNESS;
        match self.modifier {
            GizmoModifier::Translate | GizmoModifier::Scale => match axis {
                GizmoAxis::X => (Vec3::new(0.0, -t, -t), Vec3::new(AXIS_LEN, t, t)),
                GizmoAxis::Y => (Vec3::new(-t, 0.0, -t), Vec3::new(t, AXIS_LEN, t)),
                GizmoAxis::Z => (Vec3::new(-t, -t, 0.0), Vec3::new(t, t, AXIS_LEN)),
            },
            GizmoModifier::Rotate => {
                let r = RING_REACH;
                match axis {
                    GizmoAxis::X => (Vec3::new(-t, -r, -r), Vec3::new(t, r, r)),
                    GizmoAxis::Y => (Vec3::new(-r, -t, -r), Vec3::new(r, t, r)),
                    GizmoAxis::Z => (Vec3::new(-r, -r, -t), Vec3::new(r, r, t)),
                }
            }
        }
    }

    /// Project both rays onto the drag plane that contains the constraint
    /// axis and faces the captured ray, and measure the axis component of the
    /// difference from the engagement point.
    fn linear_drag_total(&self, ray: &Ray, axis: GizmoAxis) -> Option<f32> {
        let drag = self.drag.as_ref()?;
        let axis_dir = (drag.frame * axis.unit()).normalize_or_zero();
        let pivot = drag.anchor.position_vec3();

        let normal = (drag.ray.dir - axis_dir * axis_dir.dot(drag.ray.dir)).normalize_or_zero();
        if normal.length_squared() < 1e-8 {
            return None;
        }

        let start = ray_plane(&drag.ray, pivot, normal)?;
        let current = ray_plane(ray, pivot, normal)?;
        Some((current - start).dot(axis_dir))
    }

    fn translate_delta(&mut self, ray: &Ray, axis: GizmoAxis) -> Option<TransformDelta> {
        let mut total = self.linear_drag_total(ray, axis)?;
        if self.snap_enabled {
            total = snap(total, self.snap_increment);
        }

        let drag = self.drag.as_mut()?;
        let step = total - drag.applied;
        if step == 0.0 {
            return None;
        }
        drag.applied = total;
        let axis_dir = (drag.frame * axis.unit()).normalize_or_zero();
        Some(TransformDelta::Translate(axis_dir * step))
    }

    fn rotate_delta(&mut self, ray: &Ray, axis: GizmoAxis) -> Option<TransformDelta> {
        let drag = self.drag.as_ref()?;
        let axis_dir = (drag.frame * axis.unit()).normalize_or_zero();
        let pivot = drag.anchor.position_vec3();

        let start = ray_plane(&drag.ray, pivot, axis_dir)? - pivot;
        let current = ray_plane(ray, pivot, axis_dir)? - pivot;
        if start.length_squared() < 1e-8 || current.length_squared() < 1e-8 {
            return None;
        }

        let mut total = start.cross(current).dot(axis_dir).atan2(start.dot(current));
        if self.snap_enabled {
            total = snap(total, ROTATE_SNAP_DEG.to_radians());
        }

        let drag = self.drag.as_mut()?;
        let step = total - drag.applied;
        if step == 0.0 {
            return None;
        }
        drag.applied = total;
        Some(TransformDelta::Rotate {
            axis: axis_dir,
            angle: step,
            pivot,
        })
    }

    fn scale_delta(&mut self, ray: &Ray, axis: GizmoAxis) -> Option<TransformDelta> {
        let mut stretch = self.linear_drag_total(ray, axis)?;
        if self.snap_enabled {
            stretch = snap(stretch, self.snap_increment);
        }
        // Factor relative to the handle length, floored so a drag can shrink
        // to zero but never flip the sign.
        let total = (1.0 + stretch / AXIS_LEN).max(0.0);

        let drag = self.drag.as_mut()?;
        if drag.applied < 1e-6 || total == drag.applied {
            return None;
        }
        let factor = total / drag.applied;
        drag.applied = total;
        Some(TransformDelta::Scale {
            component: axis.component(),
            factor,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn straight_on_ray(x: f32, y: f32) -> Ray {
        Ray::new(Vec3::new(x, y, -5.0), Vec3::Z)
    }

    fn engage(gizmo: &mut Gizmo, ray: &Ray, anchor: &Transform) {
        assert!(gizmo.select(ray, anchor));
        assert!(gizmo.update(ray, anchor).is_none());
        assert!(gizmo.is_engaged());
    }

    #[test]
    fn select_finds_x_handle() {
        let mut gizmo = Gizmo::new();
        let anchor = Transform::default();
        assert!(gizmo.select(&straight_on_ray(0.5, 0.0), &anchor));
        assert_eq!(gizmo.active_axis(), Some(GizmoAxis::X));
        assert!(!gizmo.is_engaged());
    }

    #[test]
    fn select_misses_away_from_handles() {
        let mut gizmo = Gizmo::new();
        let anchor = Transform::default();
        assert!(!gizmo.select(&straight_on_ray(3.0, 3.0), &anchor));
        assert_eq!(gizmo.active_axis(), None);
    }

    #[test]
    fn overlapping_handles_pick_nearest_hit() {
        let mut gizmo = Gizmo::new();
        let anchor = Transform::default();
        // Near the origin the X, Y and Z boxes all intersect the ray; the X
        // and Y slabs are entered first (equal distance), and iteration order
        // keeps X on the exact tie.
        assert!(gizmo.select(&straight_on_ray(0.02, 0.02), &anchor));
        assert_eq!(gizmo.active_axis(), Some(GizmoAxis::X));
    }

    #[test]
    fn local_space_reorients_handles() {
        let mut gizmo = Gizmo::new();
        let mut anchor = Transform::default();
        anchor.rotation_deg = [0.0, 90.0, 0.0];

        // Anchor yawed 90 degrees about Y: its local X axis points down world
        // -Z. A ray sweeping world X at z = -0.5 crosses that arm only in
        // Local space.
        let ray = Ray::new(Vec3::new(-5.0, 0.0, -0.5), Vec3::X);
        assert!(!gizmo.select(&ray, &anchor));

        assert_eq!(gizmo.toggle_space(), GizmoSpace::Local);
        assert!(gizmo.select(&ray, &anchor));
        assert_eq!(gizmo.active_axis(), Some(GizmoAxis::X));
    }

    #[test]
    fn translate_drag_moves_along_axis() {
        let mut gizmo = Gizmo::new();
        let mut anchor = Transform::default();
        let start = straight_on_ray(0.5, 0.0);
        engage(&mut gizmo, &start, &anchor);

        let delta = gizmo.update(&straight_on_ray(1.23, 0.0), &anchor).unwrap();
        delta.apply(&mut anchor);
        assert!(anchor
            .position_vec3()
            .abs_diff_eq(Vec3::new(0.73, 0.0, 0.0), 1e-4));
    }

    #[test]
    fn translate_snap_rounds_raw_delta() {
        let mut gizmo = Gizmo::new();
        assert!(gizmo.toggle_snapping());
        let mut anchor = Transform::default();
        engage(&mut gizmo, &straight_on_ray(0.5, 0.0), &anchor);

        // Raw drag of 0.73 along X snaps to 0.5.
        let delta = gizmo.update(&straight_on_ray(1.23, 0.0), &anchor).unwrap();
        delta.apply(&mut anchor);
        assert!(anchor
            .position_vec3()
            .abs_diff_eq(Vec3::new(0.5, 0.0, 0.0), 1e-4));

        // Sub-increment movement afterwards emits nothing.
        assert!(gizmo.update(&straight_on_ray(1.15, 0.0), &anchor).is_none());
    }

    #[test]
    fn incremental_deltas_do_not_double_apply() {
        let mut gizmo = Gizmo::new();
        let mut anchor = Transform::default();
        engage(&mut gizmo, &straight_on_ray(0.5, 0.0), &anchor);

        for step in 1..=4 {
            let x = 0.5 + step as f32 * 0.25;
            if let Some(delta) = gizmo.update(&straight_on_ray(x, 0.0), &anchor) {
                delta.apply(&mut anchor);
            }
        }
        assert!(anchor
            .position_vec3()
            .abs_diff_eq(Vec3::new(1.0, 0.0, 0.0), 1e-4));
    }

    #[test]
    fn rotate_drag_sweeps_angle_about_axis() {
        let mut gizmo = Gizmo::new();
        gizmo.set_modifier(GizmoModifier::Rotate);
        let mut anchor = Transform::default();

        let start = Ray::new(Vec3::new(1.1, 5.0, 1.1), Vec3::NEG_Y);
        assert!(gizmo.select(&start, &anchor));
        assert_eq!(gizmo.active_axis(), Some(GizmoAxis::Y));
        assert!(gizmo.update(&start, &anchor).is_none());

        let current = Ray::new(Vec3::new(-1.1, 5.0, 1.1), Vec3::NEG_Y);
        let delta = gizmo.update(&current, &anchor).unwrap();
        let TransformDelta::Rotate { axis, angle, pivot } = delta else {
            panic!("expected rotation");
        };
        assert!(axis.abs_diff_eq(Vec3::Y, 1e-5));
        assert!((angle.abs() - std::f32::consts::FRAC_PI_2).abs() < 1e-3);
        assert_eq!(pivot, Vec3::ZERO);

        delta.apply(&mut anchor);
        assert!((anchor.rotation_deg[1].abs() - 90.0).abs() < 1e-2);
    }

    #[test]
    fn scale_drag_multiplies_axis_component() {
        let mut gizmo = Gizmo::new();
        gizmo.set_modifier(GizmoModifier::Scale);
        let mut anchor = Transform::default();
        engage(&mut gizmo, &straight_on_ray(0.5, 0.0), &anchor);

        // Stretching the X arm by half its length scales X by 1.5.
        let delta = gizmo.update(&straight_on_ray(1.0, 0.0), &anchor).unwrap();
        delta.apply(&mut anchor);
        assert!((anchor.scale[0] - 1.5).abs() < 1e-4);
        assert_eq!(anchor.scale[1], 1.0);
    }

    #[test]
    fn reset_is_idempotent_and_clears_state() {
        let mut gizmo = Gizmo::new();
        let anchor = Transform::default();
        engage(&mut gizmo, &straight_on_ray(0.5, 0.0), &anchor);

        gizmo.reset();
        assert!(!gizmo.is_engaged());
        assert_eq!(gizmo.active_axis(), None);
        gizmo.reset();
        assert!(!gizmo.is_engaged());

        // A new drag starts from scratch after reset.
        assert!(gizmo.update(&straight_on_ray(1.0, 0.0), &anchor).is_none());
    }

    #[test]
    fn modifier_switch_mid_drag_forces_reset() {
        let mut gizmo = Gizmo::new();
        let anchor = Transform::default();
        engage(&mut gizmo, &straight_on_ray(0.5, 0.0), &anchor);

        gizmo.set_modifier(GizmoModifier::Scale);
        assert!(!gizmo.is_engaged());
        assert_eq!(gizmo.active_axis(), None);
        assert_eq!(gizmo.modifier(), GizmoModifier::Scale);
    }

    #[test]
    fn toggles_report_resulting_state() {
        let mut gizmo = Gizmo::new();
        assert_eq!(gizmo.toggle_space(), GizmoSpace::Local);
        assert_eq!(gizmo.toggle_space(), GizmoSpace::World);
        assert!(gizmo.toggle_snapping());
        assert!(!gizmo.toggle_snapping());
    }

    #[test]
    fn world_vs_local_drags_diverge_for_rotated_anchor() {
        // Identical mouse drags must land differently once the handles are
        // reoriented by the anchor's rotation.
        let mut anchor = Transform::default();
        anchor.rotation_deg = [0.0, 45.0, 0.0];

        // Slightly angled rays through fixed world points, so neither frame's
        // constraint axis degenerates against the ray direction.
        let dir = Vec3::new(0.2, 0.0, 1.0).normalize();
        let through = |p: Vec3| Ray::new(p - dir * 5.0, dir);
        let start = through(Vec3::new(0.5, 0.0, 0.0));
        let end = through(Vec3::new(1.2, 0.0, 0.0));

        let mut world_gizmo = Gizmo::new();
        let mut world_copy = anchor;
        assert!(world_gizmo.select(&start, &world_copy));
        assert_eq!(world_gizmo.active_axis(), Some(GizmoAxis::X));
        assert!(world_gizmo.update(&start, &world_copy).is_none());
        let world_delta = world_gizmo.update(&end, &world_copy).unwrap();
        world_delta.apply(&mut world_copy);

        let mut local_gizmo = Gizmo::new();
        local_gizmo.toggle_space();
        let mut local_copy = anchor;
        assert!(local_gizmo.select(&start, &local_copy));
        assert_eq!(local_gizmo.active_axis(), Some(GizmoAxis::X));
        assert!(local_gizmo.update(&start, &local_copy).is_none());
        let local_delta = local_gizmo.update(&end, &local_copy).unwrap();
        local_delta.apply(&mut local_copy);

        // World drag stays on the global X axis; the local drag follows the
        // anchor's rotated X axis and picks up a Z component.
        assert!((world_copy.position[2]).abs() < 1e-4);
        assert!((local_copy.position[2]).abs() > 0.1);
        assert!(!world_copy
            .position_vec3()
            .abs_diff_eq(local_copy.position_vec3(), 1e-3));
    }
}
