//! Per-frame editing session: the context object that owns the view slots,
//! the actor registry, the selection and the gizmo, and drives one tick of
//! input -> raycast -> hit-test -> state update.
//!
//! Everything runs on the single driving thread; one `update` per rendered
//! frame, no blocking, no locks. Releasing the manipulation button is the
//! only cancellation signal and is observed every tick.

mod input;

pub use input::InputSnapshot;

use crate::actor::{ActorId, ActorKind, CameraData, ModelData, Registry, RegistryError};
use crate::gizmo::{Gizmo, GizmoModifier, GizmoSpace};
use crate::raycast::{screen_to_ray, Ray};
use crate::selection::SelectionSet;
use crate::view::{ViewSet, ViewType, Viewport};
use glam::Vec2;

const WALK_SPEED: f32 = 4.0;
const MOUSE_SPEED: f32 = 0.55;
const MOUSE_SMOOTHING: f32 = 16.0;
const WHEEL_WALK_FACTOR: f32 = 0.005;

/// Notifications for the host's property/script UI, drained once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    SelectionChanged,
    TransformChanged(ActorId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillMode {
    Solid,
    Wireframe,
}

pub struct Session {
    views: ViewSet,
    registry: Registry,
    selection: SelectionSet,
    gizmo: Gizmo,
    fill_mode: FillMode,
    events: Vec<SessionEvent>,
    prev_cursor: Option<Vec2>,
    mouse_smooth: Vec2,
}

impl Session {
    pub fn new(viewport: Viewport) -> Self {
        log::info!(
            "session created ({}x{} viewport)",
            viewport.width,
            viewport.height
        );
        Self {
            views: ViewSet::new(viewport),
            registry: Registry::new(),
            selection: SelectionSet::new(),
            gizmo: Gizmo::new(),
            fill_mode: FillMode::Solid,
            events: Vec::new(),
            prev_cursor: None,
            mouse_smooth: Vec2::ZERO,
        }
    }

    // ------------------------------------------------------------------
    // Subsystem access
    // ------------------------------------------------------------------

    pub fn views(&self) -> &ViewSet {
        &self.views
    }

    pub fn views_mut(&mut self) -> &mut ViewSet {
        &mut self.views
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    pub fn gizmo(&self) -> &Gizmo {
        &self.gizmo
    }

    pub fn fill_mode(&self) -> FillMode {
        self.fill_mode
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    // ------------------------------------------------------------------
    // Host lifecycle requests
    // ------------------------------------------------------------------

    /// Register a model imported by the host. Display names count up with the
    /// registry ("Actor 1", "Actor 2", ...).
    pub fn import_model(&mut self, mesh_path: &str, bounds_min: [f32; 3], bounds_max: [f32; 3]) -> ActorId {
        let name = format!("Actor {}", self.registry.len() + 1);
        self.registry.add(
            name,
            ActorKind::Model(ModelData {
                mesh_path: mesh_path.to_string(),
                bounds_min,
                bounds_max,
                texture_path: None,
            }),
        )
    }

    pub fn add_camera(&mut self) -> ActorId {
        let name = format!("Camera {}", self.registry.len() + 1);
        self.registry.add(name, ActorKind::Camera(CameraData::default()))
    }

    /// Host-requested removal of one actor. The selection is purged in the
    /// same operation, and a drag pivoting on the removed actor is abandoned.
    pub fn remove_actor(&mut self, id: ActorId) -> bool {
        let was_anchor = self.selection.anchor() == Some(id);
        if !self.registry.remove(id) {
            return false;
        }
        if self.selection.remove(id) {
            self.events.push(SessionEvent::SelectionChanged);
        }
        if was_anchor {
            self.gizmo.reset();
        }
        true
    }

    /// Delete every selected actor, releasing resources first.
    pub fn delete_selected(&mut self) {
        let ids: Vec<ActorId> = self.selection.ids().to_vec();
        if ids.is_empty() {
            return;
        }
        for id in ids {
            self.registry.remove(id);
        }
        self.selection.clear();
        self.gizmo.reset();
        self.events.push(SessionEvent::SelectionChanged);
    }

    /// Deep-copy every selected actor. The copies get fresh identifiers and
    /// re-acquire their own GPU resources; the selection itself is unchanged.
    pub fn duplicate_selected(&mut self) -> Vec<ActorId> {
        let ids: Vec<ActorId> = self.selection.ids().to_vec();
        ids.iter()
            .filter_map(|id| self.registry.duplicate(*id))
            .collect()
    }

    /// Attach script text to the primary (first-selected) actor.
    pub fn set_script(&mut self, script: String) -> Result<(), RegistryError> {
        match self.selection.primary() {
            Some(id) => self.registry.set_script(id, script),
            None => Ok(()),
        }
    }

    pub fn script(&self) -> Option<&str> {
        self.registry.get(self.selection.primary()?)?.script()
    }

    /// Record a texture path on every selected model actor; camera actors in
    /// the selection are skipped.
    pub fn apply_texture(&mut self, path: &str) -> Result<(), RegistryError> {
        for id in self.selection.ids().to_vec() {
            match self.registry.set_texture(id, path.to_string()) {
                Ok(()) | Err(RegistryError::NotAModel(_)) => {}
                Err(err) => return Err(err),
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // UI toggles (each returns the resulting state for checkbox sync)
    // ------------------------------------------------------------------

    pub fn set_modifier(&mut self, modifier: GizmoModifier) -> GizmoModifier {
        self.gizmo.set_modifier(modifier);
        self.gizmo.modifier()
    }

    /// Flip Local/World gizmo orientation. A selection is required since the
    /// local frame comes from the anchor; without one the space is unchanged.
    pub fn toggle_space(&mut self) -> GizmoSpace {
        if self.selection.is_empty() {
            return self.gizmo.space();
        }
        self.gizmo.toggle_space()
    }

    pub fn toggle_snapping(&mut self) -> bool {
        self.gizmo.toggle_snapping()
    }

    pub fn toggle_fill_mode(&mut self) -> FillMode {
        self.fill_mode = match self.fill_mode {
            FillMode::Solid => FillMode::Wireframe,
            FillMode::Wireframe => FillMode::Solid,
        };
        self.fill_mode
    }

    pub fn set_active_view(&mut self, view_type: ViewType) {
        self.views.set_active(view_type);
    }

    /// Restore every view slot to its preset pose.
    pub fn reset_views(&mut self) {
        self.views.reset_views();
    }

    // ------------------------------------------------------------------
    // Per-frame pipeline
    // ------------------------------------------------------------------

    /// Resolve a click. The gizmo sits visually on top, so its handles are
    /// tested first; a handle hit leaves the selection untouched (that is a
    /// manipulation, not a selection change). Otherwise the nearest actor hit
    /// drives the selection rules. Returns whether anything was hit, which
    /// the host uses for context-menu visibility.
    pub fn pick(&mut self, input: &InputSnapshot) -> bool {
        let ray = self.cursor_ray(input.cursor);

        if let Some(anchor) = self.anchor_transform() {
            if self.gizmo.select(&ray, &anchor) {
                return true;
            }
        }

        let hit = self.registry.pick(&ray).map(|(id, _)| id);
        if self.selection.resolve_click(hit, input.additive) {
            self.events.push(SessionEvent::SelectionChanged);
        }
        hit.is_some()
    }

    /// One tick: sample-driven state update. Call once per rendered frame.
    pub fn update(&mut self, dt: f32, input: &InputSnapshot) {
        if input.mode_translate {
            self.gizmo.set_modifier(GizmoModifier::Translate);
        }
        if input.mode_rotate {
            self.gizmo.set_modifier(GizmoModifier::Rotate);
        }
        if input.mode_scale {
            self.gizmo.set_modifier(GizmoModifier::Scale);
        }

        if input.primary && !self.selection.is_empty() {
            self.drag_selection(input.cursor);
        } else if input.secondary && self.views.active_type() == ViewType::Perspective {
            self.free_look(dt, input);
        } else if input.tertiary {
            self.pan(dt, input.cursor);
        } else {
            self.gizmo.reset();
            self.mouse_smooth = Vec2::ZERO;
        }

        self.prev_cursor = Some(input.cursor);
    }

    pub fn on_mouse_wheel(&mut self, delta: f32) {
        self.views.active_mut().walk(delta * WHEEL_WALK_FACTOR);
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.views.set_viewport(viewport);
    }

    // ------------------------------------------------------------------

    fn cursor_ray(&mut self, cursor: Vec2) -> Ray {
        let viewport = self.views.viewport();
        screen_to_ray(cursor, self.views.active_mut(), viewport)
    }

    fn anchor_transform(&self) -> Option<crate::transform::Transform> {
        let id = self.selection.anchor()?;
        Some(self.registry.get(id)?.transform)
    }

    /// Engaged-drag branch of the tick. A stale anchor (deleted mid-drag)
    /// forces an implicit gizmo reset with no deltas applied.
    fn drag_selection(&mut self, cursor: Vec2) {
        let Some(anchor_id) = self.selection.anchor() else {
            return;
        };
        let Some(anchor) = self.anchor_transform() else {
            self.gizmo.reset();
            return;
        };

        let ray = self.cursor_ray(cursor);
        let Some(delta) = self.gizmo.update(&ray, &anchor) else {
            return;
        };

        debug_assert!(self.registry.contains(anchor_id));
        for id in self.selection.ids().to_vec() {
            if let Some(actor) = self.registry.get_mut(id) {
                delta.apply(&mut actor.transform);
                self.events.push(SessionEvent::TransformChanged(id));
            }
        }
    }

    fn free_look(&mut self, dt: f32, input: &InputSnapshot) {
        let view = self.views.active_mut();
        if input.move_forward {
            view.walk(WALK_SPEED * dt);
        }
        if input.move_backward {
            view.walk(-WALK_SPEED * dt);
        }
        if input.move_left {
            view.strafe(-WALK_SPEED * dt);
        }
        if input.move_right {
            view.strafe(WALK_SPEED * dt);
        }

        let moved = input.cursor - self.prev_cursor.unwrap_or(input.cursor);
        self.mouse_smooth.x = lerp(dt * MOUSE_SMOOTHING, self.mouse_smooth.x, moved.x);
        self.mouse_smooth.y = lerp(dt * MOUSE_SMOOTHING, self.mouse_smooth.y, moved.y);

        let view = self.views.active_mut();
        view.yaw(self.mouse_smooth.x * MOUSE_SPEED * dt);
        view.pitch(self.mouse_smooth.y * MOUSE_SPEED * dt);
    }

    fn pan(&mut self, dt: f32, cursor: Vec2) {
        let moved = cursor - self.prev_cursor.unwrap_or(cursor);
        self.mouse_smooth.x = lerp(dt * MOUSE_SMOOTHING, self.mouse_smooth.x, -moved.x);
        self.mouse_smooth.y = lerp(dt * MOUSE_SMOOTHING, self.mouse_smooth.y, moved.y);

        let view = self.views.active_mut();
        view.strafe(self.mouse_smooth.x * dt);
        view.fly(self.mouse_smooth.y * dt);
    }
}

fn lerp(t: f32, from: f32, to: f32) -> f32 {
    from + (to - from) * t.clamp(0.0, 1.0)
}
