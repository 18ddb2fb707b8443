use glam::Vec2;

/// Immutable per-tick input sample, captured once by the host and passed into
/// every per-frame call. Nothing in the core polls input on its own.
#[derive(Default, Debug, Clone, Copy)]
pub struct InputSnapshot {
    /// Cursor position in window-client coordinates.
    pub cursor: Vec2,
    /// Primary action button (select / manipulate).
    pub primary: bool,
    /// Secondary action button (free-look while held).
    pub secondary: bool,
    /// Tertiary action button (pan while held).
    pub tertiary: bool,
    /// Additive-select modifier key.
    pub additive: bool,

    // Free-look movement keys, active while `secondary` is held.
    pub move_forward: bool,
    pub move_backward: bool,
    pub move_left: bool,
    pub move_right: bool,

    // Numeric mode-switch keys.
    pub mode_translate: bool,
    pub mode_rotate: bool,
    pub mode_scale: bool,
}

impl InputSnapshot {
    pub fn at(cursor: Vec2) -> Self {
        Self {
            cursor,
            ..Self::default()
        }
    }
}
