//! Actor transform: position, Euler rotation (degrees), per-component scale.
//!
//! The world matrix is always re-derived from the three fields, composed as
//! scale, then rotate, then translate. Rotation order is Z (roll) * Y (yaw)
//! * X (pitch), matching the editor's data model end to end.

use glam::{EulerRot, Mat3, Mat4, Quat, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Transform {
    pub position: [f32; 3],
    pub rotation_deg: [f32; 3],
    pub scale: [f32; 3],
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 0.0],
            rotation_deg: [0.0, 0.0, 0.0],
            scale: [1.0, 1.0, 1.0],
        }
    }
}

impl Transform {
    pub fn from_position(position: [f32; 3]) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn position_vec3(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position.to_array();
    }

    pub fn translate(&mut self, delta: Vec3) {
        self.set_position(self.position_vec3() + delta);
    }

    pub fn rotation_quat(&self) -> Quat {
        let (rx, ry, rz) = (
            self.rotation_deg[0].to_radians(),
            self.rotation_deg[1].to_radians(),
            self.rotation_deg[2].to_radians(),
        );
        Quat::from_euler(EulerRot::ZYX, rz, ry, rx)
    }

    pub fn set_rotation_quat(&mut self, rotation: Quat) {
        let (rz, ry, rx) = rotation.normalize().to_euler(EulerRot::ZYX);
        self.rotation_deg = [rx.to_degrees(), ry.to_degrees(), rz.to_degrees()];
    }

    /// Local axes as matrix columns (X, Y, Z).
    pub fn basis(&self) -> Mat3 {
        Mat3::from_quat(self.rotation_quat())
    }

    pub fn scale_vec3(&self) -> Vec3 {
        Vec3::from_array(self.scale)
    }

    /// Scale non-negativity is an invariant, so factors clamp at zero.
    pub fn scale_component(&mut self, component: usize, factor: f32) {
        self.scale[component] = (self.scale[component] * factor).max(0.0);
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position_vec3())
            * Mat4::from_quat(self.rotation_quat())
            * Mat4::from_scale(self.scale_vec3())
    }

    pub fn is_finite(&self) -> bool {
        self.position.iter().all(|v| v.is_finite())
            && self.rotation_deg.iter().all(|v| v.is_finite())
            && self.scale.iter().all(|v| v.is_finite())
    }
}

/// Round `value` to the nearest multiple of `increment`.
pub fn snap(value: f32, increment: f32) -> f32 {
    if increment <= 0.0 {
        return value;
    }
    (value / increment).round() * increment
}
