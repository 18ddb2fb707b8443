//! Stagehand - interactive manipulation core for a 3D scene editor.
//!
//! Per-frame camera/view handling, ray-based picking of actors and gizmo
//! handles, and a translate/rotate/scale gizmo state machine with axis
//! constraints, grid snapping and a local/world space toggle. Hosting
//! concerns (window, menus, rendering device, persistence) live outside;
//! the host feeds an [`session::InputSnapshot`] into [`session::Session`]
//! once per frame and drains the resulting events.

pub mod actor;
pub mod gizmo;
pub mod raycast;
pub mod selection;
pub mod session;
pub mod transform;
pub mod view;

pub use actor::{Actor, ActorId, ActorKind, CameraData, ModelData, Registry, RegistryError};
pub use gizmo::{Gizmo, GizmoAxis, GizmoModifier, GizmoSpace, TransformDelta};
pub use raycast::{screen_to_ray, Ray};
pub use selection::SelectionSet;
pub use session::{FillMode, InputSnapshot, Session, SessionEvent};
pub use transform::Transform;
pub use view::{View, ViewSet, ViewType, Viewport};
