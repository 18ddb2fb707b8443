//! Scene actors (placed model instances and cameras) and the registry that
//! owns them.
//!
//! Ownership is deliberately one-way: the registry is the only owner of
//! actors, and every other subsystem (selection, gizmo) refers to them by
//! `ActorId`, resolved through a lookup at time of use. Deleting an actor can
//! therefore never leave dangling manipulation state behind.

use crate::raycast::{ray_sphere, Ray};
use crate::transform::Transform;
use glam::Vec3;

/// Opaque actor identifier. Unique within a registry and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ActorId(u64);

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("unknown actor {0}")]
    UnknownActor(ActorId),
    #[error("actor {0} is not a model")]
    NotAModel(ActorId),
}

/// Handle to an exclusive GPU-side resource acquired by the host for one
/// actor. Never shared: duplication clears it so the copy re-acquires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpuHandle(pub u32);

/// Model-specific data. Bounds are the imported mesh's local-space box.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ModelData {
    pub mesh_path: String,
    pub bounds_min: [f32; 3],
    pub bounds_max: [f32; 3],
    pub texture_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CameraData {
    pub fov_deg: f32,
}

impl Default for CameraData {
    fn default() -> Self {
        Self { fov_deg: 60.0 }
    }
}

/// Editor pick radius for camera actors, which have no mesh of their own.
const CAMERA_WIDGET_RADIUS: f32 = 0.5;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum ActorKind {
    Model(ModelData),
    Camera(CameraData),
}

impl ActorKind {
    /// Geometric hit-test in world space, returning the distance from the ray
    /// origin to the nearest intersection.
    pub fn pick(&self, ray: &Ray, transform: &Transform) -> Option<f32> {
        match self {
            ActorKind::Model(data) => {
                let world = transform.matrix();
                let inverse = world.inverse();
                if !inverse.is_finite() {
                    return None;
                }
                // The model matrix carries scale, so the slab test runs in
                // local space and the distance is measured back in world space.
                let local = Ray {
                    origin: inverse.transform_point3(ray.origin),
                    dir: inverse.transform_vector3(ray.dir),
                };
                let t_local = crate::raycast::ray_aabb(
                    &local,
                    Vec3::from_array(data.bounds_min),
                    Vec3::from_array(data.bounds_max),
                )?;
                let world_hit = world.transform_point3(local.point_at(t_local));
                Some((world_hit - ray.origin).length())
            }
            ActorKind::Camera(_) => {
                ray_sphere(ray, transform.position_vec3(), CAMERA_WIDGET_RADIUS)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct Actor {
    id: ActorId,
    pub name: String,
    pub kind: ActorKind,
    pub transform: Transform,
    script: Option<String>,
    gpu: Option<GpuHandle>,
}

impl Actor {
    pub fn id(&self) -> ActorId {
        self.id
    }

    pub fn script(&self) -> Option<&str> {
        self.script.as_deref()
    }

    pub fn set_script(&mut self, script: String) {
        self.script = Some(script);
    }

    pub fn gpu(&self) -> Option<GpuHandle> {
        self.gpu
    }

    /// Host hands over the GPU-side resource it acquired for this actor.
    pub fn attach_gpu(&mut self, handle: GpuHandle) {
        self.gpu = Some(handle);
    }

    /// Release any exclusive GPU-side resource. Called before removal.
    pub fn release(&mut self) {
        if let Some(handle) = self.gpu.take() {
            log::debug!("actor {} releasing gpu resource {}", self.id, handle.0);
        }
    }

    pub fn pick(&self, ray: &Ray) -> Option<f32> {
        self.kind.pick(ray, &self.transform)
    }
}

/// Insertion-ordered actor storage. Iteration order doubles as deterministic
/// render order, and as the pick tie-break (first registered wins).
#[derive(Default)]
pub struct Registry {
    actors: Vec<Actor>,
    next_id: u64,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: String, kind: ActorKind) -> ActorId {
        self.next_id += 1;
        let id = ActorId(self.next_id);
        log::info!("registered actor {} ({})", id, name);
        self.actors.push(Actor {
            id,
            name,
            kind,
            transform: Transform::default(),
            script: None,
            gpu: None,
        });
        id
    }

    /// Deep copy with a fresh identifier. The GPU handle is never carried
    /// over; the host re-acquires resources for the copy.
    pub fn duplicate(&mut self, id: ActorId) -> Option<ActorId> {
        let source = self.get(id)?.clone();
        self.next_id += 1;
        let new_id = ActorId(self.next_id);
        log::info!("duplicated actor {} as {}", id, new_id);
        self.actors.push(Actor {
            id: new_id,
            gpu: None,
            ..source
        });
        Some(new_id)
    }

    /// Release the actor's resources and drop it. Returns false for ids that
    /// are not (or no longer) registered.
    pub fn remove(&mut self, id: ActorId) -> bool {
        let Some(index) = self.actors.iter().position(|actor| actor.id == id) else {
            return false;
        };
        let mut actor = self.actors.remove(index);
        actor.release();
        log::info!("removed actor {} ({})", id, actor.name);
        true
    }

    pub fn contains(&self, id: ActorId) -> bool {
        self.actors.iter().any(|actor| actor.id == id)
    }

    pub fn get(&self, id: ActorId) -> Option<&Actor> {
        self.actors.iter().find(|actor| actor.id == id)
    }

    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.iter_mut().find(|actor| actor.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Actor> {
        self.actors.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Actor> {
        self.actors.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    /// Nearest hit across all actors. Strict comparison keeps the first
    /// registered actor on exact distance ties.
    pub fn pick(&self, ray: &Ray) -> Option<(ActorId, f32)> {
        let mut nearest: Option<(ActorId, f32)> = None;
        for actor in &self.actors {
            if let Some(distance) = actor.pick(ray) {
                if nearest.map_or(true, |(_, best)| distance < best) {
                    nearest = Some((actor.id, distance));
                }
            }
        }
        nearest
    }

    pub fn set_script(&mut self, id: ActorId, script: String) -> Result<(), RegistryError> {
        let actor = self.get_mut(id).ok_or(RegistryError::UnknownActor(id))?;
        actor.set_script(script);
        Ok(())
    }

    pub fn set_texture(&mut self, id: ActorId, path: String) -> Result<(), RegistryError> {
        let actor = self.get_mut(id).ok_or(RegistryError::UnknownActor(id))?;
        match &mut actor.kind {
            ActorKind::Model(data) => {
                data.texture_path = Some(path);
                Ok(())
            }
            ActorKind::Camera(_) => Err(RegistryError::NotAModel(id)),
        }
    }
}

#[cfg(test)]
pub(crate) fn unit_model() -> ActorKind {
    ActorKind::Model(ModelData {
        mesh_path: "meshes/cube.obj".to_string(),
        bounds_min: [-0.5, -0.5, -0.5],
        bounds_max: [0.5, 0.5, 0.5],
        texture_path: None,
    })
}
