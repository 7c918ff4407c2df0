/*!
Collision root module.

The predictors never touch a physics engine directly; they issue capsule sweeps
through the [`EnvironmentProbe`] trait. This module defines that seam and two
backends built on rapier's parry:

- types:         shared data types (Transform, StaticShape, CapsuleSpec, ProbeHit)
- probe:         the `EnvironmentProbe` trait, closure adapter and `NoProbe`
- narrow_phase:  thin wrappers over parry shape casts
- static_world:  probe over a plain list of static shapes
- rapier_world:  probe over a rapier `QueryPipeline`, plus a query-only world builder
*/

pub mod narrow_phase;
pub mod probe;
pub mod rapier_world;
pub mod static_world;
pub mod types;

pub use probe::{EnvironmentProbe, NoProbe};
pub use rapier_world::{ColliderShapeDef, RapierProbe, RapierQueryWorld, WorldStaticDef};
pub use static_world::StaticWorldProbe;
pub use types::{CapsuleSpec, Iso, ProbeHit, Quat, StaticShape, Transform, Vec3};

/// Convenience: build a `StaticShape::Plane` from a world-space plane pose:
/// - normal = rotation * +Z
/// - dist = dot(normal, translation) + optional offset
#[inline]
pub fn plane_from_pose(rotation: Quat, translation: Vec3, offset_along_normal: f32) -> StaticShape {
    let normal = rotation * Vec3::z();
    let dist = normal.dot(&translation) + offset_along_normal;
    StaticShape::Plane { normal, dist }
}

/// Convenience: build a `StaticShape::Cuboid` with given half extents and pose.
#[inline]
pub fn cuboid_from_pose(half_extents: Vec3, translation: Vec3, rotation: Quat) -> StaticShape {
    StaticShape::Cuboid {
        half_extents,
        transform: Transform::new(translation, rotation),
    }
}
