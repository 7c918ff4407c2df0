/*!
Core collision types and math aliases shared by the probe backends.

This module contains no algorithms. It defines the data exchanged between:
- the predictors, which only ask "where does this capsule first touch something?"
- narrow_phase (parry shape casts against individual static shapes)
- the probe backends (static shape list, rapier query pipeline)

Conventions
- Units are meters, Z is up.
- A capsule is described the way the agent reports it: `half_height` includes the
  hemispherical cap, so the total height is `2 * half_height`.
*/

use nalgebra as na;
use rapier3d::parry::shape as pshape;

pub type Vec3 = na::Vector3<f32>;
pub type Quat = na::UnitQuaternion<f32>;
pub type Iso = na::Isometry3<f32>;

/// World pose of a static shape.
#[derive(Clone, Copy, Debug)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
}

impl Transform {
    #[inline]
    pub fn new(translation: Vec3, rotation: Quat) -> Self {
        Self {
            translation,
            rotation,
        }
    }

    /// Pose handed to parry shape casts.
    #[inline]
    pub fn iso(&self) -> Iso {
        Iso::from_parts(self.translation.into(), self.rotation)
    }
}

/// Level geometry a [`crate::collision::StaticWorldProbe`] sweeps the agent against.
///
/// Unlike [`CapsuleSpec`], a `Capsule` obstacle takes parry's segment half-length.
#[derive(Clone, Copy, Debug)]
pub enum StaticShape {
    /// Solid half-space below `normal . x = dist`.
    Plane { normal: Vec3, dist: f32 },
    /// Box with `half_extents` in its own frame.
    Cuboid {
        half_extents: Vec3,
        transform: Transform,
    },
    /// Only the translation of `transform` matters.
    Sphere {
        radius: f32,
        transform: Transform,
    },
    /// Z-aligned in its own frame.
    Capsule {
        radius: f32,
        half_height: f32,
        transform: Transform,
    },
}

impl StaticShape {
    /// Horizontal ground plane at height `z`.
    #[inline]
    pub fn ground(z: f32) -> Self {
        StaticShape::Plane {
            normal: Vec3::z(),
            dist: z,
        }
    }
}

/// Collision capsule of the agent, in the agent's own convention.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CapsuleSpec {
    pub radius: f32,
    /// Half of the total height, caps included.
    pub half_height: f32,
}

impl CapsuleSpec {
    #[inline]
    pub fn new(radius: f32, half_height: f32) -> Self {
        Self {
            radius,
            half_height,
        }
    }

    /// Half-length of the cylinder section between the caps.
    #[inline]
    pub fn segment_half_height(&self) -> f32 {
        (self.half_height - self.radius).max(0.0)
    }

    /// Z-aligned parry capsule for shape casts.
    #[inline]
    pub fn to_shape(&self) -> pshape::Capsule {
        pshape::Capsule::new_z(self.segment_half_height(), self.radius.max(0.0))
    }
}

/// First blocking contact found by a capsule sweep.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProbeHit {
    /// Capsule center at the time of impact.
    pub location: Vec3,
    /// Contact point on the capsule surface.
    pub impact_point: Vec3,
    /// Surface normal, oriented against the sweep direction.
    pub normal: Vec3,
    /// Fraction (0..1) of the sweep where the hit occurred.
    pub fraction: f32,
}
