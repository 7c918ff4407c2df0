//! Rapier-backed environment probe over immutable world geometry.
//!
//! Hosts that already run rapier can hand their own `QueryPipeline` to [`RapierProbe`].
//! Hosts without one can build a query-only scene from [`WorldStaticDef`]s with
//! [`RapierQueryWorld::build`].
//!
//! Design goals
//! - Deterministic: given the same inputs (sorted by `id`), build identical in-memory sets.
//! - Query-focused: no dynamics are ever stepped; only collision detection runs once.
//! - Channels and ignore-lists are expressed with the `QueryFilter` the pipeline is built from.

use nalgebra as na;
use rapier3d::{
    parry::query::ShapeCastOptions,
    prelude::{
        BroadPhaseBvh, Collider, ColliderBuilder, ColliderSet, CollisionPipeline, HalfSpace,
        Isometry, NarrowPhase, QueryFilter, QueryPipeline, RigidBodyBuilder, RigidBodySet,
        SharedShape, Vector,
    },
};

use super::{
    EnvironmentProbe, narrow_phase,
    types::{CapsuleSpec, Iso, ProbeHit, Quat, Vec3},
};

/// Canonical, schema-agnostic definition of an immutable world collider.
#[derive(Clone, Debug)]
pub struct WorldStaticDef {
    /// Stable unique identifier used to ensure deterministic insertion order.
    pub id: u32,
    /// World-space translation.
    pub translation: Vec3,
    /// World-space rotation (unit quaternion).
    pub rotation: Quat,
    pub shape: ColliderShapeDef,
}

/// Supported static collider shapes.
#[derive(Clone, Debug)]
pub enum ColliderShapeDef {
    /// Infinite plane (half-space).
    ///
    /// The plane normal is derived from the pose as `rotation * +Z`.
    Plane {
        /// Offset along the plane normal (meters).
        offset_along_normal: f32,
    },

    /// Oriented cuboid with given half-extents (meters).
    Cuboid { half_extents: Vec3 },

    /// Sphere/ball (meters).
    Sphere { radius: f32 },

    /// Z-aligned capsule; `half_height` is the segment half-length (meters).
    CapsuleZ { radius: f32, half_height: f32 },
}

/// Build a Rapier collider for `def`, in the local frame of its fixed parent body.
fn collider_from_def(def: &WorldStaticDef) -> Collider {
    match &def.shape {
        ColliderShapeDef::Plane {
            offset_along_normal,
        } => {
            // Locally the plane is `z = offset`; the parent pose rotates +Z into the world normal.
            ColliderBuilder::new(SharedShape::new(HalfSpace::new(Vector::z_axis())))
                .translation(Vector::z() * *offset_along_normal)
                .build()
        }

        ColliderShapeDef::Cuboid { half_extents } => {
            ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z).build()
        }

        ColliderShapeDef::Sphere { radius } => ColliderBuilder::ball(*radius).build(),

        ColliderShapeDef::CapsuleZ {
            radius,
            half_height,
        } => ColliderBuilder::capsule_z(*half_height, *radius).build(),
    }
}

/// In-memory Rapier structures needed for scene queries against a static world.
pub struct RapierQueryWorld {
    bodies: RigidBodySet,
    colliders: ColliderSet,
    broad_phase: BroadPhaseBvh,
    narrow_phase: NarrowPhase,
}

impl RapierQueryWorld {
    /// Build a query world from a list of static collider definitions.
    ///
    /// The input is sorted by `id` before insertion. NaN/invalid values should be
    /// filtered by the caller.
    pub fn build(mut defs: Vec<WorldStaticDef>) -> Self {
        defs.sort_by_key(|d| d.id);

        let mut bodies = RigidBodySet::new();
        let mut colliders = ColliderSet::new();

        for def in &defs {
            let iso = Isometry::from_parts(na::Translation3::from(def.translation), def.rotation);
            let body = bodies.insert(RigidBodyBuilder::fixed().pose(iso).build());
            colliders.insert_with_parent(collider_from_def(def), body, &mut bodies);
        }

        // Collision detection only: refreshes the broad phase BVH, never steps dynamics.
        let mut broad_phase = BroadPhaseBvh::new();
        let mut narrow_phase = NarrowPhase::new();
        CollisionPipeline::new().step(
            0.0,
            &mut broad_phase,
            &mut narrow_phase,
            &mut bodies,
            &mut colliders,
            &(),
            &(),
        );

        log::debug!("built rapier query world with {} statics", defs.len());

        Self {
            bodies,
            colliders,
            broad_phase,
            narrow_phase,
        }
    }

    /// Borrowed `QueryPipeline` view over the world, filtered by `filter`.
    pub fn query_pipeline<'a>(&'a self, filter: QueryFilter<'a>) -> QueryPipeline<'a> {
        self.broad_phase.as_query_pipeline(
            self.narrow_phase.query_dispatcher(),
            &self.bodies,
            &self.colliders,
            filter,
        )
    }

    /// Probe over this world, filtered by `filter`.
    pub fn probe<'a>(&'a self, filter: QueryFilter<'a>) -> RapierProbe<'a> {
        RapierProbe::new(self.query_pipeline(filter))
    }
}

/// [`EnvironmentProbe`] backed by a rapier scene query pipeline.
pub struct RapierProbe<'a> {
    pipeline: QueryPipeline<'a>,
}

impl<'a> RapierProbe<'a> {
    pub fn new(pipeline: QueryPipeline<'a>) -> Self {
        Self { pipeline }
    }
}

impl EnvironmentProbe for RapierProbe<'_> {
    fn sweep_capsule(&self, start: Vec3, end: Vec3, capsule: CapsuleSpec) -> Option<ProbeHit> {
        let shape = capsule.to_shape();
        let capsule_iso = Iso::translation(start.x, start.y, start.z);
        let vel = end - start;

        let mut opts = ShapeCastOptions::with_max_time_of_impact(1.0);
        opts.stop_at_penetration = true;

        self.pipeline
            .cast_shape(&capsule_iso, &vel, &shape, opts)
            .map(|(_handle, hit)| narrow_phase::probe_hit_from_cast(capsule_iso, vel, &hit))
    }
}
