use nalgebra as na;
use rapier3d::parry::{
    query::{self, ShapeCastHit, ShapeCastOptions},
    shape::{self as pshape, Shape},
};

use super::types::{Iso, ProbeHit, StaticShape, Vec3};

/// Cast a moving Z-aligned capsule against a single static shape and return the hit (if any).
///
/// - `capsule_iso`: the capsule's starting isometry in world space.
/// - `vel`: the world-space translation of the whole sweep (meters).
/// - `max_toi`: the maximum fraction of `vel` to consider (typically 1.0).
///
/// Starting inside a shape reports a hit at fraction 0.
pub fn cast_capsule_against_static(
    capsule_iso: Iso,
    capsule: &pshape::Capsule,
    vel: Vec3,
    max_toi: f32,
    shape: &StaticShape,
) -> Option<ProbeHit> {
    let hit = match *shape {
        StaticShape::Plane { normal, dist } => {
            // Plane equation in world space: normal ⋅ x = dist.
            let unit_n = na::Unit::new_normalize(normal);
            let plane = pshape::HalfSpace { normal: unit_n };
            let anchor = unit_n.into_inner() * dist;
            let plane_iso = Iso::translation(anchor.x, anchor.y, anchor.z);
            cast(capsule_iso, capsule, vel, max_toi, plane_iso, &plane)
        }
        StaticShape::Cuboid {
            half_extents,
            transform,
        } => cast(
            capsule_iso,
            capsule,
            vel,
            max_toi,
            transform.iso(),
            &pshape::Cuboid::new(half_extents),
        ),
        StaticShape::Sphere { radius, transform } => cast(
            capsule_iso,
            capsule,
            vel,
            max_toi,
            transform.iso(),
            &pshape::Ball::new(radius),
        ),
        StaticShape::Capsule {
            radius,
            half_height,
            transform,
        } => cast(
            capsule_iso,
            capsule,
            vel,
            max_toi,
            transform.iso(),
            &pshape::Capsule::new_z(half_height, radius),
        ),
    }?;

    Some(probe_hit_from_cast(capsule_iso, vel, &hit))
}

#[inline]
fn cast(
    capsule_iso: Iso,
    capsule: &pshape::Capsule,
    vel: Vec3,
    max_toi: f32,
    target_iso: Iso,
    target: &dyn Shape,
) -> Option<ShapeCastHit> {
    let mut opts = ShapeCastOptions::with_max_time_of_impact(max_toi);
    opts.stop_at_penetration = true;
    query::cast_shapes(
        &capsule_iso,
        &vel,
        capsule as &dyn Shape,
        &target_iso,
        &na::Vector3::zeros(),
        target,
        opts,
    )
    .ok()
    .flatten()
}

/// Convert a parry shape-cast hit on the swept capsule into world-space probe data.
pub(crate) fn probe_hit_from_cast(capsule_iso: Iso, vel: Vec3, hit: &ShapeCastHit) -> ProbeHit {
    let fraction = hit.time_of_impact;
    let location = capsule_iso.translation.vector + vel * fraction;
    let impact_point = location + capsule_iso.rotation * hit.witness1.coords;

    // Use the normal on the moving shape; ensure it opposes the motion.
    let mut normal = capsule_iso.rotation * hit.normal1.into_inner();
    if normal.dot(&vel) > 0.0 {
        normal = -normal;
    }

    ProbeHit {
        location,
        impact_point,
        normal,
        fraction,
    }
}

/// Iterate over a list of static shapes and return the earliest capsule hit (if any).
pub fn earliest_hit_capsule_vs_statics(
    capsule_iso: Iso,
    capsule: &pshape::Capsule,
    vel: Vec3,
    max_toi: f32,
    statics: &[StaticShape],
) -> Option<ProbeHit> {
    let mut best: Option<ProbeHit> = None;
    for s in statics {
        if let Some(hit) = cast_capsule_against_static(capsule_iso, capsule, vel, max_toi, s) {
            if best.as_ref().is_none_or(|b| hit.fraction < b.fraction) {
                best = Some(hit);
            }
        }
    }
    best
}
