use crate::collision::{CapsuleSpec, EnvironmentProbe, ProbeHit, Vec3};

/// Drop a predicted location onto the ground below it.
///
/// - Sweeps `capsule` vertically from `half_height` above `location` to `half_height` below.
/// - On a hit the capsule rests on the surface, lifted by `ground_distance`.
/// - Without a hit the location is returned unchanged.
pub fn ground_location<P>(
    probe: &P,
    location: Vec3,
    capsule: CapsuleSpec,
    ground_distance: f32,
) -> (Vec3, Option<ProbeHit>)
where
    P: EnvironmentProbe + ?Sized,
{
    let reach = Vec3::z() * capsule.half_height.max(0.0);
    let hit = probe.sweep_capsule(location + reach, location - reach, capsule);

    match hit {
        Some(hit) => {
            let mut grounded = location;
            grounded.z = hit.location.z + ground_distance;
            (grounded, Some(hit))
        }
        None => (location, None),
    }
}
