/*!
Ballistic path prediction for jumps and falls.

The path is integrated with the trapezoidal rule, which is exact for constant gravity,
and swept through the environment probe once per sub-step:

  v' = v + (0, 0, gravity_z) * dt
  p' = p + (v + v') / 2 * dt

The first blocking hit ends the path.
*/

use crate::{
    Vec3,
    collision::{CapsuleSpec, EnvironmentProbe, ProbeHit},
    marker::PredictionResult,
    settings::{
        DistanceMatchingSettings, MAX_MAX_SIMULATION_TIME, MAX_SIMULATION_FREQUENCY, MIN_TICK_TIME,
    },
    snapshot::KinematicSnapshot,
    utils::clamp_range,
};

/// Where and when a predicted path ends.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathPrediction {
    /// Capsule center at the end of the path (at the hit, if any).
    pub location: Vec3,
    /// Seconds from launch to the end of the path.
    pub time: f32,
    pub hit: Option<ProbeHit>,
}

/// Simulate a gravity-only path for at most `simulation_time` seconds.
///
/// `frequency` is sub-steps per second, capped at [`MAX_SIMULATION_FREQUENCY`];
/// non-positive frequencies collapse to a single step. `simulation_time` is capped at
/// [`MAX_MAX_SIMULATION_TIME`], so the step count is always finite.
pub fn predict_path<P>(
    probe: &P,
    capsule: CapsuleSpec,
    start: Vec3,
    velocity: Vec3,
    gravity_z: f32,
    simulation_time: f32,
    frequency: f32,
) -> PathPrediction
where
    P: EnvironmentProbe + ?Sized,
{
    let total = clamp_range(simulation_time, 0.0, MAX_MAX_SIMULATION_TIME);
    let (sub_step, steps) = if frequency > 0.0 {
        let frequency = frequency.min(MAX_SIMULATION_FREQUENCY);
        (1.0 / frequency, (total * frequency).ceil() as usize)
    } else {
        (total, 1)
    };
    let gravity = Vec3::new(0.0, 0.0, gravity_z);

    let mut location = start;
    let mut velocity = velocity;

    for step in 0..steps {
        let elapsed = step as f32 * sub_step;
        let dt = sub_step.min(total - elapsed);
        if dt < MIN_TICK_TIME {
            break;
        }
        let next_velocity = velocity + gravity * dt;
        let next_location = location + (velocity + next_velocity) * (0.5 * dt);

        if let Some(hit) = probe.sweep_capsule(location, next_location, capsule) {
            return PathPrediction {
                location: hit.location,
                time: elapsed + dt * hit.fraction.clamp(0.0, 1.0),
                hit: Some(hit),
            };
        }

        location = next_location;
        velocity = next_velocity;
    }

    PathPrediction {
        location,
        time: total,
        hit: None,
    }
}

/// Seconds until the vertical velocity reaches zero, capped at `max_time`.
pub fn time_to_apex(vertical_speed: f32, gravity_z: f32, max_time: f32) -> f32 {
    if vertical_speed <= 0.0 {
        return 0.0;
    }
    let gravity = gravity_z.abs();
    if gravity <= f32::EPSILON {
        return max_time;
    }
    (vertical_speed / gravity).min(max_time)
}

/// Apex marker: top of the jump, or the ceiling the agent bumps into first.
pub fn predict_apex<P>(
    snapshot: &KinematicSnapshot,
    settings: &DistanceMatchingSettings,
    probe: &P,
) -> PredictionResult
where
    P: EnvironmentProbe + ?Sized,
{
    let apex_time = time_to_apex(
        snapshot.vertical_speed(),
        snapshot.gravity_z(),
        settings.max_simulation_time,
    );

    let path = predict_path(
        probe,
        snapshot.capsule,
        snapshot.position,
        snapshot.velocity,
        snapshot.gravity_z(),
        apex_time,
        settings.apex_simulation_frequency,
    );

    log::debug!(
        "apex prediction: {:.3}s, z = {:.2}, blocked: {}",
        path.time,
        path.location.z,
        path.hit.is_some()
    );

    PredictionResult::at(path.location, path.time)
}

/// Landing marker: where the falling agent first touches something, lifted by the
/// ground distance. Without a hit the path end is reported as is.
pub fn predict_landing<P>(
    snapshot: &KinematicSnapshot,
    settings: &DistanceMatchingSettings,
    probe: &P,
) -> PredictionResult
where
    P: EnvironmentProbe + ?Sized,
{
    let path = predict_path(
        probe,
        snapshot.capsule,
        snapshot.position,
        snapshot.velocity,
        snapshot.gravity_z(),
        settings.max_simulation_time,
        settings.landing_simulation_frequency,
    );

    let mut location = path.location;
    if path.hit.is_some() {
        location.z += snapshot.ground_distance;
    }

    log::debug!(
        "landing prediction: {:.3}s, z = {:.2}, landed: {}",
        path.time,
        location.z,
        path.hit.is_some()
    );

    PredictionResult::at(location, path.time)
}
