//! Stop/pivot prediction: forward-simulate velocity decay until the agent stops or turns.
//!
//! Every loop here is bounded by `max_simulation_time`, so any mix of zero, negative or
//! huge friction/braking parameters terminates. Settings are clamped into range on entry,
//! which keeps that ceiling finite and the step away from zero.

use crate::{
    Vec3,
    collision::EnvironmentProbe,
    marker::PredictionResult,
    settings::{
        DistanceMatchingSettings, KINDA_SMALL_NUMBER, MAX_BRAKING_SUB_STEP_TIME,
        MIN_BRAKING_SUB_STEP_TIME, MIN_TICK_TIME,
    },
    snapshot::KinematicSnapshot,
    utils::safe_normal,
};

use super::ground::ground_location;

/// Simulated stop location and time-to-stop, without ground correction.
///
/// The returned `distance` is 0; the state machine fills it in every tick.
pub fn simulate_braking(
    snapshot: &KinematicSnapshot,
    settings: &DistanceMatchingSettings,
    tick_delta: f32,
) -> PredictionResult {
    let settings = settings.sanitized();
    let time_step = settings.prediction_time_step(tick_delta);
    let max_time = settings.max_simulation_time;
    let sub_step = settings
        .braking_sub_step_time
        .clamp(MIN_BRAKING_SUB_STEP_TIME, MAX_BRAKING_SUB_STEP_TIME);
    let friction = snapshot.movement.effective_friction();
    let braking = snapshot.movement.effective_braking();
    let brake_to_stop_sq = settings.brake_to_stop_velocity * settings.brake_to_stop_velocity;

    let acceleration = snapshot.acceleration;
    let accelerating = snapshot.acceleration_size() > settings.movement_threshold;
    let accel_dir = safe_normal(acceleration);

    let mut velocity = if accelerating {
        accel_dir * snapshot.velocity.dot(&accel_dir)
    } else {
        snapshot.velocity
    };
    let mut location = snapshot.position;
    let mut elapsed = 0.0f32;

    while elapsed < max_time {
        let step = time_step.min(max_time - elapsed);
        if step < MIN_TICK_TIME {
            break;
        }
        let previous = velocity;

        if !accelerating {
            if velocity.norm_squared() <= KINDA_SMALL_NUMBER {
                break;
            }
            if friction != 0.0 || braking != 0.0 {
                velocity = brake(velocity, friction, braking, step, sub_step);

                let speed_sq = velocity.norm_squared();
                if speed_sq <= KINDA_SMALL_NUMBER || (braking != 0.0 && speed_sq <= brake_to_stop_sq) {
                    break;
                }
            }
        } else {
            // Friction limits how fast the velocity can swing toward the input direction.
            let speed = velocity.norm();
            velocity -= (velocity - accel_dir * speed) * (step * friction).min(1.0);
            velocity += acceleration * step;
        }

        if velocity.dot(&previous) <= 0.0 {
            break;
        }

        location += velocity * step;
        elapsed += step;
    }

    PredictionResult::at(location, elapsed)
}

/// Apply friction and constant braking over `step`, subdivided into short sub-steps.
///
/// Never reverses the velocity: the sub-step loop stops as soon as it would.
fn brake(velocity: Vec3, friction: f32, braking: f32, step: f32, sub_step: f32) -> Vec3 {
    let start = velocity;
    let reverse_accel = if braking == 0.0 {
        Vec3::zeros()
    } else {
        safe_normal(velocity) * -braking
    };

    let mut velocity = velocity;
    let mut remaining = step;
    while remaining >= MIN_TICK_TIME {
        // Without friction the deceleration is constant, one sub-step is exact.
        let dt = if remaining > sub_step && friction != 0.0 {
            sub_step.min(remaining * 0.5)
        } else {
            remaining
        };
        remaining -= dt;

        velocity += (velocity * -friction + reverse_accel) * dt;
        if velocity.dot(&start) <= 0.0 {
            break;
        }
    }
    velocity
}

/// Stop/pivot marker: simulated stop, then dropped onto the ground under it.
pub fn predict_stop<P>(
    snapshot: &KinematicSnapshot,
    settings: &DistanceMatchingSettings,
    tick_delta: f32,
    probe: &P,
) -> PredictionResult
where
    P: EnvironmentProbe + ?Sized,
{
    let simulated = simulate_braking(snapshot, settings, tick_delta);
    let (location, hit) = ground_location(
        probe,
        simulated.location,
        snapshot.capsule,
        snapshot.ground_distance,
    );

    log::debug!(
        "stop prediction: {:.3}s to ({:.2}, {:.2}, {:.2}), ground hit: {}",
        simulated.time,
        location.x,
        location.y,
        location.z,
        hit.is_some()
    );

    PredictionResult::at(location, simulated.time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        collision::{NoProbe, StaticShape, StaticWorldProbe},
        snapshot::MovementParams,
    };

    fn moving(velocity: Vec3, movement: MovementParams) -> KinematicSnapshot {
        KinematicSnapshot::at_rest(Vec3::new(0.0, 0.0, 0.92))
            .with_velocity(velocity)
            .with_movement(movement)
    }

    #[test]
    fn frictionless_agent_coasts_to_the_time_ceiling() {
        let settings = DistanceMatchingSettings::default();
        let snapshot = moving(Vec3::new(3.0, 0.0, 0.0), MovementParams::frictionless());

        let result = predict_stop(&snapshot, &settings, 1.0 / 60.0, &NoProbe);

        let expected = snapshot.position + snapshot.velocity * settings.max_simulation_time;
        assert!((result.location - expected).norm() < 1.0e-3);
        assert!((result.time - settings.max_simulation_time).abs() < 1.0e-4);
        assert_eq!(result.location.z, snapshot.position.z);
    }

    #[test]
    fn constant_braking_stops_near_analytic_distance() {
        // Pure braking: d = v^2 / (2b), t = v / b, minus the brake-to-stop snap.
        let movement = MovementParams {
            ground_friction: 0.0,
            max_braking_deceleration: 10.0,
            ..MovementParams::default()
        };
        let settings = DistanceMatchingSettings::default();
        let snapshot = moving(Vec3::new(4.0, 0.0, 0.0), movement);

        let result = simulate_braking(&snapshot, &settings, 0.01);

        assert!((result.location.x - 0.8).abs() < 0.05, "x = {}", result.location.x);
        assert!((result.time - 0.4).abs() < 0.035, "t = {}", result.time);
        assert!(result.location.y.abs() < 1.0e-6);
    }

    #[test]
    fn friction_and_braking_stop_before_the_ceiling() {
        let settings = DistanceMatchingSettings::default();
        let snapshot = moving(Vec3::new(0.0, 6.0, 0.0), MovementParams::default());

        let result = simulate_braking(&snapshot, &settings, 1.0 / 30.0);
        assert!(result.time > 0.0);
        assert!(result.time < settings.max_simulation_time);
        assert!(result.location.y > 0.0);
        assert!(result.location.y < 6.0 * result.time);
    }

    #[test]
    fn reversing_acceleration_stops_at_turnaround() {
        let settings = DistanceMatchingSettings::default();
        let snapshot = moving(Vec3::new(5.0, 0.0, 0.0), MovementParams::default())
            .with_acceleration(Vec3::new(-20.0, 0.0, 0.0));

        let result = simulate_braking(&snapshot, &settings, 1.0 / 60.0);
        assert!(result.location.x >= 0.0);
        assert!(result.location.x < 5.0 * settings.max_simulation_time);
        assert!(result.time < settings.max_simulation_time);
    }

    #[test]
    fn resting_agent_predicts_its_own_position() {
        let settings = DistanceMatchingSettings::default();
        let snapshot = moving(Vec3::zeros(), MovementParams::default());

        let result = simulate_braking(&snapshot, &settings, 1.0 / 60.0);
        assert_eq!(result.location, snapshot.position);
        assert_eq!(result.time, 0.0);
    }

    #[test]
    fn hostile_parameters_still_terminate() {
        let settings = DistanceMatchingSettings::default();
        for movement in [
            MovementParams {
                ground_friction: -3.0,
                max_braking_deceleration: -1.0,
                ..MovementParams::default()
            },
            MovementParams {
                ground_friction: 1.0e6,
                max_braking_deceleration: 1.0e6,
                ..MovementParams::default()
            },
        ] {
            let snapshot = moving(Vec3::new(2.0, 2.0, 0.0), movement);
            let result = simulate_braking(&snapshot, &settings, 0.0);
            assert!(result.time <= settings.max_simulation_time + 1.0e-4);
            assert!(result.location.iter().all(|c| c.is_finite()));
        }
    }

    #[test]
    fn ground_probe_corrects_height() {
        let settings = DistanceMatchingSettings::default();
        let probe = StaticWorldProbe::new(vec![StaticShape::ground(0.25)]);
        let snapshot = moving(Vec3::new(1.0, 0.0, 0.0), MovementParams::default());

        let result = predict_stop(&snapshot, &settings, 1.0 / 60.0, &probe);
        let expected_z = 0.25 + snapshot.capsule.half_height + snapshot.ground_distance;
        assert!((result.location.z - expected_z).abs() < 1.0e-3);
    }

    #[test]
    fn unbounded_time_ceiling_is_clamped() {
        let snapshot = moving(Vec3::new(1.0, 0.0, 0.0), MovementParams::frictionless());
        for settings in [
            DistanceMatchingSettings {
                max_simulation_time: f32::INFINITY,
                ..DistanceMatchingSettings::default()
            },
            DistanceMatchingSettings {
                max_simulation_time: f32::NAN,
                max_simulation_time_step: 0.0,
                ..DistanceMatchingSettings::default()
            },
        ] {
            let ceiling = settings.sanitized().max_simulation_time;
            let result = simulate_braking(&snapshot, &settings, f32::NAN);
            assert!((result.time - ceiling).abs() < 1.0e-3, "t = {}", result.time);
            assert!((result.location.x - ceiling).abs() < 1.0e-3);
        }
    }
}
