/*!
Prediction and matching settings.

Constants here centralize the tolerances used by the stop/pivot predictor, the
ballistic path predictor and the motion-state machine. `DistanceMatchingSettings`
carries the per-agent tunables; its defaults come from the constants below.

Notes
- Distances are in meters, time in seconds, Z is up.
- Tunables are clamped into the documented ranges by [`DistanceMatchingSettings::sanitized`].
*/

use std::f32::consts::{FRAC_PI_2, PI};

use crate::error::DistanceMatchingError;

/// Smallest time step a simulation loop will take (seconds).
pub const MIN_TICK_TIME: f32 = 1.0e-6;

/// Squared speed below which a predicted velocity counts as stopped (m^2/s^2).
pub const KINDA_SMALL_NUMBER: f32 = 1.0e-4;

/// Squared length below which an acceleration or velocity counts as zero.
pub const ZERO_VECTOR_SQ: f32 = 1.0e-8;

/// Speed/acceleration magnitude above which the agent counts as moving/accelerating.
pub const MOVEMENT_THRESHOLD: f32 = 1.0e-5;

/// While braking, speeds under this value snap to a full stop (m/s).
pub const BRAKE_TO_STOP_VELOCITY: f32 = 0.1;

/// Braking sub-steps are kept inside this window so low frame rates stay consistent.
pub const MIN_BRAKING_SUB_STEP_TIME: f32 = 1.0 / 75.0;
pub const MAX_BRAKING_SUB_STEP_TIME: f32 = 1.0 / 20.0;

/// Default gravity along Z (m/s^2).
pub const DEFAULT_GRAVITY_Z: f32 = -9.81;

pub const DEFAULT_MAX_SIMULATION_TIME: f32 = 2.0;
pub const MIN_MAX_SIMULATION_TIME: f32 = 0.1;
pub const MAX_MAX_SIMULATION_TIME: f32 = 5.0;

/// Upper bound on a single stop/pivot prediction step (seconds).
pub const DEFAULT_MAX_SIMULATION_TIME_STEP: f32 = 0.05;

pub const DEFAULT_BRAKING_SUB_STEP_TIME: f32 = 1.0 / 30.0;

/// Ceiling for marker distance (meters) and marker time (seconds).
pub const DEFAULT_MAX_MATCH_VALUE: f32 = 100.0;

/// Smallest velocity/input angle that reads as a pivot: `dot(n(v), n(a)) <= cos(angle)`.
/// 90 degrees pivots on any non-positive dot.
pub const DEFAULT_MIN_PIVOT_ANGLE: f32 = FRAC_PI_2;

/// Ballistic sub-steps per second.
pub const DEFAULT_APEX_SIMULATION_FREQUENCY: f32 = 20.0;
pub const DEFAULT_LANDING_SIMULATION_FREQUENCY: f32 = 15.0;
pub const MIN_SIMULATION_FREQUENCY: f32 = 1.0;
pub const MAX_SIMULATION_FREQUENCY: f32 = 240.0;

/// Per-agent tunables for prediction and marker bookkeeping.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DistanceMatchingSettings {
    /// Hard ceiling on every prediction loop (seconds), in `[0.1, 5.0]`.
    pub max_simulation_time: f32,
    /// Largest single stop/pivot prediction step (seconds).
    pub max_simulation_time_step: f32,
    /// Target braking sub-step (seconds), clamped to `[1/75, 1/20]`.
    pub braking_sub_step_time: f32,
    /// Speed at which braking snaps to a stop (m/s).
    pub brake_to_stop_velocity: f32,
    /// Clamp for marker distance and time.
    pub max_match_value: f32,
    /// Pivot threshold angle (radians), in `[0, PI]`.
    pub min_pivot_angle: f32,
    pub apex_simulation_frequency: f32,
    pub landing_simulation_frequency: f32,
    /// Magnitude above which velocity/acceleration count as non-zero.
    pub movement_threshold: f32,
}

impl Default for DistanceMatchingSettings {
    fn default() -> Self {
        Self {
            max_simulation_time: DEFAULT_MAX_SIMULATION_TIME,
            max_simulation_time_step: DEFAULT_MAX_SIMULATION_TIME_STEP,
            braking_sub_step_time: DEFAULT_BRAKING_SUB_STEP_TIME,
            brake_to_stop_velocity: BRAKE_TO_STOP_VELOCITY,
            max_match_value: DEFAULT_MAX_MATCH_VALUE,
            min_pivot_angle: DEFAULT_MIN_PIVOT_ANGLE,
            apex_simulation_frequency: DEFAULT_APEX_SIMULATION_FREQUENCY,
            landing_simulation_frequency: DEFAULT_LANDING_SIMULATION_FREQUENCY,
            movement_threshold: MOVEMENT_THRESHOLD,
        }
    }
}

impl DistanceMatchingSettings {
    /// Name, value, accepted range and fallback for every tunable.
    fn fields(&self) -> [(&'static str, f32, f32, f32, f32); 9] {
        let d = Self::default();
        [
            (
                "max_simulation_time",
                self.max_simulation_time,
                MIN_MAX_SIMULATION_TIME,
                MAX_MAX_SIMULATION_TIME,
                d.max_simulation_time,
            ),
            (
                "max_simulation_time_step",
                self.max_simulation_time_step,
                1.0e-3,
                0.25,
                d.max_simulation_time_step,
            ),
            (
                "braking_sub_step_time",
                self.braking_sub_step_time,
                MIN_BRAKING_SUB_STEP_TIME,
                MAX_BRAKING_SUB_STEP_TIME,
                d.braking_sub_step_time,
            ),
            (
                "brake_to_stop_velocity",
                self.brake_to_stop_velocity,
                0.0,
                100.0,
                d.brake_to_stop_velocity,
            ),
            (
                "max_match_value",
                self.max_match_value,
                KINDA_SMALL_NUMBER,
                1.0e6,
                d.max_match_value,
            ),
            (
                "min_pivot_angle",
                self.min_pivot_angle,
                0.0,
                PI,
                d.min_pivot_angle,
            ),
            (
                "apex_simulation_frequency",
                self.apex_simulation_frequency,
                MIN_SIMULATION_FREQUENCY,
                MAX_SIMULATION_FREQUENCY,
                d.apex_simulation_frequency,
            ),
            (
                "landing_simulation_frequency",
                self.landing_simulation_frequency,
                MIN_SIMULATION_FREQUENCY,
                MAX_SIMULATION_FREQUENCY,
                d.landing_simulation_frequency,
            ),
            (
                "movement_threshold",
                self.movement_threshold,
                0.0,
                1.0,
                d.movement_threshold,
            ),
        ]
    }

    /// Check every tunable against its range. Reports the first offender.
    pub fn validate(&self) -> Result<(), DistanceMatchingError> {
        for (name, value, min, max, _) in self.fields() {
            if !(min..=max).contains(&value) {
                return Err(DistanceMatchingError::SettingOutOfRange {
                    name,
                    value,
                    min,
                    max,
                });
            }
        }
        Ok(())
    }

    /// Copy with every tunable clamped into range; NaN falls back to the default.
    pub fn sanitized(&self) -> Self {
        let [
            max_simulation_time,
            max_simulation_time_step,
            braking_sub_step_time,
            brake_to_stop_velocity,
            max_match_value,
            min_pivot_angle,
            apex_simulation_frequency,
            landing_simulation_frequency,
            movement_threshold,
        ] = self.fields().map(|(_, value, min, max, fallback)| {
            if value.is_nan() {
                fallback
            } else {
                value.clamp(min, max)
            }
        });

        Self {
            max_simulation_time,
            max_simulation_time_step,
            braking_sub_step_time,
            brake_to_stop_velocity,
            max_match_value,
            min_pivot_angle,
            apex_simulation_frequency,
            landing_simulation_frequency,
            movement_threshold,
        }
    }

    /// Step used by the stop/pivot predictor for a tick of `tick_delta` seconds.
    ///
    /// A degenerate tick falls back to `max_simulation_time_step` so a marker captured
    /// on a zero-length tick still gets a real prediction.
    #[inline]
    pub fn prediction_time_step(&self, tick_delta: f32) -> f32 {
        if tick_delta > MIN_TICK_TIME {
            tick_delta.min(self.max_simulation_time_step)
        } else {
            self.max_simulation_time_step
        }
    }
}
