//! Per-tick kinematic capture of the agent.
//!
//! A [`KinematicSnapshot`] is taken once per tick and never mutated while that tick's
//! predictions run. Hosts feed it either directly to
//! [`MotionStateMachine::tick`](crate::MotionStateMachine::tick) or through an
//! [`AgentStateProvider`].

use crate::{
    Vec3,
    collision::CapsuleSpec,
    settings::DEFAULT_GRAVITY_Z,
};

/// Braking, friction and gravity parameters of the agent's movement mode.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MovementParams {
    pub ground_friction: f32,
    /// Used instead of `ground_friction` while braking when `use_separate_braking_friction` is set.
    pub braking_friction: f32,
    pub use_separate_braking_friction: bool,
    pub braking_friction_factor: f32,
    /// Constant deceleration applied while braking without input (m/s^2).
    pub max_braking_deceleration: f32,
    pub gravity_z: f32,
}

impl Default for MovementParams {
    fn default() -> Self {
        Self {
            ground_friction: 8.0,
            braking_friction: 0.0,
            use_separate_braking_friction: false,
            braking_friction_factor: 2.0,
            max_braking_deceleration: 20.48,
            gravity_z: DEFAULT_GRAVITY_Z,
        }
    }
}

impl MovementParams {
    /// Coasting agent: no friction, no braking.
    pub fn frictionless() -> Self {
        Self {
            ground_friction: 0.0,
            braking_friction: 0.0,
            use_separate_braking_friction: false,
            braking_friction_factor: 0.0,
            max_braking_deceleration: 0.0,
            ..Self::default()
        }
    }

    /// `max(0, friction * max(0, braking_friction_factor))`.
    #[inline]
    pub fn effective_friction(&self) -> f32 {
        let friction = if self.use_separate_braking_friction {
            self.braking_friction
        } else {
            self.ground_friction
        };
        (friction * self.braking_friction_factor.max(0.0)).max(0.0)
    }

    #[inline]
    pub fn effective_braking(&self) -> f32 {
        self.max_braking_deceleration.max(0.0)
    }
}

/// Kinematic state of the agent for one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KinematicSnapshot {
    pub position: Vec3,
    /// Position at the previous tick; captured markers anchor here.
    pub previous_position: Vec3,
    pub velocity: Vec3,
    /// Input acceleration currently requested by the agent.
    pub acceleration: Vec3,
    pub is_falling: bool,
    /// Gap the movement mode keeps between the capsule and the floor (meters).
    pub ground_distance: f32,
    pub capsule: CapsuleSpec,
    pub movement: MovementParams,
}

impl KinematicSnapshot {
    /// Agent standing still at `position` with default movement parameters.
    pub fn at_rest(position: Vec3) -> Self {
        Self {
            position,
            previous_position: position,
            velocity: Vec3::zeros(),
            acceleration: Vec3::zeros(),
            is_falling: false,
            ground_distance: 0.02,
            capsule: CapsuleSpec::new(0.35, 0.9),
            movement: MovementParams::default(),
        }
    }

    pub fn with_previous_position(mut self, previous_position: Vec3) -> Self {
        self.previous_position = previous_position;
        self
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_acceleration(mut self, acceleration: Vec3) -> Self {
        self.acceleration = acceleration;
        self
    }

    pub fn with_falling(mut self, is_falling: bool) -> Self {
        self.is_falling = is_falling;
        self
    }

    pub fn with_movement(mut self, movement: MovementParams) -> Self {
        self.movement = movement;
        self
    }

    #[inline]
    pub fn velocity_size(&self) -> f32 {
        self.velocity.norm()
    }

    #[inline]
    pub fn acceleration_size(&self) -> f32 {
        self.acceleration.norm()
    }

    #[inline]
    pub fn vertical_speed(&self) -> f32 {
        self.velocity.z
    }

    #[inline]
    pub fn gravity_z(&self) -> f32 {
        self.movement.gravity_z
    }
}

/// Source of per-tick snapshots, e.g. the host's character movement component.
///
/// Returning `None` means the agent has no movement source this tick; the state machine
/// then goes inert instead of failing.
pub trait AgentStateProvider {
    fn kinematic_snapshot(&self) -> Option<KinematicSnapshot>;
}

impl AgentStateProvider for KinematicSnapshot {
    fn kinematic_snapshot(&self) -> Option<KinematicSnapshot> {
        Some(*self)
    }
}

impl AgentStateProvider for Option<KinematicSnapshot> {
    fn kinematic_snapshot(&self) -> Option<KinematicSnapshot> {
        *self
    }
}
