//! Drives a simulated character through start/stop and jump/land sequences and checks the
//! markers against where the character actually ends up.

use distance_matching::{
    AgentStateProvider, CapsuleSpec, DistanceCurve, DistanceCurveSample, DistanceMatchingPlayer,
    DistanceMatchingSettings, KinematicSnapshot, MarkerKind, MotionState, MotionStateMachine,
    MovementParams, PlaybackSettings, RapierQueryWorld, Vec3,
    collision::{ColliderShapeDef, Quat, WorldStaticDef},
};
use rapier3d::prelude::QueryFilter;

const DT: f32 = 1.0 / 60.0;
const GROUND_DISTANCE: f32 = 0.02;

/// Minimal character: flat-ground walking with friction/braking, ballistic in the air.
struct Character {
    position: Vec3,
    previous_position: Vec3,
    velocity: Vec3,
    input: Vec3,
    falling: bool,
    capsule: CapsuleSpec,
    movement: MovementParams,
}

impl Character {
    fn standing() -> Self {
        let capsule = CapsuleSpec::new(0.35, 0.9);
        let position = Vec3::new(0.0, 0.0, capsule.half_height + GROUND_DISTANCE);
        Self {
            position,
            previous_position: position,
            velocity: Vec3::zeros(),
            input: Vec3::zeros(),
            falling: false,
            capsule,
            movement: MovementParams::default(),
        }
    }

    fn floor_z(&self) -> f32 {
        self.capsule.half_height + GROUND_DISTANCE
    }

    fn step(&mut self, dt: f32) {
        self.previous_position = self.position;

        if self.falling {
            let next_velocity = self.velocity + Vec3::new(0.0, 0.0, self.movement.gravity_z * dt);
            self.position += (self.velocity + next_velocity) * (0.5 * dt);
            self.velocity = next_velocity;
            if self.position.z <= self.floor_z() {
                self.position.z = self.floor_z();
                self.velocity.z = 0.0;
                self.falling = false;
            }
            return;
        }

        let friction = self.movement.effective_friction();
        if self.input.norm_squared() > 0.0 {
            let dir = self.input.normalize();
            let speed = self.velocity.norm();
            self.velocity -= (self.velocity - dir * speed) * (dt * friction).min(1.0);
            self.velocity += self.input * dt;
            self.velocity = self.velocity.cap_magnitude(6.0);
        } else if self.velocity.norm_squared() > 0.0 {
            let start = self.velocity;
            let braking = self.velocity.normalize() * -self.movement.effective_braking();
            self.velocity += (self.velocity * -friction + braking) * dt;
            if self.velocity.dot(&start) <= 0.0 || self.velocity.norm() <= 0.1 {
                self.velocity = Vec3::zeros();
            }
        }
        self.position += self.velocity * dt;
    }
}

impl AgentStateProvider for Character {
    fn kinematic_snapshot(&self) -> Option<KinematicSnapshot> {
        Some(KinematicSnapshot {
            position: self.position,
            previous_position: self.previous_position,
            velocity: self.velocity,
            acceleration: self.input,
            is_falling: self.falling,
            ground_distance: GROUND_DISTANCE,
            capsule: self.capsule,
            movement: self.movement,
        })
    }
}

fn ground_world() -> RapierQueryWorld {
    RapierQueryWorld::build(vec![WorldStaticDef {
        id: 0,
        translation: Vec3::zeros(),
        rotation: Quat::identity(),
        shape: ColliderShapeDef::Plane {
            offset_along_normal: 0.0,
        },
    }])
}

#[test]
fn start_then_stop_predicts_the_resting_point() {
    let world = ground_world();
    let probe = world.probe(QueryFilter::default());
    let mut machine = MotionStateMachine::new(DistanceMatchingSettings::default());
    let mut character = Character::standing();
    let mut events = Vec::new();

    character.input = Vec3::new(10.0, 0.0, 0.0);
    for _ in 0..60 {
        character.step(DT);
        events.extend(machine.tick_agent(&character, DT, &probe));
    }
    assert_eq!(events, vec![MotionState::Start]);
    assert_eq!(machine.marker(MarkerKind::Start).location.x, 0.0);
    assert!(machine.distance_to_marker() > 0.0);
    assert!((machine.marker(MarkerKind::Start).time - 60.0 * DT).abs() < 1.0e-4);

    character.input = Vec3::zeros();
    let mut predicted = None;
    let mut previous_distance = f32::NEG_INFINITY;
    for _ in 0..120 {
        let entered = machine.tick_agent(&character, DT, &probe);
        if entered == Some(MotionState::Stop) {
            predicted = Some(*machine.marker(MarkerKind::Stop));
        }
        if machine.state() == MotionState::Stop {
            let distance = machine.distance_to_marker();
            assert!(distance <= 0.0);
            assert!(distance >= previous_distance - 1.0e-4);
            previous_distance = distance;
        }
        events.extend(entered);
        character.step(DT);
    }

    assert_eq!(
        events,
        vec![MotionState::Start, MotionState::Stop, MotionState::None]
    );
    let predicted = predicted.expect("stop was entered");
    assert!(
        (predicted.location - character.position).norm() < 0.05,
        "predicted {:?}, actual {:?}",
        predicted.location,
        character.position
    );
    assert!((predicted.location.z - character.floor_z()).abs() < 1.0e-3);
}

#[test]
fn jump_and_land_track_apex_and_landing() {
    let world = ground_world();
    let probe = world.probe(QueryFilter::default());
    let mut machine = MotionStateMachine::default();
    let mut character = Character::standing();

    character.velocity = Vec3::new(1.0, 0.0, 4.5);
    character.falling = true;

    let mut events = Vec::new();
    let mut apex_prediction = None;
    let mut landing_prediction = None;
    let mut landed_at = None;
    let mut ticks_in_fall = 0u32;
    for _ in 0..240 {
        let was_falling = character.falling;
        character.step(DT);
        if was_falling && !character.falling {
            landed_at = Some(character.position);
        }

        let entered = machine.tick_agent(&character, DT, &probe);
        match entered {
            Some(MotionState::Jump) => apex_prediction = Some(*machine.marker(MarkerKind::Apex)),
            Some(MotionState::Fall) => landing_prediction = Some(*machine.marker(MarkerKind::Landing)),
            _ => {}
        }
        if machine.state() == MotionState::Fall {
            ticks_in_fall += 1;
        }
        events.extend(entered);
        if machine.state() == MotionState::None {
            break;
        }
    }

    // Lands with horizontal speed, so it brakes to a stop before coming to rest.
    assert_eq!(
        events,
        vec![
            MotionState::Jump,
            MotionState::Fall,
            MotionState::Stop,
            MotionState::None
        ]
    );

    let apex = apex_prediction.expect("jump was entered");
    let expected_apex_height = 4.5f32.powi(2) / (2.0 * 9.81);
    assert!((apex.location.z - character.floor_z() - expected_apex_height).abs() < 0.05);

    let landing = landing_prediction.expect("fall was entered");
    let landed_at = landed_at.expect("character landed");
    assert!((landing.location.z - character.floor_z()).abs() < 1.0e-2);
    assert!((landing.location.x - landed_at.x).abs() < 0.05);
    // The entry tick already counted the landing marker down once.
    assert!((landing.time + DT - ticks_in_fall as f32 * DT).abs() < 2.0 * DT);
}

#[test]
fn stop_distance_scrubs_a_stop_clip() {
    let curve = DistanceCurve::new(vec![
        DistanceCurveSample::new(0.0, -1.0),
        DistanceCurveSample::new(0.3, -0.4),
        DistanceCurveSample::new(0.6, -0.1),
        DistanceCurveSample::new(0.9, 0.0),
    ])
    .expect("curve is monotone");
    let mut player = DistanceMatchingPlayer::new(Some(curve), 0.9, PlaybackSettings::default());

    let world = ground_world();
    let probe = world.probe(QueryFilter::default());
    let mut machine = MotionStateMachine::default();
    let mut character = Character::standing();
    character.velocity = Vec3::new(3.0, 0.0, 0.0);

    let mut last_time = 0.0;
    for _ in 0..90 {
        machine.tick_agent(&character, DT, &probe);
        if machine.state() != MotionState::Stop {
            break;
        }
        let time = player.update(machine.distance_to_marker(), DT);
        assert!(time >= last_time - 1.0e-5, "{time} < {last_time}");
        assert!((0.0..=0.9).contains(&time));
        last_time = time;
        character.step(DT);
    }
    assert!(last_time > 0.3);
}
