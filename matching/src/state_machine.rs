/*!
Motion-state machine.

Classifies the agent once per tick into one of [`MotionState`], runs the matching predictor
when a state is entered, and keeps the marker table current while the state lasts.

Tick order
1. Derive `is_moving` / `is_accelerating` from the snapshot.
2. Decide the next state. First matching rule wins:
   - falling upward, not already jumping: Jump
   - falling downward, not already falling: Fall
   - any other airborne tick keeps the current state
   - accelerating along the velocity while moving: Start
   - accelerating at least `min_pivot_angle` away from the velocity while moving: Pivot
   - moving without input: Stop
   - neither moving nor accelerating: None
3. On entry, capture or predict the state's markers.
4. Refresh distance and time of the active markers, clamped to `max_match_value`. This
   runs on every tick, the entry tick included: a departure clock reads `dt` and an
   arrival countdown reads `predicted - dt` once the entry tick is done.

Entries are edge-triggered: a state is never re-entered while it is active, so markers are
captured once per entry.
*/

use crate::{
    Vec3,
    collision::EnvironmentProbe,
    marker::{MarkerKind, MarkerSet, PredictionResult},
    predict::{predict_apex, predict_landing, predict_stop},
    settings::DistanceMatchingSettings,
    snapshot::{AgentStateProvider, KinematicSnapshot},
    utils::{clamp_range, safe_normal},
};

/// Motion phase of the agent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MotionState {
    #[default]
    None,
    Start,
    Stop,
    Pivot,
    Jump,
    Fall,
}

impl MotionState {
    /// Marker whose distance drives playback in this state.
    pub fn primary_marker(self) -> Option<MarkerKind> {
        match self {
            MotionState::None => None,
            MotionState::Start => Some(MarkerKind::Start),
            MotionState::Stop => Some(MarkerKind::Stop),
            MotionState::Pivot => Some(MarkerKind::Pivot),
            MotionState::Jump => Some(MarkerKind::Apex),
            MotionState::Fall => Some(MarkerKind::Landing),
        }
    }
}

/// Outcome of the per-tick state decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct StateDecision {
    state: MotionState,
    /// `state` differs from the previous tick's state.
    entered: bool,
    /// Acceleration went from zero to non-zero on this tick.
    acceleration_began: bool,
}

/// Per-agent classifier and marker bookkeeping.
#[derive(Clone, Debug)]
pub struct MotionStateMachine {
    settings: DistanceMatchingSettings,
    state: MotionState,
    markers: MarkerSet,
    is_moving: bool,
    is_accelerating: bool,
    was_accelerating: bool,
    inert: bool,
}

impl Default for MotionStateMachine {
    fn default() -> Self {
        Self::new(DistanceMatchingSettings::default())
    }
}

impl MotionStateMachine {
    /// Out-of-range settings are clamped (and logged) rather than rejected.
    pub fn new(settings: DistanceMatchingSettings) -> Self {
        if let Err(err) = settings.validate() {
            log::warn!("distance matching: {err}; clamping settings into range");
        }

        Self {
            settings: settings.sanitized(),
            state: MotionState::None,
            markers: MarkerSet::default(),
            is_moving: false,
            is_accelerating: false,
            was_accelerating: false,
            inert: false,
        }
    }

    #[inline]
    pub fn settings(&self) -> &DistanceMatchingSettings {
        &self.settings
    }

    #[inline]
    pub fn state(&self) -> MotionState {
        self.state
    }

    #[inline]
    pub fn markers(&self) -> &MarkerSet {
        &self.markers
    }

    #[inline]
    pub fn marker(&self, kind: MarkerKind) -> &PredictionResult {
        &self.markers[kind]
    }

    #[inline]
    pub fn is_moving(&self) -> bool {
        self.is_moving
    }

    #[inline]
    pub fn is_accelerating(&self) -> bool {
        self.is_accelerating
    }

    /// No agent state was available on the last tick.
    #[inline]
    pub fn is_inert(&self) -> bool {
        self.inert
    }

    /// Signed distance to the active state's primary marker, 0 in `None`.
    pub fn distance_to_marker(&self) -> f32 {
        self.state
            .primary_marker()
            .map_or(0.0, |kind| self.markers[kind].distance)
    }

    /// Back to `None` with zeroed markers, as if freshly created.
    pub fn reset(&mut self) {
        self.state = MotionState::None;
        self.markers = MarkerSet::default();
        self.is_moving = false;
        self.is_accelerating = false;
        self.was_accelerating = false;
    }

    /// Advance one tick.
    ///
    /// Returns the state entered on this tick, if any. Leaving a state for `None` reports
    /// `Some(MotionState::None)`. Non-positive or NaN `tick_delta` counts as 0.
    pub fn tick<P>(
        &mut self,
        snapshot: &KinematicSnapshot,
        tick_delta: f32,
        probe: &P,
    ) -> Option<MotionState>
    where
        P: EnvironmentProbe + ?Sized,
    {
        let dt = if tick_delta > 0.0 { tick_delta } else { 0.0 };

        if self.inert {
            log::debug!("distance matching: agent state available again");
            self.inert = false;
        }

        let threshold = self.settings.movement_threshold;
        self.is_moving = snapshot.velocity_size() > threshold;
        self.is_accelerating = snapshot.acceleration_size() > threshold;

        let decision = self.decide(snapshot);
        if decision.entered {
            log::debug!("motion state {:?} -> {:?}", self.state, decision.state);
            self.enter(decision, snapshot, dt, probe);
            self.state = decision.state;
        }

        self.refresh(snapshot.position, dt);

        self.was_accelerating = self.is_accelerating;

        decision.entered.then_some(decision.state)
    }

    /// [`tick`](Self::tick) with a snapshot pulled from `agent`.
    ///
    /// Without a snapshot the machine goes inert: state `None`, markers zeroed. The
    /// condition is logged once when it starts, not on every tick.
    pub fn tick_agent<A, P>(&mut self, agent: &A, tick_delta: f32, probe: &P) -> Option<MotionState>
    where
        A: AgentStateProvider + ?Sized,
        P: EnvironmentProbe + ?Sized,
    {
        match agent.kinematic_snapshot() {
            Some(snapshot) => self.tick(&snapshot, tick_delta, probe),
            None => {
                if !self.inert {
                    log::error!("distance matching: no agent state available, processing disabled");
                    self.inert = true;
                }
                self.reset();
                None
            }
        }
    }

    fn decide(&self, snapshot: &KinematicSnapshot) -> StateDecision {
        let current = self.state;
        let velocity = snapshot.velocity;
        let acceleration = snapshot.acceleration;
        let vz = snapshot.vertical_speed();

        let next = if snapshot.is_falling {
            if vz > 0.0 && current != MotionState::Jump {
                MotionState::Jump
            } else if vz < 0.0 && current != MotionState::Fall {
                MotionState::Fall
            } else {
                current
            }
        } else if self.is_accelerating
            && self.is_moving
            && velocity.dot(&acceleration) > 0.0
            && current != MotionState::Start
        {
            MotionState::Start
        } else if self.is_accelerating
            && self.is_moving
            && self.is_pivoting(velocity, acceleration)
            && current != MotionState::Pivot
        {
            MotionState::Pivot
        } else if self.is_moving && !self.is_accelerating && current != MotionState::Stop {
            MotionState::Stop
        } else if !self.is_moving && !self.is_accelerating {
            MotionState::None
        } else {
            current
        };

        StateDecision {
            state: next,
            entered: next != current,
            acceleration_began: self.is_accelerating && !self.was_accelerating,
        }
    }

    fn is_pivoting(&self, velocity: Vec3, acceleration: Vec3) -> bool {
        let alignment = safe_normal(velocity).dot(&safe_normal(acceleration));
        alignment <= self.settings.min_pivot_angle.cos()
    }

    fn enter<P>(&mut self, decision: StateDecision, snapshot: &KinematicSnapshot, dt: f32, probe: &P)
    where
        P: EnvironmentProbe + ?Sized,
    {
        let settings = &self.settings;
        let markers = &mut self.markers;

        match decision.state {
            MotionState::Jump => {
                markers[MarkerKind::TakeOff] = PredictionResult::at(snapshot.previous_position, 0.0);
                markers[MarkerKind::Apex] = predict_apex(snapshot, settings, probe);
            }
            MotionState::Fall => {
                markers[MarkerKind::Apex] = PredictionResult::at(snapshot.previous_position, 0.0);
                markers[MarkerKind::Landing] = predict_landing(snapshot, settings, probe);
            }
            MotionState::Start => {
                let origin = if !decision.acceleration_began && self.state == MotionState::Pivot {
                    markers[MarkerKind::Pivot].location
                } else {
                    snapshot.previous_position
                };
                markers[MarkerKind::Start] = PredictionResult::at(origin, 0.0);
            }
            MotionState::Pivot => {
                markers[MarkerKind::Pivot] = predict_stop(snapshot, settings, dt, probe);
            }
            MotionState::Stop => {
                markers[MarkerKind::Stop] = predict_stop(snapshot, settings, dt, probe);
            }
            MotionState::None => markers.clear(),
        }
    }

    fn refresh(&mut self, position: Vec3, dt: f32) {
        let max = self.settings.max_match_value;
        let markers = &mut self.markers;

        match self.state {
            MotionState::Start => {
                let marker = &mut markers[MarkerKind::Start];
                marker.distance = clamp_range((position - marker.location).norm(), 0.0, max);
                marker.time = clamp_range(marker.time + dt, 0.0, max);
            }
            MotionState::Stop | MotionState::Pivot => {
                let kind = if self.state == MotionState::Stop {
                    MarkerKind::Stop
                } else {
                    MarkerKind::Pivot
                };
                let marker = &mut markers[kind];
                marker.distance = clamp_range(-(position - marker.location).norm(), -max, 0.0);
                marker.time = clamp_range(marker.time - dt, 0.0, max);
            }
            MotionState::Jump => {
                let takeoff_z = markers[MarkerKind::TakeOff].location.z;
                let apex_z = markers[MarkerKind::Apex].location.z;
                let span = clamp_range(apex_z - takeoff_z, 0.0, max);

                let takeoff = &mut markers[MarkerKind::TakeOff];
                takeoff.distance = clamp_range(position.z - takeoff_z, 0.0, span);
                takeoff.time = clamp_range(takeoff.time + dt, 0.0, max);

                let apex = &mut markers[MarkerKind::Apex];
                apex.distance = -clamp_range(apex_z - position.z, 0.0, span);
                apex.time = clamp_range(apex.time - dt, 0.0, max);
            }
            MotionState::Fall => {
                let apex_z = markers[MarkerKind::Apex].location.z;
                let landing_z = markers[MarkerKind::Landing].location.z;
                let span = clamp_range(apex_z - landing_z, 0.0, max);

                let apex = &mut markers[MarkerKind::Apex];
                apex.distance = clamp_range(apex_z - position.z, 0.0, span);
                apex.time = clamp_range(apex.time + dt, 0.0, max);

                let landing = &mut markers[MarkerKind::Landing];
                landing.distance = -clamp_range(position.z - landing_z, 0.0, span);
                landing.time = clamp_range(landing.time - dt, 0.0, max);
            }
            MotionState::None => markers.clear(),
        }
    }
}
