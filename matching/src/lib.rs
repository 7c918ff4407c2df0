/*!
Distance matching: motion-state prediction and distance-driven clip playback.

A [`MotionStateMachine`] classifies an agent into Start/Stop/Pivot/Jump/Fall each tick and
keeps a marker per event (where it happened or will happen, how far and how long from it).
A [`DistanceMatchingPlayer`] turns a marker distance back into a clip time through the
clip's [`DistanceCurve`].

Environment queries go through [`EnvironmentProbe`]; [`StaticWorldProbe`] and [`RapierProbe`]
are the bundled implementations.
*/

pub mod collision;
pub mod curve;
pub mod error;
pub mod marker;
pub mod playback;
pub mod predict;
pub mod settings;
pub mod snapshot;
pub mod state_machine;
pub mod utils;

pub use collision::{
    CapsuleSpec, EnvironmentProbe, NoProbe, ProbeHit, RapierProbe, RapierQueryWorld,
    StaticShape, StaticWorldProbe, Vec3,
};
pub use curve::{DistanceCurve, DistanceCurveSample, sample_time};
pub use error::DistanceMatchingError;
pub use marker::{MarkerKind, MarkerSet, PredictionResult};
pub use playback::{DistanceMatchingPlayer, PlaybackMode, PlaybackSettings};
pub use settings::DistanceMatchingSettings;
pub use snapshot::{AgentStateProvider, KinematicSnapshot, MovementParams};
pub use state_machine::{MotionState, MotionStateMachine};
