use super::types::{CapsuleSpec, ProbeHit, Vec3};

/// Synchronous environment query used by the predictors.
///
/// Implementations must be deterministic for a fixed world so that predictions are
/// reproducible. Collision channels and ignore-lists belong to the implementation
/// (e.g. the rapier `QueryFilter` baked into [`super::RapierProbe`]), not to callers.
pub trait EnvironmentProbe {
    /// Sweep `capsule` with its center moving from `start` to `end`.
    ///
    /// Returns the earliest blocking hit, or `None` when the path is clear.
    fn sweep_capsule(&self, start: Vec3, end: Vec3, capsule: CapsuleSpec) -> Option<ProbeHit>;
}

impl<F> EnvironmentProbe for F
where
    F: Fn(Vec3, Vec3, CapsuleSpec) -> Option<ProbeHit>,
{
    #[inline]
    fn sweep_capsule(&self, start: Vec3, end: Vec3, capsule: CapsuleSpec) -> Option<ProbeHit> {
        self(start, end, capsule)
    }
}

/// A probe for an empty world: nothing is ever hit.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProbe;

impl EnvironmentProbe for NoProbe {
    #[inline]
    fn sweep_capsule(&self, _start: Vec3, _end: Vec3, _capsule: CapsuleSpec) -> Option<ProbeHit> {
        None
    }
}
