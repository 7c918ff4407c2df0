use nalgebra as na;

use super::{
    EnvironmentProbe, narrow_phase,
    types::{CapsuleSpec, Iso, ProbeHit, StaticShape, Vec3},
};

/// Probe over a plain list of static shapes, without building a rapier scene.
///
/// Every sweep tests every shape and keeps the earliest hit. This suits small arenas and
/// tests; larger worlds should go through [`super::RapierQueryWorld`].
#[derive(Clone, Debug, Default)]
pub struct StaticWorldProbe {
    statics: Vec<StaticShape>,
}

impl StaticWorldProbe {
    pub fn new(statics: Vec<StaticShape>) -> Self {
        Self { statics }
    }

    #[inline]
    pub fn statics(&self) -> &[StaticShape] {
        &self.statics
    }

    pub fn push(&mut self, shape: StaticShape) {
        self.statics.push(shape);
    }
}

impl EnvironmentProbe for StaticWorldProbe {
    fn sweep_capsule(&self, start: Vec3, end: Vec3, capsule: CapsuleSpec) -> Option<ProbeHit> {
        let capsule_shape = capsule.to_shape();
        let capsule_iso: Iso = Iso::from_parts(
            na::Translation3::new(start.x, start.y, start.z),
            na::UnitQuaternion::identity(),
        );

        narrow_phase::earliest_hit_capsule_vs_statics(
            capsule_iso,
            &capsule_shape,
            end - start,
            1.0,
            &self.statics,
        )
    }
}
