//! Per-state markers: where an event happened or will happen, and how far/long from it.

use std::ops::{Index, IndexMut};

use crate::Vec3;

/// Marker slot kinds. Departure markers (Start, TakeOff, Apex while falling) count up,
/// arrival markers (Stop, Pivot, Apex while jumping, Landing) count down.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MarkerKind {
    Start,
    Stop,
    Pivot,
    TakeOff,
    Apex,
    Landing,
}

impl MarkerKind {
    pub const ALL: [MarkerKind; 6] = [
        MarkerKind::Start,
        MarkerKind::Stop,
        MarkerKind::Pivot,
        MarkerKind::TakeOff,
        MarkerKind::Apex,
        MarkerKind::Landing,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Event location plus the live signed distance and time to it.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PredictionResult {
    pub location: Vec3,
    /// Positive moving away from a departure, negative approaching an arrival.
    pub distance: f32,
    /// Seconds since a departure or until an arrival.
    pub time: f32,
}

impl Default for PredictionResult {
    fn default() -> Self {
        Self {
            location: Vec3::zeros(),
            distance: 0.0,
            time: 0.0,
        }
    }
}

impl PredictionResult {
    #[inline]
    pub fn at(location: Vec3, time: f32) -> Self {
        Self {
            location,
            distance: 0.0,
            time,
        }
    }

    /// Zero distance and time, keep the location.
    #[inline]
    pub fn reset_progress(&mut self) {
        self.distance = 0.0;
        self.time = 0.0;
    }
}

/// One [`PredictionResult`] per [`MarkerKind`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarkerSet {
    slots: [PredictionResult; 6],
}

impl MarkerSet {
    /// Reset distance and time on every slot; locations are kept.
    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(PredictionResult::reset_progress);
    }

    pub fn iter(&self) -> impl Iterator<Item = (MarkerKind, &PredictionResult)> {
        MarkerKind::ALL.into_iter().zip(self.slots.iter())
    }
}

impl Index<MarkerKind> for MarkerSet {
    type Output = PredictionResult;

    #[inline]
    fn index(&self, kind: MarkerKind) -> &PredictionResult {
        &self.slots[kind.index()]
    }
}

impl IndexMut<MarkerKind> for MarkerSet {
    #[inline]
    fn index_mut(&mut self, kind: MarkerKind) -> &mut PredictionResult {
        &mut self.slots[kind.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_are_keyed_by_kind() {
        let mut markers = MarkerSet::default();
        markers[MarkerKind::Apex] = PredictionResult::at(Vec3::new(0.0, 0.0, 1.2), 0.4);
        markers[MarkerKind::Stop].distance = -2.0;

        assert_eq!(markers[MarkerKind::Apex].time, 0.4);
        assert_eq!(markers[MarkerKind::Stop].distance, -2.0);
        assert_eq!(markers[MarkerKind::Start], PredictionResult::default());
        assert_eq!(markers.iter().count(), 6);
    }

    #[test]
    fn clear_keeps_locations() {
        let mut markers = MarkerSet::default();
        markers[MarkerKind::Landing] = PredictionResult {
            location: Vec3::new(1.0, 2.0, 0.0),
            distance: -3.0,
            time: 0.8,
        };
        markers.clear();

        let landing = markers[MarkerKind::Landing];
        assert_eq!(landing.location, Vec3::new(1.0, 2.0, 0.0));
        assert_eq!(landing.distance, 0.0);
        assert_eq!(landing.time, 0.0);
    }
}
