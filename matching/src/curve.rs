/*!
Distance-to-time curve sampling.

A clip's distance curve maps playback time to distance travelled (or remaining).
Distance matching inverts it: given a live distance, find the playback time at
which the clip covers that distance.

Notes
- Samples are ordered by time; values are expected non-decreasing. [`DistanceCurve::new`]
  enforces both, [`DistanceCurve::new_clamped`] repairs values instead of rejecting them.
- Sampling is a binary search plus one lerp: O(log n), no allocation.
*/

use crate::{error::DistanceMatchingError, utils::lerp};

/// One `(time, value)` key of a distance curve.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DistanceCurveSample {
    pub time: f32,
    pub value: f32,
}

impl DistanceCurveSample {
    #[inline]
    pub const fn new(time: f32, value: f32) -> Self {
        Self { time, value }
    }
}

/// Playback time at which `samples` reach `distance`.
///
/// - No samples: 0.
/// - One sample, or `distance` at/over the last value: the last sample's time.
/// - Between two samples with equal values: the earlier sample's time.
/// - NaN distance: the first sample's time.
pub fn sample_time(samples: &[DistanceCurveSample], distance: f32) -> f32 {
    let (first, last) = match samples {
        [] => return 0.0,
        [only] => return only.time,
        [first, .., last] => (first, last),
    };

    if distance.is_nan() {
        return first.time;
    }
    if distance >= last.value {
        return last.time;
    }

    // First index in [1, len - 1) whose value exceeds `distance`; len - 1 if none does.
    let inner = &samples[1..samples.len() - 1];
    let next = 1 + inner.partition_point(|s| s.value <= distance);
    let prev = next - 1;

    let (a, b) = (samples[prev], samples[next]);
    let diff = b.value - a.value;
    if diff > 0.0 {
        lerp(a.time, b.time, (distance - a.value) / diff)
    } else {
        a.time
    }
}

/// Validated, owned distance curve.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DistanceCurve {
    samples: Vec<DistanceCurveSample>,
}

impl DistanceCurve {
    /// Build a curve, rejecting non-finite keys and decreasing time or value.
    pub fn new(samples: Vec<DistanceCurveSample>) -> Result<Self, DistanceMatchingError> {
        check_finite(&samples)?;

        for (index, pair) in samples.windows(2).enumerate() {
            let (a, b) = (pair[0], pair[1]);
            if b.time < a.time {
                return Err(DistanceMatchingError::DecreasingTime {
                    index: index + 1,
                    previous: a.time,
                    time: b.time,
                });
            }
            if b.value < a.value {
                return Err(DistanceMatchingError::DecreasingDistance {
                    index: index + 1,
                    previous: a.value,
                    value: b.value,
                });
            }
        }

        Ok(Self { samples })
    }

    /// Build a curve, repairing decreasing values with a running maximum.
    ///
    /// Time must still be finite and non-decreasing.
    pub fn new_clamped(mut samples: Vec<DistanceCurveSample>) -> Result<Self, DistanceMatchingError> {
        check_finite(&samples)?;

        let mut repaired = 0usize;
        let mut running_max = f32::NEG_INFINITY;
        for sample in &mut samples {
            if sample.value < running_max {
                sample.value = running_max;
                repaired += 1;
            } else {
                running_max = sample.value;
            }
        }
        if repaired > 0 {
            log::warn!("distance curve: raised {repaired} decreasing sample value(s) to keep it monotone");
        }

        Self::new(samples)
    }

    /// Wrap samples as they are. Sampling stays panic-free but results on a
    /// non-monotone curve are unspecified.
    pub fn from_samples_unchecked(samples: Vec<DistanceCurveSample>) -> Self {
        Self { samples }
    }

    #[inline]
    pub fn samples(&self) -> &[DistanceCurveSample] {
        &self.samples
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    #[inline]
    pub fn sample_time(&self, distance: f32) -> f32 {
        sample_time(&self.samples, distance)
    }

    /// Time of the last key, 0 for an empty curve.
    pub fn duration(&self) -> f32 {
        self.samples.last().map_or(0.0, |s| s.time)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for DistanceCurve {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        struct Raw {
            samples: Vec<DistanceCurveSample>,
        }

        let raw = Raw::deserialize(deserializer)?;
        Self::new(raw.samples).map_err(serde::de::Error::custom)
    }
}

fn check_finite(samples: &[DistanceCurveSample]) -> Result<(), DistanceMatchingError> {
    match samples
        .iter()
        .position(|s| !s.time.is_finite() || !s.value.is_finite())
    {
        Some(index) => Err(DistanceMatchingError::NonFiniteSample { index }),
        None => Ok(()),
    }
}
