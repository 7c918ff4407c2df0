use thiserror::Error;

/// Load-time errors. Per-tick paths never fail; they degrade to inert results instead.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DistanceMatchingError {
    #[error("distance curve sample {index} has a non-finite time or value")]
    NonFiniteSample { index: usize },

    #[error("distance curve time decreases at sample {index} ({previous} -> {time})")]
    DecreasingTime {
        index: usize,
        previous: f32,
        time: f32,
    },

    #[error("distance curve value decreases at sample {index} ({previous} -> {value})")]
    DecreasingDistance {
        index: usize,
        previous: f32,
        value: f32,
    },

    #[error("setting `{name}` is {value}, expected a value in [{min}, {max}]")]
    SettingOutOfRange {
        name: &'static str,
        value: f32,
        min: f32,
        max: f32,
    },
}
