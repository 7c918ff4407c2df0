//! Distance-driven playback of a single clip.
//!
//! [`DistanceMatchingPlayer`] owns the playback time of one clip. Each update either scrubs
//! the clip to the time its distance curve assigns to the live distance, or, when matching
//! is off or the distance is past the configured limit, plays the clip forward normally.

use crate::{curve::DistanceCurve, utils::clamp_range};

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlaybackSettings {
    /// Global switch; when off the clip always plays normally.
    pub enabled: bool,
    /// At or beyond this distance the clip plays normally instead of being scrubbed.
    pub distance_limit: Option<f32>,
    /// Rate used while playing normally.
    pub play_rate: f32,
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            distance_limit: None,
            play_rate: 1.0,
        }
    }
}

/// How the last update moved the playback time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PlaybackMode {
    /// Nothing happened yet, or the curve was missing.
    #[default]
    Idle,
    /// Time was taken from the distance curve.
    Matching,
    /// Time advanced with the tick.
    Playing,
}

#[derive(Clone, Debug, Default)]
pub struct DistanceMatchingPlayer {
    curve: Option<DistanceCurve>,
    play_length: f32,
    time: f32,
    settings: PlaybackSettings,
    mode: PlaybackMode,
    missing_curve_logged: bool,
}

impl DistanceMatchingPlayer {
    pub fn new(curve: Option<DistanceCurve>, play_length: f32, settings: PlaybackSettings) -> Self {
        Self {
            curve,
            play_length: play_length.max(0.0),
            time: 0.0,
            settings,
            mode: PlaybackMode::Idle,
            missing_curve_logged: false,
        }
    }

    /// Swap the clip. Playback restarts from 0.
    pub fn set_clip(&mut self, curve: Option<DistanceCurve>, play_length: f32) {
        self.curve = curve;
        self.play_length = play_length.max(0.0);
        self.missing_curve_logged = false;
        self.initialize();
    }

    /// Rewind to 0, e.g. when the clip becomes relevant again.
    pub fn initialize(&mut self) {
        self.time = 0.0;
        self.mode = PlaybackMode::Idle;
    }

    #[inline]
    pub fn time(&self) -> f32 {
        self.time
    }

    #[inline]
    pub fn play_length(&self) -> f32 {
        self.play_length
    }

    #[inline]
    pub fn mode(&self) -> PlaybackMode {
        self.mode
    }

    #[inline]
    pub fn is_matching(&self) -> bool {
        self.mode == PlaybackMode::Matching
    }

    #[inline]
    pub fn settings(&self) -> &PlaybackSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut PlaybackSettings {
        &mut self.settings
    }

    /// Advance one tick with the live `distance`; returns the new playback time.
    pub fn update(&mut self, distance: f32, tick_delta: f32) -> f32 {
        let dt = if tick_delta > 0.0 { tick_delta } else { 0.0 };

        if !self.settings.enabled {
            self.play(dt);
            return self.time;
        }

        let curve = match self.curve.as_ref().filter(|c| !c.is_empty()) {
            Some(curve) => curve,
            None => {
                if !self.missing_curve_logged {
                    log::error!("distance matching: clip has no distance curve, keeping time at {:.3}", self.time);
                    self.missing_curve_logged = true;
                }
                self.mode = PlaybackMode::Idle;
                return self.time;
            }
        };

        if self.settings.distance_limit.is_some_and(|limit| distance >= limit) {
            self.play(dt);
        } else {
            self.time = clamp_range(curve.sample_time(distance), 0.0, self.play_length);
            self.mode = PlaybackMode::Matching;
        }
        self.time
    }

    fn play(&mut self, dt: f32) {
        self.time = clamp_range(self.time + dt * self.settings.play_rate, 0.0, self.play_length);
        self.mode = PlaybackMode::Playing;
    }
}
