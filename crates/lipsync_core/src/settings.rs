//! Engine Settings
//!
//! Tunable constants for timeline normalization, playback scheduling and
//! morph smoothing. [`EngineSettings::default`] carries the reference values;
//! hosts usually override a handful of fields with struct-update syntax.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lipsync_core::settings::EngineSettings;
//!
//! // Reference tuning
//! let settings = EngineSettings::default();
//!
//! // Livelier mouth, longer warm-up pulse after a model loads
//! let settings = EngineSettings {
//!     gain: 6.0,
//!     pulse_seconds: 3.0,
//!     ..Default::default()
//! };
//!
//! // Or from a JSON file shipped with the avatar
//! let settings = EngineSettings::from_json(r#"{ "gain": 4.0 }"#)?;
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::Result;

/// Tuning for a lip-sync engine instance.
///
/// Rates are per-frame lerp factors in `[0, 1]`; times are seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    // === Timeline ===
    /// Length given to a cue with no usable end and no timed successor.
    pub default_cue_length: f64,
    /// Any timestamp above this marks the whole list as milliseconds.
    pub millisecond_threshold: f64,

    // === Playback ===
    /// Delay past the last cue end before the idle deadline fires.
    pub idle_tail: f64,
    /// Slack past the last cue end after which a frame without playing audio
    /// returns the engine to idle.
    pub finish_tail: f64,
    /// Minimum denominator when blending between two cue onsets.
    pub blend_epsilon: f64,
    /// Seconds after mesh discovery during which the active path is forced.
    /// Zero disables the pulse.
    pub pulse_seconds: f64,
    /// Minimum clock time between two debug tick log lines.
    pub log_interval: f64,

    // === Shaping ===
    /// Exponent of the convex shaping curve applied to raw targets.
    pub shaping_exponent: f32,
    /// Multiplier applied after shaping.
    pub gain: f32,
    /// Raw targets above this use the attack rate, others the release rate.
    pub activity_threshold: f32,
    pub attack_rate: f32,
    pub release_rate: f32,
    /// Rate toward zero used on idle frames.
    pub idle_decay_rate: f32,
    /// Influences below this snap to exactly zero.
    pub dead_zone: f32,

    // === Head motion ===
    /// Pitch (radians) applied at a fully open jaw. The head tips back, so
    /// the resulting pitch is negative.
    pub head_nod_scale: f32,
    pub head_nod_rate: f32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            default_cue_length: 0.08,
            millisecond_threshold: 1000.0,

            idle_tail: 0.2,
            finish_tail: 0.15,
            blend_epsilon: 1e-4,
            pulse_seconds: 0.0,
            log_interval: 0.2,

            shaping_exponent: 1.12,
            gain: 5.4,
            activity_threshold: 0.01,
            attack_rate: 0.38,
            release_rate: 0.18,
            idle_decay_rate: 0.32,
            dead_zone: 0.001,

            head_nod_scale: 0.03,
            head_nod_rate: 0.08,
        }
    }
}

impl EngineSettings {
    /// Parses settings from JSON. Missing fields keep their reference values.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON settings file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Returns a copy with the warm-up pulse enabled.
    #[must_use]
    pub fn with_pulse(mut self, seconds: f64) -> Self {
        self.pulse_seconds = seconds.max(0.0);
        self
    }
}
