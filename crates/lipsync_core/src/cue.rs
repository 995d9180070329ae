//! Viseme cues as delivered by the alignment collaborator and after
//! normalization.

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::viseme::Viseme;

/// A cue as received. Every timing field is optional and may be expressed in
/// seconds or milliseconds; only `value` is required.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RawCue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<f64>,
    pub value: Viseme,
}

impl RawCue {
    #[must_use]
    pub fn new(value: Viseme) -> Self {
        Self {
            value,
            ..Default::default()
        }
    }

    /// A cue carrying an explicit `[start, end]` interval.
    #[must_use]
    pub fn interval(value: Viseme, start: f64, end: f64) -> Self {
        Self {
            time: None,
            start: Some(start),
            end: Some(end),
            value,
        }
    }

    /// A cue carrying only a point timestamp.
    #[must_use]
    pub fn at(value: Viseme, time: f64) -> Self {
        Self {
            time: Some(time),
            start: None,
            end: None,
            value,
        }
    }

    /// `start` if finite, else `time` if finite.
    #[inline]
    #[must_use]
    pub fn onset(&self) -> Option<f64> {
        finite(self.start).or_else(|| finite(self.time))
    }

    #[inline]
    #[must_use]
    pub fn finite_end(&self) -> Option<f64> {
        finite(self.end)
    }
}

#[inline]
fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

/// A cue on the canonical timeline: seconds, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedCue {
    pub start: f64,
    pub end: f64,
    pub value: Viseme,
}

impl NormalizedCue {
    #[inline]
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Parses a JSON array of raw cues, e.g.
/// `[{"value": "D", "start": 0.3, "end": 0.6}, {"value": "X", "time": 600}]`.
pub fn cues_from_json(payload: &str) -> Result<Vec<RawCue>> {
    let cues: Vec<RawCue> = serde_json::from_str(payload)?;
    Ok(cues)
}
