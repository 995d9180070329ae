//! Timeline normalization.
//!
//! Turns a raw cue list with partial, possibly millisecond-scaled timing into
//! an ordered sequence of closed intervals in seconds:
//!
//! 1. `start` is the cue's `start`, else its `time`, else `0`.
//! 2. `end` is the cue's `end`, else the next cue's onset, else
//!    `start + default_cue_length`.
//! 3. If any value exceeds the millisecond threshold, every value is divided
//!    by 1000. Detection is all-or-nothing for the whole list.
//! 4. Cues are stable-sorted by `start` and each `end` is raised to at least
//!    its `start`.
//!
//! Non-finite numbers count as absent. An empty input gives an empty timeline.

use crate::cue::{NormalizedCue, RawCue};
use crate::settings::EngineSettings;

/// An immutable, ordered cue sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timeline {
    cues: Vec<NormalizedCue>,
    from_milliseconds: bool,
    last_end: f64,
}

impl Timeline {
    /// Normalizes with the fill length and unit threshold from `settings`.
    #[must_use]
    pub fn normalize(raw: &[RawCue], settings: &EngineSettings) -> Self {
        Self::normalize_with(
            raw,
            settings.default_cue_length,
            settings.millisecond_threshold,
        )
    }

    #[must_use]
    pub fn normalize_with(raw: &[RawCue], default_cue_length: f64, ms_threshold: f64) -> Self {
        if raw.is_empty() {
            return Self::default();
        }

        let mut cues: Vec<NormalizedCue> = raw
            .iter()
            .enumerate()
            .map(|(i, cue)| {
                let start = cue.onset().unwrap_or(0.0);
                let end = cue
                    .finite_end()
                    .or_else(|| raw.get(i + 1).and_then(RawCue::onset))
                    .unwrap_or(start + default_cue_length);
                NormalizedCue {
                    start,
                    end,
                    value: cue.value,
                }
            })
            .collect();

        let from_milliseconds = cues
            .iter()
            .any(|c| c.start > ms_threshold || c.end > ms_threshold);
        if from_milliseconds {
            for cue in &mut cues {
                cue.start /= 1000.0;
                cue.end /= 1000.0;
            }
        }

        // Stable, so cues sharing an onset keep their input order.
        cues.sort_by(|a, b| a.start.total_cmp(&b.start));
        for cue in &mut cues {
            cue.end = cue.end.max(cue.start);
        }

        let last_end = cues.iter().map(|c| c.end).fold(f64::NEG_INFINITY, f64::max);

        log::debug!(
            "Normalized {} cue(s), milliseconds: {from_milliseconds}, last end: {last_end:.3}s",
            cues.len()
        );

        Self {
            cues,
            from_milliseconds,
            last_end,
        }
    }

    #[inline]
    #[must_use]
    pub fn cues(&self) -> &[NormalizedCue] {
        &self.cues
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.cues.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    /// Whether the input was detected as milliseconds and rescaled.
    #[inline]
    #[must_use]
    pub fn from_milliseconds(&self) -> bool {
        self.from_milliseconds
    }

    /// The greatest `end` on the timeline, clamped to be non-negative.
    /// Zero for an empty timeline.
    #[inline]
    #[must_use]
    pub fn last_end(&self) -> f64 {
        if self.cues.is_empty() {
            0.0
        } else {
            self.last_end.max(0.0)
        }
    }
}
