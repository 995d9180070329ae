//! Cue location and co-articulation blending.
//!
//! Given the elapsed playback time, finds the cue in effect (`prev`, the last
//! cue whose onset has passed) and the one after it (`next`), and expresses
//! the position between their onsets as a blend factor. Weights are then
//! linearly interpolated between the two visemes' profiles.

use lipsync_core::{NormalizedCue, Viseme};

use crate::profile::{SemanticKey, WeightProfile};

/// The bracketing cue pair for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CueBlend {
    /// Viseme in effect; silence before the first cue.
    pub prev: Viseme,
    /// Viseme of the next cue, if any.
    pub next: Option<Viseme>,
    /// Position between the two onsets, in `[0, 1]`. Zero when either side is
    /// missing.
    pub blend: f32,
}

impl Default for CueBlend {
    fn default() -> Self {
        Self::SILENCE
    }
}

impl CueBlend {
    pub const SILENCE: CueBlend = CueBlend {
        prev: Viseme::SILENCE,
        next: None,
        blend: 0.0,
    };

    /// Blended profile weight of `key`. With no next cue, the previous
    /// profile's weight is returned unchanged.
    #[inline]
    #[must_use]
    pub fn weight(&self, key: SemanticKey) -> f32 {
        let a = WeightProfile::of(self.prev).weight(key);
        let b = self.next.map_or(a, |next| WeightProfile::of(next).weight(key));
        lerp(a, b, self.blend)
    }

    /// How strongly `viseme` is the blended symbol: 1 when it is the only
    /// contributor, 0 when it is absent from both sides.
    #[inline]
    #[must_use]
    pub fn presence(&self, viseme: Viseme) -> f32 {
        let a = if self.prev == viseme { 1.0 } else { 0.0 };
        let b = self.next.map_or(a, |next| if next == viseme { 1.0 } else { 0.0 });
        lerp(a, b, self.blend)
    }
}

#[inline]
pub(crate) fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// `clamp((elapsed - prev_start) / max(epsilon, next_start - prev_start), 0, 1)`.
#[inline]
#[must_use]
pub fn blend_factor(prev_start: f64, next_start: f64, elapsed: f64, epsilon: f64) -> f32 {
    let denom = (next_start - prev_start).max(epsilon);
    ((elapsed - prev_start) / denom).clamp(0.0, 1.0) as f32
}

/// Locates the bracketing cues around `elapsed`.
///
/// `cues` must be sorted by `start`. Cue lists are at most a few hundred
/// entries, so a single linear scan per frame is fine. When several cues share
/// an onset, the last of them is taken as `prev`.
#[must_use]
pub fn locate(cues: &[NormalizedCue], elapsed: f64, epsilon: f64) -> CueBlend {
    let mut prev: Option<&NormalizedCue> = None;
    let mut next: Option<&NormalizedCue> = None;
    for cue in cues {
        if cue.start <= elapsed {
            prev = Some(cue);
        } else {
            next = Some(cue);
            break;
        }
    }

    let blend = match (prev, next) {
        (Some(p), Some(n)) => blend_factor(p.start, n.start, elapsed, epsilon),
        _ => 0.0,
    };

    CueBlend {
        prev: prev.map_or(Viseme::SILENCE, |c| c.value),
        next: next.map(|c| c.value),
        blend,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cue(value: Viseme, start: f64, end: f64) -> NormalizedCue {
        NormalizedCue { start, end, value }
    }

    #[test]
    fn test_before_first_cue_is_silence() {
        let cues = [cue(Viseme::D, 0.5, 0.8)];
        let blend = locate(&cues, 0.1, 1e-4);
        assert_eq!(blend.prev, Viseme::X);
        assert_eq!(blend.next, Some(Viseme::D));
        assert_eq!(blend.blend, 0.0);
    }

    #[test]
    fn test_presence_follows_blend() {
        let blend = CueBlend {
            prev: Viseme::D,
            next: Some(Viseme::X),
            blend: 0.25,
        };
        assert_eq!(blend.presence(Viseme::D), 0.75);
        assert_eq!(blend.presence(Viseme::X), 0.25);
        assert_eq!(blend.presence(Viseme::A), 0.0);
    }

    #[test]
    fn test_empty_timeline_is_silence() {
        assert_eq!(locate(&[], 3.0, 1e-4), CueBlend::SILENCE);
    }
}
