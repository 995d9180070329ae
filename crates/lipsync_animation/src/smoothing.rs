//! Influence smoothing and decay.
//!
//! Active frames move each slot toward a shaped, amplified target:
//!
//! ```text
//! shaped    = min(1, raw ^ exponent)        (0 when raw <= 0)
//! target    = min(1, gain * shaped)
//! rate      = attack if raw > threshold else release
//! influence = lerp(influence, target, rate)
//! ```
//!
//! Idle frames lerp every bound slot toward zero instead. Both paths finish
//! with a dead-zone snap so a slot reaches exactly zero in a bounded number of
//! frames.

use lipsync_core::EngineSettings;
use lipsync_scene::MorphTargetMesh;

use crate::locator::{CueBlend, lerp};
use crate::resolver::MorphBinding;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Smoother {
    pub exponent: f32,
    pub gain: f32,
    pub activity_threshold: f32,
    pub attack_rate: f32,
    pub release_rate: f32,
    pub idle_decay_rate: f32,
    pub dead_zone: f32,
}

impl Default for Smoother {
    fn default() -> Self {
        Self::from_settings(&EngineSettings::default())
    }
}

impl Smoother {
    #[must_use]
    pub fn from_settings(settings: &EngineSettings) -> Self {
        Self {
            exponent: settings.shaping_exponent,
            gain: settings.gain,
            activity_threshold: settings.activity_threshold,
            attack_rate: settings.attack_rate,
            release_rate: settings.release_rate,
            idle_decay_rate: settings.idle_decay_rate,
            dead_zone: settings.dead_zone,
        }
    }

    #[inline]
    #[must_use]
    pub fn shape(&self, raw: f32) -> f32 {
        if raw > 0.0 {
            raw.powf(self.exponent).min(1.0)
        } else {
            0.0
        }
    }

    #[inline]
    #[must_use]
    pub fn target(&self, raw: f32) -> f32 {
        (self.gain * self.shape(raw)).min(1.0)
    }

    #[inline]
    #[must_use]
    pub fn rate(&self, raw: f32) -> f32 {
        if raw > self.activity_threshold {
            self.attack_rate
        } else {
            self.release_rate
        }
    }

    #[inline]
    fn snap(&self, value: f32) -> f32 {
        if value < self.dead_zone { 0.0 } else { value }
    }

    /// One active-frame update of a single influence.
    #[inline]
    #[must_use]
    pub fn step(&self, current: f32, raw: f32) -> f32 {
        self.snap(lerp(current, self.target(raw), self.rate(raw)))
    }

    /// One idle-frame update of a single influence.
    #[inline]
    #[must_use]
    pub fn decay(&self, current: f32) -> f32 {
        self.snap(lerp(current, 0.0, self.idle_decay_rate))
    }

    /// Drives every bound slot of `mesh` toward its resolved target.
    pub fn drive<M>(&self, mesh: &mut M, bindings: &[MorphBinding], blend: &CueBlend)
    where
        M: MorphTargetMesh + ?Sized,
    {
        let influences = mesh.morph_target_influences_mut();
        for binding in bindings {
            let raw = binding.resolution.raw_target(blend);
            influences[binding.slot] = self.step(influences[binding.slot], raw);
        }
    }

    /// Relaxes every bound slot of `mesh` toward rest.
    pub fn relax<M>(&self, mesh: &mut M, bindings: &[MorphBinding])
    where
        M: MorphTargetMesh + ?Sized,
    {
        let influences = mesh.morph_target_influences_mut();
        for binding in bindings {
            influences[binding.slot] = self.decay(influences[binding.slot]);
        }
    }
}
