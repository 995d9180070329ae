//! The per-avatar lip-sync engine.
//!
//! [`LipSyncEngine`] owns all per-instance state ([`EngineState`]) and exposes
//! three kinds of entry points:
//!
//! - **Inputs**: [`set_cues`](LipSyncEngine::set_cues),
//!   [`attach_scene`](LipSyncEngine::attach_scene) and
//!   [`handle_audio_event`](LipSyncEngine::handle_audio_event). These only
//!   update state.
//! - **Frame**: [`update`](LipSyncEngine::update), called once per rendered
//!   frame by the host. All blending and influence writes happen here.
//! - **Queries**: idle state, pending idle stop, head rotation, last blend.
//!
//! # Frame Flow
//!
//! ```text
//! poll idle deadline ─► warm-up pulse ─► elapsed (audio | fallback clock)
//!        │                                   │
//!        │ idle                              ▼
//!        └──────► relax all slots      locate cues ─► resolve ─► smooth
//! ```

use std::sync::Arc;

use glam::Quat;

use lipsync_core::{EngineSettings, MonotonicClock, RawCue, TimeSource, Timeline};
use lipsync_scene::Scene;

use crate::clock::{AudioEvent, AudioSource, PlaybackClock};
use crate::discovery::MeshDiscovery;
use crate::locator::{CueBlend, lerp, locate};
use crate::profile::SemanticKey;
use crate::smoothing::Smoother;

/// Per-avatar animation state.
#[derive(Debug, Clone, Default)]
pub struct EngineState {
    pub clock: PlaybackClock,
    pub timeline: Timeline,
    /// The cue list the timeline was derived from, compared by identity.
    cues: Option<Arc<[RawCue]>>,
    pub last_log_time: f64,
    /// End of the warm-up pulse window, if one is active.
    pub pulse_until: Option<f64>,
    pub head_pitch: f32,
}

/// What a call to [`LipSyncEngine::update`] did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FrameOutcome {
    /// No animated meshes; nothing was touched.
    Skipped,
    /// Idle frame: every bound slot decayed toward rest.
    Idle,
    /// Slots were driven from the timeline.
    Active { elapsed: f64, blend: CueBlend },
}

pub struct LipSyncEngine<C: TimeSource = MonotonicClock> {
    settings: EngineSettings,
    smoother: Smoother,
    time: C,
    state: EngineState,
    discovery: Option<MeshDiscovery>,
    last_blend: CueBlend,
}

impl LipSyncEngine<MonotonicClock> {
    #[must_use]
    pub fn new(settings: EngineSettings) -> Self {
        Self::with_time_source(settings, MonotonicClock::new())
    }
}

impl Default for LipSyncEngine<MonotonicClock> {
    fn default() -> Self {
        Self::new(EngineSettings::default())
    }
}

impl<C: TimeSource> LipSyncEngine<C> {
    pub fn with_time_source(settings: EngineSettings, time: C) -> Self {
        Self {
            smoother: Smoother::from_settings(&settings),
            settings,
            time,
            state: EngineState::default(),
            discovery: None,
            last_blend: CueBlend::SILENCE,
        }
    }

    // ========================================================================
    // Inputs
    // ========================================================================

    /// Binds the engine to a (new) model.
    ///
    /// Runs discovery and drops the previous scene's discovery state. When a
    /// different scene was bound, the pending idle stop is cancelled so a
    /// stale deadline never reaches the new model; a first bind keeps it.
    /// Starts the warm-up pulse when one is configured.
    pub fn attach_scene(&mut self, scene: &mut Scene) {
        if self
            .discovery
            .as_ref()
            .is_some_and(|d| d.scene_id() != scene.id)
        {
            self.state.clock.cancel_idle_stop();
        }
        let discovery = MeshDiscovery::discover(scene);

        self.state.pulse_until = if !discovery.is_empty() && self.settings.pulse_seconds > 0.0 {
            Some(self.time.now() + self.settings.pulse_seconds)
        } else {
            None
        };
        self.discovery = Some(discovery);
    }

    /// Releases the current scene's discovery state.
    pub fn detach_scene(&mut self) {
        self.state.clock.cancel_idle_stop();
        self.state.pulse_until = None;
        self.discovery = None;
    }

    /// Replaces the cue list.
    ///
    /// Lists are compared by identity: passing the same `Arc` again is a
    /// no-op and returns `false`. A new list is normalized once; an empty one
    /// idles the engine immediately, a non-empty one restarts the fallback
    /// clock and rearms the idle stop.
    pub fn set_cues(&mut self, cues: Arc<[RawCue]>) -> bool {
        if self
            .state
            .cues
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, &cues))
        {
            return false;
        }

        let timeline = Timeline::normalize(&cues, &self.settings);
        log::info!(
            "Visemes processed: {} cue(s), milliseconds: {}, duration: {:.3}s",
            timeline.len(),
            timeline.from_milliseconds(),
            timeline.last_end()
        );

        let now = self.time.now();
        self.state
            .clock
            .on_timeline_changed(now, &timeline, self.settings.idle_tail);
        self.state.timeline = timeline;
        self.state.cues = Some(cues);
        true
    }

    /// Convenience for hosts holding a plain `Vec`.
    pub fn set_cue_list(&mut self, cues: Vec<RawCue>) -> bool {
        self.set_cues(Arc::from(cues))
    }

    pub fn clear_cues(&mut self) {
        self.set_cues(Arc::from(Vec::new()));
    }

    /// Forwards an audio element event. Only clock state changes.
    pub fn handle_audio_event(&mut self, event: AudioEvent) {
        let now = self.time.now();
        self.state.clock.on_audio_event(now, event);
    }

    // ========================================================================
    // Frame
    // ========================================================================

    /// Advances the animation by one frame and writes influences into
    /// `scene`.
    ///
    /// A scene other than the attached one is attached first.
    pub fn update(&mut self, scene: &mut Scene, audio: Option<&dyn AudioSource>) -> FrameOutcome {
        if self.discovery.as_ref().is_none_or(|d| d.scene_id() != scene.id) {
            self.attach_scene(scene);
        }

        let now = self.time.now();
        self.state.clock.poll(now);

        if let Some(until) = self.state.pulse_until {
            if now >= until {
                self.state.pulse_until = None;
            } else if self.state.clock.is_idle() {
                self.state.clock.start(now);
            }
        }

        let Some(discovery) = self.discovery.as_ref() else {
            return FrameOutcome::Skipped;
        };
        if discovery.is_empty() {
            return FrameOutcome::Skipped;
        }

        let Some(elapsed) = self.state.clock.elapsed(now, audio) else {
            for animated in discovery.meshes() {
                if let Some(mesh) = scene.get_mesh_mut(animated.key) {
                    self.smoother.relax(mesh, &animated.bindings);
                }
            }
            self.last_blend = CueBlend::SILENCE;
            return FrameOutcome::Idle;
        };

        let blend = locate(
            self.state.timeline.cues(),
            elapsed,
            self.settings.blend_epsilon,
        );

        if now - self.state.last_log_time > self.settings.log_interval {
            self.state.last_log_time = now;
            log::debug!(
                "tick time={elapsed:.2} prev={} next={} blend={:.2}",
                blend.prev,
                blend.next.map_or("-", |v| v.as_str()),
                blend.blend
            );
        }

        for animated in discovery.meshes() {
            if let Some(mesh) = scene.get_mesh_mut(animated.key) {
                self.smoother.drive(mesh, &animated.bindings, &blend);
            }
        }

        let jaw = match blend.weight(SemanticKey::JawOpen) {
            w if w != 0.0 => w,
            _ => blend.weight(SemanticKey::MouthOpen),
        };
        self.state.head_pitch = lerp(
            self.state.head_pitch,
            -self.settings.head_nod_scale * jaw,
            self.settings.head_nod_rate,
        );

        let audio_playing = audio.is_some_and(AudioSource::is_playing);
        if !audio_playing && elapsed > self.state.timeline.last_end() + self.settings.finish_tail {
            log::debug!("Playback finished at {elapsed:.3}s, returning to idle");
            self.state.clock.stop();
        }

        self.last_blend = blend;
        FrameOutcome::Active { elapsed, blend }
    }

    // ========================================================================
    // Queries
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> &EngineState {
        &self.state
    }

    #[inline]
    #[must_use]
    pub fn timeline(&self) -> &Timeline {
        &self.state.timeline
    }

    #[inline]
    #[must_use]
    pub fn discovery(&self) -> Option<&MeshDiscovery> {
        self.discovery.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn time_source(&self) -> &C {
        &self.time
    }

    #[inline]
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.state.clock.is_idle()
    }

    /// Clock time at which the pending idle stop fires, if any.
    #[inline]
    #[must_use]
    pub fn pending_idle_stop(&self) -> Option<f64> {
        self.state.clock.pending_idle_stop()
    }

    /// The blend used by the most recent frame; silence after an idle frame.
    #[inline]
    #[must_use]
    pub fn last_blend(&self) -> CueBlend {
        self.last_blend
    }

    /// Smoothed head pitch in radians, following the jaw.
    #[inline]
    #[must_use]
    pub fn head_pitch(&self) -> f32 {
        self.state.head_pitch
    }

    /// Rotation the host may apply to the avatar root for a subtle nod.
    #[inline]
    #[must_use]
    pub fn head_rotation(&self) -> Quat {
        Quat::from_rotation_x(self.state.head_pitch)
    }
}
