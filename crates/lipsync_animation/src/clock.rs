//! Playback clock and idle scheduling.
//!
//! Elapsed time comes from the audio source while it is playing, otherwise
//! from the host's monotonic clock relative to `start_time`. A cleared
//! `start_time` is the idle state.
//!
//! The idle-stop "timer" is a single deadline, checked by [`PlaybackClock::poll`]
//! at the start of every frame. Arming a new deadline replaces the pending one,
//! so at most one is ever outstanding. Audio events and the deadline only
//! touch clock state; blending always happens later, inside the frame update.

use lipsync_core::Timeline;

/// The host's audio element, as far as lip-sync is concerned.
pub trait AudioSource {
    /// Playback position in seconds.
    fn current_time(&self) -> f64;

    fn paused(&self) -> bool;

    #[inline]
    fn is_playing(&self) -> bool {
        !self.paused()
    }
}

/// Playback notifications forwarded from the audio element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioEvent {
    Play,
    Pause,
    Ended,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlaybackClock {
    start_time: Option<f64>,
    idle_deadline: Option<f64>,
}

impl PlaybackClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn start_time(&self) -> Option<f64> {
        self.start_time
    }

    #[inline]
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.start_time.is_none()
    }

    /// Clock time at which the pending idle stop fires, if one is armed.
    #[inline]
    #[must_use]
    pub fn pending_idle_stop(&self) -> Option<f64> {
        self.idle_deadline
    }

    pub fn start(&mut self, now: f64) {
        self.start_time = Some(now);
    }

    pub fn stop(&mut self) {
        self.start_time = None;
    }

    /// Arms the idle stop for `now + max(last_end, 0) + tail`, replacing any
    /// pending one.
    pub fn arm_idle_stop(&mut self, now: f64, last_end: f64, tail: f64) {
        let at = now + last_end.max(0.0) + tail;
        if let Some(previous) = self.idle_deadline.replace(at) {
            log::debug!("Idle stop rearmed: {previous:.3}s -> {at:.3}s");
        }
    }

    pub fn cancel_idle_stop(&mut self) {
        self.idle_deadline = None;
    }

    /// Reacts to a new cue list: an empty one idles immediately, anything
    /// else restarts the fallback clock and rearms the idle stop.
    pub fn on_timeline_changed(&mut self, now: f64, timeline: &Timeline, idle_tail: f64) {
        if timeline.is_empty() {
            self.cancel_idle_stop();
            self.stop();
        } else {
            self.start(now);
            self.arm_idle_stop(now, timeline.last_end(), idle_tail);
        }
    }

    /// A play event resynchronises to the new playback onset, whatever the
    /// prior state. Pause and end leave stopping to the idle deadline.
    pub fn on_audio_event(&mut self, now: f64, event: AudioEvent) {
        match event {
            AudioEvent::Play => {
                self.start(now);
                log::info!("Audio play detected, beginning viseme sync");
            }
            AudioEvent::Pause | AudioEvent::Ended => {
                log::info!("Audio {event:?}, idle deadline will stop the animation");
            }
        }
    }

    /// Fires the idle stop if its deadline has passed. Returns whether it
    /// fired.
    pub fn poll(&mut self, now: f64) -> bool {
        match self.idle_deadline {
            Some(at) if now >= at => {
                self.idle_deadline = None;
                self.stop();
                log::debug!("Idle stop fired at {now:.3}s");
                true
            }
            _ => false,
        }
    }

    /// Elapsed playback time, or `None` when idle.
    #[must_use]
    pub fn elapsed(&self, now: f64, audio: Option<&dyn AudioSource>) -> Option<f64> {
        let start = self.start_time?;
        Some(match audio {
            Some(audio) if audio.is_playing() => audio.current_time().max(0.0),
            _ => (now - start).max(0.0),
        })
    }
}
