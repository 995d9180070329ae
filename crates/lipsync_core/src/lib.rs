//! Lipsync Core
//!
//! Foundational types shared by every lipsync crate:
//!
//! - [`Viseme`]: the fixed nine-symbol mouth-shape alphabet
//! - [`RawCue`] / [`NormalizedCue`]: cues before and after normalization
//! - [`Timeline`]: the normalizer and its ordered output
//! - [`EngineSettings`]: tunable constants with reference defaults
//! - [`TimeSource`]: monotonic clocks ([`MonotonicClock`], [`ManualClock`])
//! - [`LipSyncError`]: error type for the fallible edges of the system

pub mod cue;
pub mod errors;
pub mod settings;
pub mod time;
pub mod timeline;
pub mod viseme;

pub use cue::{NormalizedCue, RawCue, cues_from_json};
pub use errors::{LipSyncError, Result};
pub use settings::EngineSettings;
pub use time::{ManualClock, MonotonicClock, TimeSource};
pub use timeline::Timeline;
pub use viseme::Viseme;
