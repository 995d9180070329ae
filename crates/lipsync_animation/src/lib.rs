//! Lipsync Animation
//!
//! Turns a viseme cue timeline into per-frame morph-target influences.
//!
//! # Architecture
//!
//! ```text
//! Timeline ──► locate() ──► CueBlend ──► Resolution ──► Smoother ──► influences
//!                              ▲             ▲
//!                        WeightProfile   ALIAS_RULES
//! ```
//!
//! - [`profile`]: per-viseme weights over the semantic key vocabulary
//! - [`locator`]: finds the surrounding cue pair and its blend factor
//! - [`resolver`]: maps arbitrary morph-target names to blended weights
//! - [`smoothing`]: shaping, gain, attack/release and idle decay
//! - [`clock`]: elapsed time, audio authority and the idle deadline
//! - [`discovery`]: one-time per-scene mesh selection and slot binding
//! - [`engine`]: [`LipSyncEngine`], tying the above together per frame
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lipsync_animation::LipSyncEngine;
//! use lipsync_core::{EngineSettings, RawCue, Viseme};
//!
//! let mut engine = LipSyncEngine::new(EngineSettings::default());
//! engine.attach_scene(&mut scene);
//! engine.set_cue_list(vec![RawCue::interval(Viseme::D, 0.0, 0.3)]);
//!
//! // Every frame:
//! engine.update(&mut scene, None);
//! ```

pub mod clock;
pub mod discovery;
pub mod engine;
pub mod locator;
pub mod profile;
pub mod resolver;
pub mod smoothing;

pub use clock::{AudioEvent, AudioSource, PlaybackClock};
pub use discovery::{AnimatedMesh, MeshDiscovery, preferred_order};
pub use engine::{EngineState, FrameOutcome, LipSyncEngine};
pub use locator::{CueBlend, blend_factor, locate};
pub use profile::{SemanticKey, WeightProfile};
pub use resolver::{
    ALIAS_RULES, AliasPattern, AliasRule, AliasTarget, MorphBinding, Resolution, bind_mesh,
    find_alias_rule, resolve,
};
pub use smoothing::Smoother;
