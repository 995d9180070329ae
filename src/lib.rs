//! Lipsync Engine
//!
//! Real-time lip-sync for 3D avatars: a timed sequence of viseme cues drives
//! the morph-target influences of an avatar's face meshes, frame by frame.
//!
//! This crate re-exports the workspace members under short module names:
//!
//! - [`core`]: visemes, cues, the timeline normalizer, settings and clocks
//! - [`scene`]: the node/mesh graph the engine writes influences into
//! - [`animation`]: blending, name resolution, smoothing and the engine
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lipsync::prelude::*;
//!
//! let mut scene = Scene::new();
//! scene.add_morph_mesh(MorphMesh::new("Wolf3D_Head", ["viseme_aa", "viseme_O", "jawOpen"]))?;
//!
//! let mut engine = LipSyncEngine::new(EngineSettings::default());
//! engine.attach_scene(&mut scene);
//! engine.set_cue_list(vec![
//!     RawCue::interval(Viseme::X, 0.0, 0.3),
//!     RawCue::interval(Viseme::D, 0.3, 0.6),
//! ]);
//!
//! loop {
//!     engine.update(&mut scene, None);
//!     // render...
//! }
//! ```

pub use lipsync_animation as animation;
pub use lipsync_core as core;
pub use lipsync_scene as scene;

pub use lipsync_animation::{
    AudioEvent, AudioSource, CueBlend, FrameOutcome, LipSyncEngine, MeshDiscovery, SemanticKey,
    WeightProfile,
};
pub use lipsync_core::{
    EngineSettings, LipSyncError, ManualClock, MonotonicClock, NormalizedCue, RawCue, Result,
    TimeSource, Timeline, Viseme, cues_from_json,
};
pub use lipsync_scene::{MeshKey, MorphMesh, MorphTargetMesh, Node, NodeHandle, Scene};

/// Everything a host typically needs.
pub mod prelude {
    pub use crate::{
        AudioEvent, AudioSource, EngineSettings, FrameOutcome, LipSyncEngine, ManualClock,
        MorphMesh, MorphTargetMesh, RawCue, Scene, TimeSource, Viseme,
    };
}
