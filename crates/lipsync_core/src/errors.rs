//! Error Types
//!
//! This module defines the error types used throughout the engine.
//!
//! # Overview
//!
//! The per-frame path never fails: missing timing fields, unknown symbols,
//! empty cue lists and meshes without recognised morph names all degrade to
//! defined fallbacks. [`LipSyncError`] only covers the edges of the system:
//! - Scene contract violations detected when a mesh is registered
//! - Parsing of cue payloads and settings files
//! - File I/O for hosts that load those payloads from disk
//!
//! # Usage
//!
//! Fallible APIs return [`Result<T>`] which is an alias for
//! `std::result::Result<T, LipSyncError>`.
//!
//! ```rust,ignore
//! use lipsync_core::errors::Result;
//! use lipsync_core::cue::cues_from_json;
//!
//! fn load(payload: &str) -> Result<()> {
//!     let cues = cues_from_json(payload)?;
//!     println!("{} cues", cues.len());
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for the lipsync engine.
#[derive(Error, Debug)]
pub enum LipSyncError {
    // ========================================================================
    // Scene Contract Errors
    // ========================================================================
    /// A morph dictionary entry points past the end of its influence array.
    #[error(
        "Morph target '{key}' on mesh '{mesh}' maps to slot {index}, but the mesh has {len} influences"
    )]
    MorphSlotOutOfBounds {
        /// Name of the offending mesh
        mesh: String,
        /// Morph target name
        key: String,
        /// The invalid slot index
        index: usize,
        /// Length of the influence array
        len: usize,
    },

    // ========================================================================
    // Format & Parsing Errors
    // ========================================================================
    /// JSON parsing error (cue payloads, settings files).
    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    // ========================================================================
    // I/O Errors
    // ========================================================================
    /// File I/O error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Alias for `Result<T, LipSyncError>`.
pub type Result<T> = std::result::Result<T, LipSyncError>;
