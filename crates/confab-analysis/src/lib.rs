//! Conversation analysis primitives for live audio capture.
//!
//! This crate implements the algorithmic core of the application: turning
//! blocks of raw PCM audio into spectral feature vectors, clustering those
//! vectors into a small set of speakers as a session unfolds, and tagging
//! finalized transcript text into note categories.
//!
//! The components are deliberately stateless or single-owner:
//! - [`features::FeatureExtractor`] and [`notes::NoteClassifier`] are pure
//!   and safe to share read-only across threads.
//! - [`diarizer::SpeakerDiarizer`] carries per-session state and expects one
//!   owner that feeds it audio blocks in strict arrival order.

pub mod diarizer;
pub mod features;
pub mod keywords;
pub mod notes;

pub use diarizer::{DiarizerConfig, SpeakerDiarizer, SpeakerProfile};
pub use features::{FeatureConfig, FeatureExtractor};
pub use keywords::KeywordExtractor;
pub use notes::{Note, NoteCategory, NoteClassifier, TranscriptEntry};

/// Errors raised when an analysis component is constructed with invalid
/// parameters. These indicate programmer misuse and are reported at
/// construction time; runtime data conditions (silence, undersized blocks)
/// never produce errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// `max_speakers` must allow at least one profile.
    #[error("max_speakers must be at least 1")]
    NoSpeakerCapacity,
    /// The similarity threshold must lie within the half-open range (0, 1].
    #[error("similarity_threshold must be within (0, 1], got {0}")]
    SimilarityThresholdOutOfRange(f32),
    /// At least one spectral coefficient must be produced per block.
    #[error("coefficient_count must be at least 1")]
    NoCoefficients,
    /// Analysis frames cannot be empty.
    #[error("frame_size must be at least 1")]
    EmptyFrame,
    /// The hop between frames must be positive and no longer than a frame.
    #[error("hop_size must be within 1..=frame_size, got {hop_size} with frame_size {frame_size}")]
    InvalidHopSize {
        /// The rejected hop size.
        hop_size: usize,
        /// The frame size it was validated against.
        frame_size: usize,
    },
    /// Speaker profiles must be able to hold at least one feature vector.
    #[error("profile_history_capacity must be at least 1")]
    NoHistoryCapacity,
}

/// Minimum number of samples an audio block needs before its feature vector
/// is meaningful: half a second of audio at the given sample rate. Shorter
/// blocks still extract without failing but degenerate toward a zero vector.
pub fn min_segment_samples(sample_rate: u32) -> usize {
    (sample_rate / 2) as usize
}
