//! Plain records handed to the persistence collaborator.
//!
//! The core never stores anything itself: when a session ends the backend
//! assembles these records and pushes them across the bridge, and whoever
//! owns storage writes them down.

use serde::{Deserialize, Serialize};

/// A completed (or in-progress) recording session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: i64,
    /// Short title suggested from the transcript's keywords.
    pub title: String,
    /// Wall-clock start, milliseconds since the Unix epoch.
    pub started_at_ms: i64,
    /// Wall-clock end, if the session finished.
    pub ended_at_ms: Option<i64>,
    pub duration_ms: i64,
    /// Number of speakers the diarizer discovered.
    pub speaker_count: usize,
    /// Path to the raw PCM dump, if audio dumping was enabled.
    pub audio_path: Option<String>,
    pub completed: bool,
}

/// Aggregate statistics for one diarized speaker within a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeakerRecord {
    pub session_id: i64,
    /// 0-based diarizer id.
    pub speaker_id: usize,
    /// Display label, e.g. "Speaker 1".
    pub label: String,
    /// Number of audio blocks attributed to this speaker.
    pub segments_assigned: usize,
    /// Estimated speaking time derived from the block length.
    pub speaking_time_ms: i64,
    /// This speaker's share of all attributed blocks, in [0, 1].
    pub speaking_share: f32,
}

/// Everything the backend knows about a finished session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session: SessionRecord,
    pub speakers: Vec<SpeakerRecord>,
}

/// Builds the conventional display label for a diarized speaker.
pub fn speaker_label(speaker_id: usize) -> String {
    format!("Speaker {}", speaker_id + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_are_one_based() {
        assert_eq!(speaker_label(0), "Speaker 1");
        assert_eq!(speaker_label(3), "Speaker 4");
    }
}
