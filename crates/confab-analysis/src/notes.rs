//! Lexical tagging of finalized transcript entries into note categories.
//!
//! A purely textual rule engine: each entry is lower-cased once and tested
//! independently against four fixed word lists. Categories are cumulative, so
//! one entry can emit several notes.

use serde::{Deserialize, Serialize};

/// Category attached to an extracted note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NoteCategory {
    KeyPoint,
    ActionItem,
    Decision,
    Question,
    /// Reserved for explicit user-initiated bookmarks; never produced by the
    /// lexical rules.
    Bookmark,
}

/// One finalized utterance delivered by the external speech recognizer,
/// already tagged with the diarizer's speaker assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptEntry {
    /// Speaker id from the diarizer, if one was active.
    pub speaker_id: Option<usize>,
    /// Recognized text, original casing.
    pub text: String,
    /// Milliseconds since recording start.
    pub timestamp_ms: i64,
    /// Estimated utterance duration in milliseconds.
    pub duration_ms: i64,
}

/// A tagged note record, handed to the persistence collaborator as produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub session_id: i64,
    pub category: NoteCategory,
    pub content: String,
    pub timestamp_ms: i64,
    pub speaker_id: Option<usize>,
}

const ACTION_VERBS: &[&str] = &[
    "will", "should", "must", "need", "have to", "going to", "plan to", "schedule", "arrange",
    "organize", "prepare", "contact", "call", "email", "send", "review", "check", "update",
    "create", "finish",
];

const DECISION_WORDS: &[&str] = &[
    "decided",
    "agreed",
    "confirmed",
    "approved",
    "rejected",
    "chosen",
    "selected",
    "final",
    "conclusion",
];

const QUESTION_WORDS: &[&str] = &[
    "what",
    "when",
    "where",
    "who",
    "why",
    "how",
    "which",
    "clarify",
    "explain",
    "wondering",
];

const IMPORTANT_PHRASES: &[&str] = &[
    "important",
    "critical",
    "key point",
    "remember",
    "note that",
    "keep in mind",
    "don't forget",
    "main",
    "primary",
    "essential",
];

/// Statements longer than this many words count as key points even without an
/// importance phrase.
const LONG_STATEMENT_WORDS: usize = 15;

/// Stateless transcript-to-notes rule engine. Safe to share across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoteClassifier;

impl NoteClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Scans transcript entries and emits every matching note, in entry order
    /// and then action, decision, question, key-point order within an entry.
    pub fn classify(&self, entries: &[TranscriptEntry], session_id: i64) -> Vec<Note> {
        let mut notes = Vec::new();
        for entry in entries {
            self.classify_entry(entry, session_id, &mut notes);
        }
        notes
    }

    /// Classifies a single entry, appending matches to `notes`.
    pub fn classify_entry(&self, entry: &TranscriptEntry, session_id: i64, notes: &mut Vec<Note>) {
        let lowered = entry.text.to_lowercase();

        if contains_any(&lowered, ACTION_VERBS) {
            notes.push(note_for(entry, session_id, NoteCategory::ActionItem));
        }
        if contains_any(&lowered, DECISION_WORDS) {
            notes.push(note_for(entry, session_id, NoteCategory::Decision));
        }
        if contains_any(&lowered, QUESTION_WORDS) || lowered.contains('?') {
            notes.push(note_for(entry, session_id, NoteCategory::Question));
        }
        if contains_any(&lowered, IMPORTANT_PHRASES) || is_long_statement(&entry.text) {
            notes.push(note_for(entry, session_id, NoteCategory::KeyPoint));
        }
    }

    /// Builds an explicit user-initiated bookmark note at the given offset.
    pub fn bookmark(&self, session_id: i64, timestamp_ms: i64, speaker_id: Option<usize>) -> Note {
        Note {
            session_id,
            category: NoteCategory::Bookmark,
            content: String::new(),
            timestamp_ms,
            speaker_id,
        }
    }
}

fn note_for(entry: &TranscriptEntry, session_id: i64, category: NoteCategory) -> Note {
    Note {
        session_id,
        category,
        content: entry.text.clone(),
        timestamp_ms: entry.timestamp_ms,
        speaker_id: entry.speaker_id,
    }
}

fn contains_any(lowered: &str, words: &[&str]) -> bool {
    words.iter().any(|word| lowered.contains(word))
}

fn is_long_statement(text: &str) -> bool {
    text.split_whitespace().count() > LONG_STATEMENT_WORDS
}
