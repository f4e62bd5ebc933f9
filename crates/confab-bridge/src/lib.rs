//! Communication bridge between a client and the capture backend.
//!
//! This crate defines the types and protocols used to connect a user-facing
//! client (GUI or console) with an asynchronous backend responsible for
//! audio capture, speaker diarization, and note extraction.
//!
//! The design is deliberately lightweight and unidirectional:
//! - The client sends commands (e.g., start a session, submit recognized
//!   transcript text, request config).
//! - The backend pushes events (e.g., amplitude levels, active speaker
//!   changes, extracted notes, session summaries).
//!
//! Communication happens over bounded [`tokio::sync::mpsc`] channels wrapped
//! in [`BridgeChannels`], providing back-pressure, async compatibility, and
//! clean separation of concerns.

pub mod audio;
pub mod config;
pub mod notification;
pub mod records;

use confab_analysis::notes::{Note, TranscriptEntry};
use tokio::sync::mpsc::{self, Receiver, Sender};

use crate::records::SessionSummary;

/// Messages emitted by the backend to inform the client of state updates.
///
/// These are typically sent in response to client requests or pushed as the
/// capture pipeline produces output.
#[derive(Debug, Clone)]
pub enum MessageFromBackend {
    /// Generic message for all notifications in the application.
    NotificationMessage(notification::NotificationMessage),
    /// Response to the configuration request from the client.
    ConfigurationResponse(config::Config),
    AudioDevicesListResponse(Vec<audio::InputDevice>),
    /// A capture session started and audio is flowing.
    SessionStarted {
        /// Identifier the backend assigned to the session.
        session_id: i64,
    },
    /// Normalized mean amplitude of the most recent audio block, in [0, 1].
    LevelUpdate(f32),
    /// The diarizer attributed the most recent audio block to a different
    /// speaker than before.
    ActiveSpeakerChanged {
        /// 0-based speaker id, stable for the session.
        speaker_id: usize,
    },
    /// A submitted transcript line, tagged with the active speaker.
    TranscriptTagged(TranscriptEntry),
    /// Notes extracted from the most recent transcript entry (possibly
    /// empty-to-many per entry).
    NotesExtracted(Vec<Note>),
    /// Final records for a completed session, ready for persistence.
    SessionSummaryResponse(SessionSummary),
}

/// Commands issued by the client to control or query the backend.
#[derive(Debug, Clone)]
pub enum MessageToBackend {
    /// Request for the application configuration.
    ConfigurationRequest,
    AudioDevicesListRequest,
    SelectAudioDevice(String),
    /// Start a new capture session on the selected device.
    StartSessionRequest,
    /// Stop the running capture session and produce its summary.
    StopSessionRequest,
    /// Finalized text from the external speech recognizer.
    SubmitTranscript(String),
    /// Drop a bookmark note at the current session offset.
    AddBookmarkRequest,
}

/// Paired `tokio::mpsc` channels for bidirectional communication between
/// client and backend.
pub struct BridgeChannels {
    /// Receiver used by the client to get messages from the backend.
    pub client_rx: Receiver<MessageFromBackend>,
    /// Sender used by the client to send commands to the backend.
    pub client_tx: Sender<MessageToBackend>,

    /// Receiver used by the backend to get commands from the client.
    pub backend_rx: Receiver<MessageToBackend>,
    /// Sender used by the backend to send events/responses to the client.
    pub backend_tx: Sender<MessageFromBackend>,
}

impl BridgeChannels {
    /// Creates a new pair of bridged channels with the given buffer capacity.
    pub fn new(buffer: usize) -> Self {
        let (to_backend_tx, to_backend_rx) = mpsc::channel(buffer);
        let (to_client_tx, to_client_rx) = mpsc::channel(buffer);
        Self {
            client_tx: to_backend_tx,
            client_rx: to_client_rx,
            backend_rx: to_backend_rx,
            backend_tx: to_client_tx,
        }
    }
}

impl Default for BridgeChannels {
    fn default() -> Self {
        Self::new(64)
    }
}
