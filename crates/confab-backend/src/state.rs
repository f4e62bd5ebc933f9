use std::{
    path::PathBuf,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicI64},
    },
    time::Instant,
};

use confab_analysis::notes::TranscriptEntry;

/// Per-speaker totals handed back by the capture worker when it exits.
#[derive(Debug, Default)]
pub struct WorkerSummary {
    /// Blocks attributed to each speaker, indexed by speaker id.
    pub segments_per_speaker: Vec<usize>,
}

/// A running capture session and the handles needed to talk to its worker.
pub struct ActiveSession {
    /// Identifier assigned at session start.
    pub id: i64,
    /// Wall-clock start, milliseconds since the Unix epoch.
    pub started_at_ms: i64,
    /// Monotonic start, for computing in-session offsets.
    pub started: Instant,
    /// The live cpal input stream; dropping it stops capture.
    pub stream: cpal::Stream,
    /// Cleared to ask the analysis worker to exit.
    pub running: Arc<AtomicBool>,
    /// Speaker the diarizer attributed the latest block to; -1 before the
    /// first block lands.
    pub current_speaker: Arc<AtomicI64>,
    /// Finalized transcript entries submitted so far.
    pub transcript: Vec<TranscriptEntry>,
    /// Resolves with the worker's totals once it observes the stop flag.
    pub summary_rx: tokio::sync::oneshot::Receiver<WorkerSummary>,
    /// Raw PCM dump location, when audio dumping is enabled.
    pub audio_path: Option<PathBuf>,
}

/// The core application state that holds configuration, device selection,
/// and the active capture session.
///
/// Designed to be wrapped in thread-safe, async-friendly primitives (see
/// [`SharedState`]) to allow concurrent reads and occasional writes from
/// multiple tasks.
pub struct State {
    /// The loaded application configuration.
    pub config: confab_bridge::config::Config,
    /// Directory used for session audio dumps and other cached data.
    pub cache_path: PathBuf,
    /// The audio host devices are enumerated from.
    pub active_host: Arc<cpal::Host>,
    /// The currently selected capture device, if any.
    pub active_audio_device: Arc<Option<cpal::Device>>,
    /// The running capture session, if one is active.
    pub active_session: Option<ActiveSession>,
}

/// Thread-safe, async-friendly shared reference to the application
/// [`State`].
pub type SharedState = std::sync::Arc<tokio::sync::RwLock<State>>;

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_shared<T: Send + Sync>() {}

    // The capture worker moves a context handle into `spawn_blocking`, so
    // every field of `State` must stay `Send + Sync`.
    #[test]
    fn state_is_shareable_across_runtime_threads() {
        assert_shared::<SharedState>();
        assert_shared::<std::sync::Arc<crate::app::AppContext>>();
    }
}
