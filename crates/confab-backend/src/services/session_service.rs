use std::{sync::atomic::Ordering, time::Duration};

use confab_analysis::{
    keywords::KeywordExtractor,
    min_segment_samples,
    notes::{NoteClassifier, TranscriptEntry},
};
use confab_bridge::{
    MessageFromBackend,
    notification::NotificationType,
    records::{SessionRecord, SessionSummary, SpeakerRecord, speaker_label},
};
use log::info;

use crate::state::WorkerSummary;

/// Rough speech-time estimate per transcript character, used because the
/// external recognizer does not report utterance durations.
const ESTIMATED_MS_PER_CHAR: i64 = 50;

/// How long to wait for the capture worker's totals after signaling stop.
const SUMMARY_WAIT: Duration = Duration::from_secs(2);

/// Handles a session stop request: tears down the stream, collects the
/// worker totals, and emits the persistence-ready session summary.
pub async fn handle_stop_session_request(context: super::AppContextHandle) {
    let (session, session_rate) = {
        let mut state = context.state.write().await;
        (
            state.active_session.take(),
            state.config.session.sample_rate,
        )
    };

    let Some(session) = session else {
        context
            .send_notification(NotificationType::Warning, "No capture session is running.")
            .await;
        return;
    };

    session.running.store(false, Ordering::Relaxed);
    // Dropping the stream stops the capture callback; the worker drains what
    // is left in the ring buffer and exits on the cleared flag.
    drop(session.stream);

    let summary = match tokio::time::timeout(SUMMARY_WAIT, session.summary_rx).await {
        Ok(Ok(summary)) => summary,
        Ok(Err(error)) => {
            log::error!("Capture worker dropped its summary channel: {error}");
            WorkerSummary::default()
        }
        Err(_) => {
            log::error!("Capture worker did not report session totals within {SUMMARY_WAIT:?}");
            WorkerSummary::default()
        }
    };

    let duration_ms = session.started.elapsed().as_millis() as i64;
    let block_ms = min_segment_samples(session_rate) as i64 * 1000 / session_rate as i64;
    let total_segments: usize = summary.segments_per_speaker.iter().sum();

    let speakers: Vec<SpeakerRecord> = summary
        .segments_per_speaker
        .iter()
        .enumerate()
        .map(|(speaker_id, &segments)| SpeakerRecord {
            session_id: session.id,
            speaker_id,
            label: speaker_label(speaker_id),
            segments_assigned: segments,
            speaking_time_ms: segments as i64 * block_ms,
            speaking_share: if total_segments == 0 {
                0.0
            } else {
                segments as f32 / total_segments as f32
            },
        })
        .collect();

    let transcript_text: Vec<String> = session
        .transcript
        .iter()
        .map(|entry| entry.text.clone())
        .collect();
    let title = KeywordExtractor::new().suggest_title(&transcript_text.join(" "));

    let record = SessionRecord {
        id: session.id,
        title,
        started_at_ms: session.started_at_ms,
        ended_at_ms: Some(session.started_at_ms + duration_ms),
        duration_ms,
        speaker_count: summary.segments_per_speaker.len(),
        audio_path: session
            .audio_path
            .map(|path| path.display().to_string()),
        completed: true,
    };

    info!(
        "Session {} ended after {} ms with {} speaker(-s).",
        record.id, record.duration_ms, record.speaker_count
    );
    context
        .send(MessageFromBackend::SessionSummaryResponse(SessionSummary {
            session: record,
            speakers,
        }))
        .await;
}

/// Handles finalized recognizer text: tags it with the diarizer's current
/// speaker, appends it to the session transcript, and emits any notes the
/// classifier finds in it.
pub async fn handle_submit_transcript(context: super::AppContextHandle, text: String) {
    let tagged = {
        let mut state = context.state.write().await;
        match state.active_session.as_mut() {
            Some(session) => {
                let speaker = session.current_speaker.load(Ordering::Relaxed);
                let entry = TranscriptEntry {
                    speaker_id: (speaker >= 0).then_some(speaker as usize),
                    timestamp_ms: session.started.elapsed().as_millis() as i64,
                    duration_ms: text.chars().count() as i64 * ESTIMATED_MS_PER_CHAR,
                    text,
                };
                session.transcript.push(entry.clone());
                Some((session.id, entry))
            }
            None => None,
        }
    };

    let Some((session_id, entry)) = tagged else {
        context
            .send_notification(
                NotificationType::Warning,
                "Transcript text arrived without a running session.",
            )
            .await;
        return;
    };

    let mut notes = Vec::new();
    NoteClassifier::new().classify_entry(&entry, session_id, &mut notes);

    context
        .send(MessageFromBackend::TranscriptTagged(entry))
        .await;
    if !notes.is_empty() {
        context
            .send(MessageFromBackend::NotesExtracted(notes))
            .await;
    }
}

/// Handles a bookmark request by emitting a BOOKMARK note at the current
/// session offset.
pub async fn handle_add_bookmark(context: super::AppContextHandle) {
    let position = {
        let state = context.state.read().await;
        state.active_session.as_ref().map(|session| {
            let speaker = session.current_speaker.load(Ordering::Relaxed);
            (
                session.id,
                session.started.elapsed().as_millis() as i64,
                (speaker >= 0).then_some(speaker as usize),
            )
        })
    };

    let Some((session_id, timestamp_ms, speaker_id)) = position else {
        context
            .send_notification(NotificationType::Warning, "No capture session is running.")
            .await;
        return;
    };

    let note = NoteClassifier::new().bookmark(session_id, timestamp_ms, speaker_id);
    context
        .send(MessageFromBackend::NotesExtracted(vec![note]))
        .await;
}
