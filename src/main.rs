use std::{io::Write, thread};

use confab_bridge::{BridgeChannels, MessageFromBackend, MessageToBackend, records::speaker_label};
use log::{error, info, warn};

fn prompt_select_device(devices: &[confab_bridge::audio::InputDevice]) -> String {
    for (index, device) in devices.iter().enumerate() {
        let marker = if device.selected { " (selected)" } else { "" };
        println!("{}. {}{}", index + 1, device.description, marker);
    }

    print!("Select the capture device to use: ");
    std::io::stdout().flush().expect("failed to flush stdout");

    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .expect("failed to read line");
    let index = line.trim().parse::<usize>().expect("invalid input") - 1;

    match devices.get(index) {
        Some(device) => device.id.clone(),
        None => panic!("no device found at index {}", index + 1),
    }
}

fn main() {
    simple_logger::SimpleLogger::new()
        .with_colors(true)
        .with_threads(true)
        .with_local_timestamps()
        .init()
        .expect("failed to build logger instance");

    let channels = BridgeChannels::default();
    confab_backend::run(channels.backend_rx, channels.backend_tx);

    let tx = channels.client_tx;
    let mut rx = channels.client_rx;

    tx.blocking_send(MessageToBackend::AudioDevicesListRequest)
        .expect("failed to request audio devices");
    let devices = loop {
        match rx.blocking_recv() {
            Some(MessageFromBackend::AudioDevicesListResponse(devices)) => break devices,
            Some(other) => log::debug!("Ignoring early backend message: {other:?}"),
            None => panic!("backend closed the bridge"),
        }
    };
    if devices.is_empty() {
        error!("No input devices available on this host.");
        return;
    }

    let device_id = prompt_select_device(&devices);
    tx.blocking_send(MessageToBackend::SelectAudioDevice(device_id))
        .expect("failed to select the audio device");
    tx.blocking_send(MessageToBackend::StartSessionRequest)
        .expect("failed to request session start");

    // Typed lines stand in for the external speech recognizer: plain text is
    // submitted as finalized transcript, `!b` drops a bookmark, `!q` ends
    // the session.
    let stdin_tx = tx.clone();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        let mut line = String::new();
        loop {
            line.clear();
            if stdin.read_line(&mut line).is_err() {
                break;
            }
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let quitting = trimmed == "!q";
            let message = match trimmed {
                "!q" => MessageToBackend::StopSessionRequest,
                "!b" => MessageToBackend::AddBookmarkRequest,
                text => MessageToBackend::SubmitTranscript(text.to_string()),
            };
            if stdin_tx.blocking_send(message).is_err() || quitting {
                break;
            }
        }
    });

    while let Some(message) = rx.blocking_recv() {
        match message {
            MessageFromBackend::SessionStarted { session_id } => {
                info!("Capture session {session_id} started. Type transcript lines, !b to bookmark, !q to end.");
            }
            MessageFromBackend::LevelUpdate(level) => {
                log::debug!("Input level: {level:.3}");
            }
            MessageFromBackend::ActiveSpeakerChanged { speaker_id } => {
                info!("Active speaker is now {}", speaker_label(speaker_id));
            }
            MessageFromBackend::TranscriptTagged(entry) => {
                let label = entry
                    .speaker_id
                    .map(speaker_label)
                    .unwrap_or_else(|| "Unknown speaker".to_string());
                println!("[{} @ {}ms] {}", label, entry.timestamp_ms, entry.text);
            }
            MessageFromBackend::NotesExtracted(notes) => {
                for note in notes {
                    info!("Note ({:?}): {}", note.category, note.content);
                }
            }
            MessageFromBackend::SessionSummaryResponse(summary) => {
                println!(
                    "Session \"{}\" lasted {} ms with {} speaker(-s):",
                    summary.session.title, summary.session.duration_ms, summary.session.speaker_count
                );
                for speaker in &summary.speakers {
                    println!(
                        "  {}: {} segment(-s), ~{} ms speaking time ({:.0}%)",
                        speaker.label,
                        speaker.segments_assigned,
                        speaker.speaking_time_ms,
                        speaker.speaking_share * 100.0
                    );
                }
                break;
            }
            MessageFromBackend::NotificationMessage(notification) => {
                warn!("{}", notification.message);
            }
            MessageFromBackend::ConfigurationResponse(_)
            | MessageFromBackend::AudioDevicesListResponse(_) => {}
        }
    }
}
