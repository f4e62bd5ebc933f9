use std::{
    fs,
    io::Write,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicI64, Ordering},
    },
    time::{Instant, SystemTime, UNIX_EPOCH},
};

use confab_analysis::{DiarizerConfig, FeatureConfig, SpeakerDiarizer};
use confab_audio::{
    device::CaptureDevice,
    meter,
    resampler::{AudioResampler, StreamingResampler},
};
use confab_bridge::{MessageFromBackend, notification::NotificationType};
use cpal::traits::StreamTrait;
use log::info;
use ringbuf_blocking::{
    BlockingHeapRb,
    traits::{Consumer, Producer, Split},
};

use crate::state::{ActiveSession, WorkerSummary};

fn diarizer_config(analysis: &confab_bridge::config::AnalysisConfig) -> DiarizerConfig {
    DiarizerConfig {
        max_speakers: analysis.max_speakers,
        similarity_threshold: analysis.similarity_threshold,
        history_capacity: analysis.profile_history_capacity,
        feature: FeatureConfig {
            coefficient_count: analysis.coefficient_count,
            frame_size: analysis.frame_size,
            hop_size: analysis.hop_size,
            pre_emphasis: analysis.pre_emphasis,
        },
    }
}

/// Handles a session start request: opens the capture stream, stands up the
/// resampling path, and spawns the blocking analysis worker that meters and
/// diarizes half-second audio blocks in arrival order.
pub async fn handle_start_session_request(context: super::AppContextHandle) {
    let (config, active_device, cache_path, already_running) = {
        let state = context.state.read().await;
        (
            state.config.clone(),
            state.active_audio_device.clone(),
            state.cache_path.clone(),
            state.active_session.is_some(),
        )
    };

    if already_running {
        context
            .send_notification(
                NotificationType::Warning,
                "A capture session is already running.",
            )
            .await;
        return;
    }

    let active_device = match active_device.as_ref() {
        Some(device) => CaptureDevice::from(device.clone()),
        None => {
            context
                .send_notification(
                    NotificationType::Error,
                    "Select a capture device before starting a session.",
                )
                .await;
            return;
        }
    };

    // Fail fast on bad analysis parameters before touching the device.
    let mut diarizer = match SpeakerDiarizer::new(diarizer_config(&config.analysis)) {
        Ok(diarizer) => diarizer,
        Err(error) => {
            context
                .send_notification(
                    NotificationType::Error,
                    format!("Invalid analysis configuration: {error}"),
                )
                .await;
            return;
        }
    };

    let session_rate = config.session.sample_rate;
    let (sample_rate, channels) = active_device
        .sample_rate_and_channels()
        .expect("failed to get device's original sample rate and channels");
    let target_buffer_size = active_device
        .target_buffer_size(session_rate)
        .expect("failed to get target buffer size for the device");

    info!(
        "Using capture device {}: {} Hz, {} channel(-s), target buffer size {}.",
        active_device, sample_rate, channels, target_buffer_size,
    );

    let mut resampler = StreamingResampler::<f32>::new(sample_rate, session_rate, target_buffer_size)
        .expect("failed to create a resampler");
    let mut samples_accumulator = Vec::with_capacity(target_buffer_size as usize);

    let inner_buffer = BlockingHeapRb::<f32>::new((session_rate * 3) as usize);
    let (mut producer, mut consumer) = inner_buffer.split();

    let started_at_ms = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is before the Unix epoch")
        .as_millis() as i64;
    let session_id = started_at_ms;

    let running = Arc::new(AtomicBool::new(true));
    let current_speaker = Arc::new(AtomicI64::new(-1));
    let (summary_tx, summary_rx) = tokio::sync::oneshot::channel();
    let audio_path = config
        .session
        .dump_audio
        .then(|| cache_path.join(format!("session_{session_id}.pcm")));

    let worker_running = running.clone();
    let worker_speaker = current_speaker.clone();
    let worker_audio_path = audio_path.clone();
    let cloned_context = context.clone();
    tokio::task::spawn_blocking(move || {
        // Half a second of session-rate audio per analysis block, the
        // smallest span the feature extractor considers meaningful.
        let block_samples = confab_analysis::min_segment_samples(session_rate);
        let block_ms = block_samples as i64 * 1000 / session_rate as i64;

        let mut dump_file = worker_audio_path.and_then(|path| {
            if let Some(parent) = path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            match fs::File::create(&path) {
                Ok(file) => Some(file),
                Err(error) => {
                    log::error!("Failed to create session audio dump at {path:?}: {error}");
                    None
                }
            }
        });

        let mut samples_buffer = vec![0.0f32; target_buffer_size as usize];
        let mut block: Vec<i16> = Vec::with_capacity(block_samples * 2);
        let mut byte_buffer: Vec<u8> = Vec::with_capacity(block_samples * 2);
        let mut segments_per_speaker: Vec<usize> = Vec::new();
        let mut blocks_seen: i64 = 0;
        let mut last_speaker: i64 = -1;

        while worker_running.load(Ordering::Relaxed) {
            let len = consumer.pop_slice(&mut samples_buffer);
            if len == 0 {
                continue;
            }

            for &sample in &samples_buffer[..len] {
                block.push((sample * 32_768.0).clamp(-32_768.0, 32_767.0) as i16);
            }

            while block.len() >= block_samples {
                let segment: Vec<i16> = block.drain(..block_samples).collect();

                let mut dump_failed = false;
                if let Some(file) = dump_file.as_mut() {
                    byte_buffer.clear();
                    for sample in &segment {
                        byte_buffer.extend_from_slice(&sample.to_le_bytes());
                    }
                    if let Err(error) = file.write_all(&byte_buffer) {
                        log::error!("Failed to write session audio dump: {error}");
                        dump_failed = true;
                    }
                }
                if dump_failed {
                    dump_file = None;
                }

                cloned_context.send_blocking(MessageFromBackend::LevelUpdate(meter::normalized(
                    &segment,
                )));

                // Blocks are processed strictly in arrival order; the
                // diarizer's profiles are order-sensitive.
                let timestamp_ms = blocks_seen * block_ms;
                let speaker = diarizer.process_segment(&segment, timestamp_ms);
                if segments_per_speaker.len() <= speaker {
                    segments_per_speaker.resize(speaker + 1, 0);
                }
                segments_per_speaker[speaker] += 1;

                if speaker as i64 != last_speaker {
                    last_speaker = speaker as i64;
                    worker_speaker.store(last_speaker, Ordering::Relaxed);
                    cloned_context.send_blocking(MessageFromBackend::ActiveSpeakerChanged {
                        speaker_id: speaker,
                    });
                }
                blocks_seen += 1;
            }
        }

        let _ = summary_tx.send(WorkerSummary {
            segments_per_speaker,
        });
    });

    let mut resampled_callback = move |written_data: &[f32]| {
        producer.push_slice(written_data);
    };

    let audio_stream = confab_audio::device::open_capture_stream(
        &active_device,
        session_rate,
        move |data: &[f32]| {
            let received_frames = data.len() / channels as usize;
            if received_frames > samples_accumulator.len() {
                log::warn!(
                    "Resizing the accumulator (allocation trigger) on the audio thread! Resizing from {} to {}",
                    samples_accumulator.len(),
                    received_frames
                );
            }

            samples_accumulator.resize(received_frames, 0.0);
            confab_audio::mixer::downmix_to_mono(
                &mut samples_accumulator[..received_frames],
                data,
                channels as usize,
            );

            if let Err(error) = resampler
                .process_callback(&samples_accumulator[..received_frames], &mut resampled_callback)
            {
                log::error!(
                    "Resampler caught an error: {error:?}, received_frames={received_frames}, target_buffer_size={target_buffer_size}"
                );
            }
        },
        |error| {
            log::error!("An error occurred while processing the input stream data: {error}");
        },
    )
    .expect("failed to open an input stream for the device");

    audio_stream.play().expect("failed to play audio stream");

    {
        let mut state = context.state.write().await;
        state.active_session = Some(ActiveSession {
            id: session_id,
            started_at_ms,
            started: Instant::now(),
            stream: audio_stream,
            running,
            current_speaker,
            transcript: Vec::new(),
            summary_rx,
            audio_path,
        });
    }

    info!("Capture session {session_id} started.");
    context
        .send(MessageFromBackend::SessionStarted { session_id })
        .await;
}
