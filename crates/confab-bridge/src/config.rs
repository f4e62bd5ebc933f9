use serde::{Deserialize, Serialize};

/// Parameters for the analysis pipeline: feature extraction and speaker
/// diarization. Mirrors the constructor surface of the analysis crate; the
/// backend validates the values when it builds the diarizer.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalysisConfig {
    /// Upper bound on concurrently tracked speakers per session.
    pub max_speakers: usize,
    /// Minimum cosine similarity for assigning a block to a known speaker,
    /// within (0, 1].
    pub similarity_threshold: f32,
    /// Number of coefficients per spectral feature vector.
    pub coefficient_count: usize,
    /// Spectral analysis frame length in samples.
    pub frame_size: usize,
    /// Hop between frame starts in samples.
    pub hop_size: usize,
    /// Pre-emphasis filter coefficient.
    pub pre_emphasis: f32,
    /// Feature vectors retained per speaker profile.
    pub profile_history_capacity: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_speakers: 4,
            similarity_threshold: 0.7,
            coefficient_count: 13,
            frame_size: 512,
            hop_size: 256,
            pre_emphasis: 0.97,
            profile_history_capacity: 100,
        }
    }
}

/// Parameters for capture sessions.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Sample rate every session is resampled to, in Hz.
    pub sample_rate: u32,
    /// Whether raw session PCM is written to the cache directory.
    pub dump_audio: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            dump_audio: true,
        }
    }
}

/// Configuration for selecting specific audio devices and backends.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AudioDeviceConfig {
    /// Identifier of the preferred audio host/backend.
    pub selected_host_id: Option<String>,
    /// Identifier of the preferred audio input device.
    pub selected_device_id: Option<String>,
}

/// Global application configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    /// Capture session settings.
    pub session: SessionConfig,
    /// Analysis pipeline settings.
    pub analysis: AnalysisConfig,
    /// Audio device selection for the host.
    pub audio_device_config: AudioDeviceConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_documented_pipeline_constants() {
        let config = Config::default();
        assert_eq!(config.analysis.max_speakers, 4);
        assert_eq!(config.analysis.similarity_threshold, 0.7);
        assert_eq!(config.analysis.coefficient_count, 13);
        assert_eq!(config.analysis.frame_size, 512);
        assert_eq!(config.analysis.hop_size, 256);
        assert_eq!(config.session.sample_rate, 16_000);
    }
}
