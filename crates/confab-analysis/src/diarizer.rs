//! Online speaker diarization over a stream of feature vectors.
//!
//! The diarizer keeps one running profile per discovered speaker: a bounded
//! FIFO history of recent feature vectors whose element-wise mean acts as the
//! speaker's representative. Each incoming block is assigned to the most
//! cosine-similar profile, creating new profiles until `max_speakers` is
//! reached. Assignments are order-sensitive: blocks must arrive in capture
//! order and callers must serialize access to one instance.

use std::collections::VecDeque;

use crate::{
    ConfigError,
    features::{FeatureConfig, FeatureExtractor},
};

/// Parameters controlling speaker discovery and assignment.
#[derive(Debug, Clone, Copy)]
pub struct DiarizerConfig {
    /// Upper bound on concurrently tracked speaker profiles.
    pub max_speakers: usize,
    /// Minimum cosine similarity for an existing profile to claim a block.
    pub similarity_threshold: f32,
    /// Number of recent feature vectors retained per profile.
    pub history_capacity: usize,
    /// Feature extraction parameters for the internal extractor.
    pub feature: FeatureConfig,
}

impl Default for DiarizerConfig {
    fn default() -> Self {
        Self {
            max_speakers: 4,
            similarity_threshold: 0.7,
            history_capacity: 100,
            feature: FeatureConfig::default(),
        }
    }
}

impl DiarizerConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_speakers == 0 {
            return Err(ConfigError::NoSpeakerCapacity);
        }
        if !(self.similarity_threshold > 0.0 && self.similarity_threshold <= 1.0) {
            return Err(ConfigError::SimilarityThresholdOutOfRange(
                self.similarity_threshold,
            ));
        }
        if self.history_capacity == 0 {
            return Err(ConfigError::NoHistoryCapacity);
        }
        self.feature.validate()
    }
}

/// Running representation of one discovered speaker within a session.
#[derive(Debug, Clone)]
pub struct SpeakerProfile {
    id: usize,
    features: VecDeque<Vec<f32>>,
    last_active_ms: i64,
}

impl SpeakerProfile {
    fn seeded(id: usize, features: Vec<f32>, timestamp_ms: i64) -> Self {
        let mut history = VecDeque::new();
        history.push_back(features);
        Self {
            id,
            features: history,
            last_active_ms: timestamp_ms,
        }
    }

    /// Identifier assigned in discovery order, stable for the session.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Timestamp of the most recent block assigned to this profile.
    pub fn last_active_ms(&self) -> i64 {
        self.last_active_ms
    }

    /// Number of feature vectors currently retained.
    pub fn history_len(&self) -> usize {
        self.features.len()
    }

    fn push(&mut self, features: Vec<f32>, capacity: usize) {
        self.features.push_back(features);
        while self.features.len() > capacity {
            self.features.pop_front();
        }
    }

    /// Element-wise mean of the retained history; a zero vector when the
    /// history is empty.
    fn representative(&self, coefficient_count: usize) -> Vec<f32> {
        let mut mean = vec![0.0f32; coefficient_count];
        if self.features.is_empty() {
            return mean;
        }
        for vector in &self.features {
            for (sum, &value) in mean.iter_mut().zip(vector) {
                *sum += value;
            }
        }
        for sum in &mut mean {
            *sum /= self.features.len() as f32;
        }
        mean
    }
}

/// Incremental speaker clustering for a single recording session.
pub struct SpeakerDiarizer {
    config: DiarizerConfig,
    extractor: FeatureExtractor,
    profiles: Vec<SpeakerProfile>,
    current_speaker: Option<usize>,
}

impl SpeakerDiarizer {
    /// Creates a diarizer, validating the configuration up front.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if any parameter is out of range.
    pub fn new(config: DiarizerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            extractor: FeatureExtractor::new(config.feature)?,
            config,
            profiles: Vec::new(),
            current_speaker: None,
        })
    }

    /// Extracts features from a raw audio block and assigns it to a speaker.
    ///
    /// Never fails: degenerate blocks (silence, undersized input) produce a
    /// zero feature vector and still receive a valid assignment.
    pub fn process_segment(&mut self, samples: &[i16], timestamp_ms: i64) -> usize {
        let features = self.extractor.extract(samples);
        self.assign(features, timestamp_ms)
    }

    /// Assigns an externally computed feature vector to a speaker and returns
    /// the winning profile id.
    pub fn assign(&mut self, features: Vec<f32>, timestamp_ms: i64) -> usize {
        let id = self.identify(features, timestamp_ms);
        self.current_speaker = Some(id);
        id
    }

    fn identify(&mut self, features: Vec<f32>, timestamp_ms: i64) -> usize {
        if self.profiles.is_empty() {
            self.profiles
                .push(SpeakerProfile::seeded(0, features, timestamp_ms));
            return 0;
        }

        // Profiles are scanned in ascending id order and only a strictly
        // greater similarity replaces the best candidate, so ties resolve to
        // the lowest id and an all-zero scan tracks no candidate at all.
        let mut best: Option<(usize, f32)> = None;
        for profile in &self.profiles {
            let representative = profile.representative(self.config.feature.coefficient_count);
            let similarity = cosine_similarity(&features, &representative);
            if similarity > best.map_or(0.0, |(_, value)| value) {
                best = Some((profile.id, similarity));
            }
        }

        if let Some((id, similarity)) = best
            && similarity >= self.config.similarity_threshold
        {
            let profile = &mut self.profiles[id];
            profile.push(features, self.config.history_capacity);
            profile.last_active_ms = timestamp_ms;
            return id;
        }

        if self.profiles.len() < self.config.max_speakers {
            let id = self.profiles.len();
            self.profiles
                .push(SpeakerProfile::seeded(id, features, timestamp_ms));
            return id;
        }

        // At capacity with nothing above the threshold: reuse the closest
        // profile without polluting its history. When every similarity came
        // out as exactly zero there is no closest profile, so fall back to
        // whoever spoke most recently.
        match best {
            Some((id, _)) => id,
            None => self.most_recently_active(),
        }
    }

    fn most_recently_active(&self) -> usize {
        self.profiles
            .iter()
            .max_by_key(|profile| profile.last_active_ms)
            .map(|profile| profile.id)
            .unwrap_or(0)
    }

    /// Number of speaker profiles discovered so far.
    pub fn speaker_count(&self) -> usize {
        self.profiles.len()
    }

    /// Speaker assigned to the most recent block, if any block was processed.
    pub fn current_speaker(&self) -> Option<usize> {
        self.current_speaker
    }

    /// Read-only view of the discovered profiles, for session summaries.
    pub fn profiles(&self) -> &[SpeakerProfile] {
        &self.profiles
    }

    /// Clears all profiles for a new recording session. Previously returned
    /// ids are not reused until the next reset.
    pub fn reset(&mut self) {
        self.profiles.clear();
        self.current_speaker = None;
    }
}

/// Cosine similarity `dot(a, b) / (|a| * |b|)`, defined as 0 when the vectors
/// differ in length or either norm is zero.
pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() {
        return 0.0;
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;
    for (&x, &y) in a.iter().zip(b) {
        dot += x as f64 * y as f64;
        norm_a += x as f64 * x as f64;
        norm_b += y as f64 * y as f64;
    }

    let denominator = (norm_a * norm_b).sqrt();
    if denominator == 0.0 {
        0.0
    } else {
        (dot / denominator) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diarizer() -> SpeakerDiarizer {
        SpeakerDiarizer::new(DiarizerConfig::default()).unwrap()
    }

    /// Orthogonal basis-style vector with energy in one coefficient only.
    fn basis_vector(axis: usize) -> Vec<f32> {
        let mut vector = vec![0.0f32; 13];
        vector[axis] = 1.0;
        vector
    }

    #[test]
    fn cosine_of_vector_with_itself_is_one() {
        let vector = vec![0.3f32, -1.2, 4.5, 0.01];
        assert!((cosine_similarity(&vector, &vector) - 1.0).abs() <= 1e-6);
    }

    #[test]
    fn cosine_with_zero_vector_is_zero() {
        let vector = vec![1.0f32, 2.0, 3.0];
        assert_eq!(cosine_similarity(&vector, &[0.0, 0.0, 0.0]), 0.0);
        assert_eq!(cosine_similarity(&vector, &[1.0, 2.0]), 0.0);
    }

    #[test]
    fn first_assignment_creates_speaker_zero() {
        let mut diarizer = diarizer();
        assert_eq!(diarizer.speaker_count(), 0);
        assert_eq!(diarizer.current_speaker(), None);

        let id = diarizer.assign(basis_vector(0), 0);
        assert_eq!(id, 0);
        assert_eq!(diarizer.speaker_count(), 1);
        assert_eq!(diarizer.current_speaker(), Some(0));
    }

    #[test]
    fn dissimilar_patterns_discover_speakers_in_order() {
        let mut diarizer = diarizer();
        for axis in 0..4 {
            let id = diarizer.assign(basis_vector(axis), axis as i64 * 500);
            assert_eq!(id, axis);
        }
        assert_eq!(diarizer.speaker_count(), 4);
    }

    #[test]
    fn repeated_pattern_never_exceeds_one_speaker() {
        let mut diarizer = diarizer();
        for step in 0..5 {
            let id = diarizer.assign(basis_vector(2), step * 500);
            assert_eq!(id, 0);
        }
        assert_eq!(diarizer.speaker_count(), 1);
    }

    #[test]
    fn capacity_fallback_reuses_closest_profile_without_append() {
        let mut diarizer = diarizer();
        for axis in 0..4 {
            diarizer.assign(basis_vector(axis), axis as i64 * 500);
        }

        // A fifth pattern leaning toward axis 1 (similarity ~0.65, below the
        // 0.7 threshold) while staying closest to profile 1.
        let mut nudged = vec![0.1f32; 13];
        nudged[1] = 0.3;
        let id = diarizer.assign(nudged, 5_000);
        assert_eq!(id, 1);
        assert_eq!(diarizer.speaker_count(), 4);
        assert_eq!(diarizer.profiles()[1].history_len(), 1);
    }

    #[test]
    fn all_zero_features_fall_back_to_most_recent_speaker() {
        let mut diarizer = diarizer();
        for axis in 0..4 {
            diarizer.assign(basis_vector(axis), axis as i64 * 500);
        }

        // Zero vector has zero similarity with every profile; the most
        // recently active speaker (id 3) claims it.
        let id = diarizer.assign(vec![0.0f32; 13], 5_000);
        assert_eq!(id, 3);
    }

    #[test]
    fn reset_clears_profiles_and_restarts_ids() {
        let mut diarizer = diarizer();
        diarizer.assign(basis_vector(0), 0);
        diarizer.assign(basis_vector(5), 500);
        assert_eq!(diarizer.speaker_count(), 2);

        diarizer.reset();
        assert_eq!(diarizer.speaker_count(), 0);
        assert_eq!(diarizer.current_speaker(), None);
        assert_eq!(diarizer.assign(basis_vector(5), 1_000), 0);
    }

    #[test]
    fn profile_history_is_bounded_fifo() {
        let mut diarizer = diarizer();
        for step in 0..120i64 {
            let id = diarizer.assign(basis_vector(0), step * 500);
            assert_eq!(id, 0);
        }
        assert_eq!(diarizer.speaker_count(), 1);
        assert_eq!(diarizer.profiles()[0].history_len(), 100);
        assert_eq!(diarizer.profiles()[0].last_active_ms(), 119 * 500);
    }

    #[test]
    fn history_overflow_evicts_the_oldest_vector_first() {
        let config = DiarizerConfig {
            history_capacity: 4,
            ..DiarizerConfig::default()
        };
        let mut diarizer = SpeakerDiarizer::new(config).unwrap();

        let seed = basis_vector(0);
        let mut drifted = basis_vector(0);
        drifted[1] = 0.5;

        // Similar enough (cosine ~0.89) to keep landing on profile 0.
        assert_eq!(diarizer.assign(seed, 0), 0);
        for step in 1..=4i64 {
            assert_eq!(diarizer.assign(drifted.clone(), step * 500), 0);
        }

        // Four newer vectors flushed the seed out, so the representative is
        // now exactly the drifted pattern rather than a mix of both.
        let profile = &diarizer.profiles()[0];
        assert_eq!(profile.history_len(), 4);
        let representative = profile.representative(13);
        for (kept, expected) in representative.iter().zip(&drifted) {
            assert!((kept - expected).abs() <= 1e-6);
        }
    }

    #[test]
    fn matching_assignment_updates_last_active_time() {
        let mut diarizer = diarizer();
        diarizer.assign(basis_vector(0), 0);
        diarizer.assign(basis_vector(0), 1_500);
        assert_eq!(diarizer.profiles()[0].last_active_ms(), 1_500);
    }

    #[test]
    fn invalid_configs_are_rejected() {
        let invalid = [
            DiarizerConfig {
                max_speakers: 0,
                ..DiarizerConfig::default()
            },
            DiarizerConfig {
                similarity_threshold: 0.0,
                ..DiarizerConfig::default()
            },
            DiarizerConfig {
                similarity_threshold: 1.5,
                ..DiarizerConfig::default()
            },
            DiarizerConfig {
                history_capacity: 0,
                ..DiarizerConfig::default()
            },
        ];
        for config in invalid {
            assert!(SpeakerDiarizer::new(config).is_err());
        }
    }

    #[test]
    fn silence_segments_still_receive_assignments() {
        let mut diarizer = diarizer();
        let silence = vec![0i16; 16_000];
        assert_eq!(diarizer.process_segment(&silence, 0), 0);

        // A second zero vector matches nothing (zero similarity all around),
        // so under capacity it opens another profile rather than failing.
        assert_eq!(diarizer.process_segment(&silence, 500), 1);
        assert_eq!(diarizer.speaker_count(), 2);
    }
}
