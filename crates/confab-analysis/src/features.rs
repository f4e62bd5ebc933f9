//! Spectral feature extraction for short blocks of mono PCM audio.
//!
//! A block of `i16` samples is reduced to one fixed-length vector of
//! MFCC-style coefficients: pre-emphasis, overlapping Hamming-windowed
//! frames, a direct DFT power spectrum, and a cosine-basis projection of the
//! power bins, averaged over all frames. The projection intentionally skips
//! the mel filterbank and log compression of classical MFCC; the vectors are
//! only ever compared against each other with cosine similarity, where the
//! simplified shape descriptor is sufficient.

use std::f64::consts::PI;

use crate::ConfigError;

/// Parameters controlling feature extraction.
#[derive(Debug, Clone, Copy)]
pub struct FeatureConfig {
    /// Number of coefficients in each output feature vector.
    pub coefficient_count: usize,
    /// Analysis frame length in samples.
    pub frame_size: usize,
    /// Hop between consecutive frame starts, in samples.
    pub hop_size: usize,
    /// Pre-emphasis filter coefficient.
    pub pre_emphasis: f32,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            coefficient_count: 13,
            frame_size: 512,
            hop_size: 256,
            pre_emphasis: 0.97,
        }
    }
}

impl FeatureConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.coefficient_count == 0 {
            return Err(ConfigError::NoCoefficients);
        }
        if self.frame_size == 0 {
            return Err(ConfigError::EmptyFrame);
        }
        if self.hop_size == 0 || self.hop_size > self.frame_size {
            return Err(ConfigError::InvalidHopSize {
                hop_size: self.hop_size,
                frame_size: self.frame_size,
            });
        }
        Ok(())
    }
}

/// Stateless extractor turning raw sample blocks into feature vectors.
///
/// The extractor owns only its configuration and a precomputed window; it is
/// safe to share read-only across threads, and `extract` is fully
/// deterministic for identical input.
pub struct FeatureExtractor {
    config: FeatureConfig,
    window: Vec<f32>,
}

impl FeatureExtractor {
    /// Creates an extractor, validating the configuration up front.
    ///
    /// # Errors
    /// Returns [`ConfigError`] if any parameter is out of range.
    pub fn new(config: FeatureConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            window: hamming_window(config.frame_size),
            config,
        })
    }

    /// Returns the configuration this extractor was built with.
    pub fn config(&self) -> &FeatureConfig {
        &self.config
    }

    /// Extracts one averaged coefficient vector from a block of mono samples.
    ///
    /// Blocks shorter than one frame produce no analysis frames and yield a
    /// zero vector of `coefficient_count` entries; this is a well-defined
    /// degenerate result, not an error.
    pub fn extract(&self, samples: &[i16]) -> Vec<f32> {
        let frame_size = self.config.frame_size;
        let mut averaged = vec![0.0f32; self.config.coefficient_count];

        let mut normalized = Vec::with_capacity(samples.len());
        normalized.extend(samples.iter().map(|&s| s as f32 / 32768.0));
        pre_emphasize_in_place(&mut normalized, self.config.pre_emphasis);

        let mut windowed = vec![0.0f32; frame_size];
        let mut power = vec![0.0f32; frame_size / 2 + 1];
        let mut frame_count = 0usize;

        let mut start = 0usize;
        while start + frame_size <= normalized.len() {
            let frame = &normalized[start..start + frame_size];
            for (out, (&sample, &weight)) in
                windowed.iter_mut().zip(frame.iter().zip(&self.window))
            {
                *out = sample * weight;
            }

            power_spectrum(&windowed, &mut power);
            accumulate_coefficients(&power, &mut averaged);

            frame_count += 1;
            start += self.config.hop_size;
        }

        if frame_count > 0 {
            for value in &mut averaged {
                *value /= frame_count as f32;
            }
        }
        averaged
    }
}

/// Applies the first-order pre-emphasis filter `y[i] = x[i] - alpha * x[i-1]`
/// to flatten the spectral tilt of voiced speech. The first sample passes
/// through unchanged.
fn pre_emphasize_in_place(signal: &mut [f32], alpha: f32) {
    let mut previous = 0.0f32;
    for (index, value) in signal.iter_mut().enumerate() {
        let current = *value;
        if index > 0 {
            *value = current - alpha * previous;
        }
        previous = current;
    }
}

fn hamming_window(len: usize) -> Vec<f32> {
    if len < 2 {
        return vec![1.0; len];
    }
    (0..len)
        .map(|i| (0.54 - 0.46 * (2.0 * PI * i as f64 / (len - 1) as f64).cos()) as f32)
        .collect()
}

/// Computes the power spectrum of one windowed frame with a direct DFT over
/// bins `k = 0..=N/2`. Quadratic in the frame length, which is acceptable at
/// the default 512-sample frames; accumulation happens in `f64` to keep the
/// long inner sums stable.
fn power_spectrum(frame: &[f32], power: &mut [f32]) {
    let n = frame.len();
    for (k, bin) in power.iter_mut().enumerate() {
        let mut real = 0.0f64;
        let mut imag = 0.0f64;
        for (t, &sample) in frame.iter().enumerate() {
            let angle = -2.0 * PI * (k as f64) * (t as f64) / n as f64;
            real += sample as f64 * angle.cos();
            imag += sample as f64 * angle.sin();
        }
        *bin = (real * real + imag * imag) as f32;
    }
}

/// Projects the power bins onto a cosine basis and adds the result into the
/// running per-coefficient sums.
fn accumulate_coefficients(power: &[f32], sums: &mut [f32]) {
    let bin_count = power.len() as f64;
    for (i, sum) in sums.iter_mut().enumerate() {
        let mut projected = 0.0f64;
        for (j, &bin) in power.iter().enumerate() {
            projected += bin as f64 * (PI * i as f64 * (j as f64 + 0.5) / bin_count).cos();
        }
        *sum += projected as f32;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> FeatureExtractor {
        FeatureExtractor::new(FeatureConfig::default()).unwrap()
    }

    fn sine_block(frequency: f64, sample_rate: u32, samples: usize) -> Vec<i16> {
        (0..samples)
            .map(|i| {
                let phase = 2.0 * PI * frequency * i as f64 / sample_rate as f64;
                (phase.sin() * 12_000.0) as i16
            })
            .collect()
    }

    #[test]
    fn undersized_block_yields_zero_vector() {
        let extractor = extractor();
        for len in [0usize, 1, 100, 511] {
            let features = extractor.extract(&vec![500i16; len]);
            assert_eq!(features.len(), 13);
            assert!(features.iter().all(|&c| c == 0.0), "len {len}");
        }
    }

    #[test]
    fn silent_second_yields_zero_vector() {
        let features = extractor().extract(&vec![0i16; 16_000]);
        assert_eq!(features.len(), 13);
        assert!(features.iter().all(|&c| c == 0.0));
    }

    #[test]
    fn extraction_is_deterministic() {
        let extractor = extractor();
        let block = sine_block(440.0, 16_000, 8_000);
        let first = extractor.extract(&block);
        let second = extractor.extract(&block);
        for (a, b) in first.iter().zip(&second) {
            assert!((a - b).abs() <= 1e-6);
        }
    }

    #[test]
    fn tone_carries_energy_in_first_coefficient() {
        // Coefficient 0 is the plain sum of the power bins, so any non-silent
        // block must produce a positive value there.
        let features = extractor().extract(&sine_block(440.0, 16_000, 8_000));
        assert!(features[0] > 0.0);
    }

    #[test]
    fn custom_coefficient_count_is_respected() {
        let config = FeatureConfig {
            coefficient_count: 20,
            ..FeatureConfig::default()
        };
        let extractor = FeatureExtractor::new(config).unwrap();
        assert_eq!(extractor.extract(&sine_block(200.0, 16_000, 8_000)).len(), 20);
    }

    #[test]
    fn invalid_configs_are_rejected() {
        assert!(
            FeatureExtractor::new(FeatureConfig {
                coefficient_count: 0,
                ..FeatureConfig::default()
            })
            .is_err()
        );
        assert!(
            FeatureExtractor::new(FeatureConfig {
                hop_size: 1024,
                ..FeatureConfig::default()
            })
            .is_err()
        );
        assert!(
            FeatureExtractor::new(FeatureConfig {
                hop_size: 0,
                ..FeatureConfig::default()
            })
            .is_err()
        );
    }
}
