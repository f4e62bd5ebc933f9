//! Block amplitude metering for level feedback.

/// Full-scale magnitude of a signed 16-bit sample, used for normalization.
const FULL_SCALE: f32 = 32_768.0;

/// Mean absolute amplitude of a block of mono samples, in raw `i16`
/// magnitude units. Empty blocks meter as silence.
pub fn mean_abs(samples: &[i16]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let mut sum = 0.0f64;
    for &sample in samples {
        sum += (sample as f64).abs();
    }
    (sum / samples.len() as f64) as f32
}

/// Mean absolute amplitude normalized into `[0, 1]`.
pub fn normalized(samples: &[i16]) -> f32 {
    mean_abs(samples) / FULL_SCALE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn silence_meters_at_zero() {
        assert_eq!(mean_abs(&[0i16; 16_000]), 0.0);
        assert_eq!(normalized(&[0i16; 16_000]), 0.0);
    }

    #[test]
    fn empty_block_meters_at_zero() {
        assert_eq!(mean_abs(&[]), 0.0);
    }

    #[test]
    fn negative_samples_contribute_their_magnitude() {
        assert_eq!(mean_abs(&[1000, -1000, 1000, -1000]), 1000.0);
    }

    #[test]
    fn normalized_level_stays_within_unit_range() {
        let loud = vec![i16::MIN; 512];
        let level = normalized(&loud);
        assert!(level > 0.99 && level <= 1.01);
    }
}
