/// Downmixes interleaved multi-channel audio frames to mono.
///
/// The input slice must contain interleaved samples in the form
/// `[c0_0, c1_0, .., c0_1, c1_1, ..]`; each output sample is the average of
/// one frame's channels. Mono input degenerates to a plain copy. The mono
/// samples are written into `samples_accumulator`, which must hold at least
/// `samples_frame_data.len() / channels` entries.
///
/// # Returns
/// Returns the number of mono frames written to `samples_accumulator`.
pub fn downmix_to_mono<T>(
    samples_accumulator: &mut [T],
    samples_frame_data: &[T],
    channels: usize,
) -> usize
where
    T: Copy
        + num_traits::identities::Zero
        + num_traits::FromPrimitive
        + std::ops::Add<Output = T>
        + std::ops::Mul<Output = T>,
{
    if channels == 0 {
        return 0;
    }

    let frames = samples_frame_data.len() / channels;
    let scale = T::from_f64(1.0 / channels as f64).expect("failed to obtain channel scale");
    for (frame, accumulated) in samples_accumulator.iter_mut().enumerate().take(frames) {
        let mut sum = T::zero();
        for channel in 0..channels {
            sum = sum + samples_frame_data[frame * channels + channel];
        }
        *accumulated = sum * scale;
    }
    frames
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stereo_frames_average_both_channels() {
        let interleaved = [0.2f32, 0.4, -1.0, 1.0];
        let mut mono = [0.0f32; 2];
        let frames = downmix_to_mono(&mut mono, &interleaved, 2);
        assert_eq!(frames, 2);
        assert!((mono[0] - 0.3).abs() <= 1e-6);
        assert!(mono[1].abs() <= 1e-6);
    }

    #[test]
    fn mono_input_passes_through() {
        let input = [0.5f32, -0.5, 0.25];
        let mut mono = [0.0f32; 3];
        assert_eq!(downmix_to_mono(&mut mono, &input, 1), 3);
        assert_eq!(mono, input);
    }

    #[test]
    fn trailing_partial_frame_is_dropped() {
        let interleaved = [1.0f32, 1.0, 1.0];
        let mut mono = [0.0f32; 2];
        assert_eq!(downmix_to_mono(&mut mono, &interleaved, 2), 1);
    }

    #[test]
    fn zero_channels_writes_nothing() {
        let mut mono = [0.0f32; 2];
        assert_eq!(downmix_to_mono(&mut mono, &[1.0f32, 2.0], 0), 0);
    }
}
