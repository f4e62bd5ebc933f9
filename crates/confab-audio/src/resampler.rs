use std::collections::VecDeque;

use rubato::{FftFixedInOut, Resampler, ResamplerConstructionError};

/// Errors that can occur during audio resampling.
#[derive(Debug, thiserror::Error)]
pub enum ResamplerError {
    /// The underlying resampling engine failed while processing input.
    #[error("failed to resample input samples: {0}")]
    ResampleError(#[from] rubato::ResampleError),
}

/// Real-time mono stream resampler.
///
/// Implementations consume input samples and deliver resampled output
/// through a user-provided callback, invoked zero or more times per call
/// with contiguous output slices. Implementations must avoid allocating
/// during processing so they stay suitable for real-time audio paths.
pub trait AudioResampler<T: rubato::Sample>: Send {
    /// Processes an input buffer of mono samples and emits resampled output
    /// via `callback`.
    ///
    /// # Returns
    /// Returns the total number of output samples written during this call.
    ///
    /// # Errors
    /// Returns [`ResamplerError`] if the resampling engine fails.
    fn process_callback(
        &mut self,
        input: &[T],
        callback: &mut dyn FnMut(&[T]),
    ) -> Result<usize, ResamplerError>;
}

/// FFT-based streaming resampler tolerant of arbitrary input block sizes.
///
/// Capture devices deliver buffers in unpredictable sizes, so incoming
/// samples are queued in a FIFO and fed to the fixed-block FFT engine
/// whenever a full block is available. Output is delivered as soon as it is
/// produced.
pub struct StreamingResampler<T: rubato::Sample> {
    resampler: FftFixedInOut<T>,
    frames_queue: VecDeque<T>,

    input_buffer: Vec<T>,
    output_buffer: Vec<T>,
}

impl<T: rubato::Sample> StreamingResampler<T> {
    /// Creates a new FFT-based streaming resampler for mono audio.
    ///
    /// `block_size` controls the internal FFT processing size and therefore
    /// latency, but imposes no constraint on the sizes passed to
    /// [`AudioResampler::process_callback`].
    ///
    /// This function allocates and belongs in initialization code, not on a
    /// real-time audio thread.
    ///
    /// # Errors
    /// Returns [`ResamplerConstructionError`] if the engine rejects the
    /// parameters.
    pub fn new(
        original_rate: u32,
        target_rate: u32,
        block_size: u32,
    ) -> Result<Self, ResamplerConstructionError> {
        let resampler = FftFixedInOut::new(
            original_rate as usize,
            target_rate as usize,
            block_size as usize,
            1, // the pipeline is mono end to end
        )?;

        let raw_input_buffer = resampler.input_buffer_allocate(true);
        let raw_output_buffer = resampler.output_buffer_allocate(true);

        Ok(Self {
            frames_queue: VecDeque::with_capacity(raw_input_buffer[0].len() * 2),
            input_buffer: raw_input_buffer[0].clone(),
            output_buffer: raw_output_buffer[0].clone(),
            resampler,
        })
    }
}

impl<T: rubato::Sample> AudioResampler<T> for StreamingResampler<T> {
    fn process_callback(
        &mut self,
        input: &[T],
        callback: &mut dyn FnMut(&[T]),
    ) -> Result<usize, ResamplerError> {
        let mut total_written = 0usize;
        self.frames_queue.extend(input);

        loop {
            let wanted_len = self.resampler.input_frames_next();
            if self.frames_queue.len() < wanted_len {
                break;
            }

            if self.input_buffer.len() != wanted_len {
                self.input_buffer.resize(wanted_len, T::zero());
            }
            for slot in self.input_buffer.iter_mut() {
                *slot = self
                    .frames_queue
                    .pop_front()
                    .expect("frames queue drained below the checked length");
            }

            let input_buffer = &[&self.input_buffer];
            let output_buffer = &mut [&mut self.output_buffer];
            let (_, output_written) =
                self.resampler
                    .process_into_buffer(input_buffer, output_buffer, None)?;

            if output_written > 0 {
                callback(&self.output_buffer[..output_written]);
                total_written += output_written;
            }
        }

        Ok(total_written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_input_is_buffered_until_a_block_fills() {
        let mut resampler = StreamingResampler::<f32>::new(48_000, 16_000, 1024).unwrap();
        let mut collected: Vec<f32> = Vec::new();

        // Far less than one processing block: nothing should come out yet.
        let written = resampler
            .process_callback(&vec![0.25f32; 16], &mut |chunk| {
                collected.extend_from_slice(chunk)
            })
            .unwrap();
        assert_eq!(written, 0);
        assert!(collected.is_empty());
    }

    #[test]
    fn downsampling_reduces_sample_count_by_the_rate_ratio() {
        let mut resampler = StreamingResampler::<f32>::new(48_000, 16_000, 1024).unwrap();
        let mut collected: Vec<f32> = Vec::new();

        let mut written = 0usize;
        for _ in 0..20 {
            written += resampler
                .process_callback(&vec![0.1f32; 1024], &mut |chunk| {
                    collected.extend_from_slice(chunk)
                })
                .unwrap();
        }

        assert_eq!(written, collected.len());
        // 20480 input samples at a 3:1 ratio, minus engine startup latency.
        assert!(written > 5_000 && written <= 20_480 / 3 + 1);
    }
}
