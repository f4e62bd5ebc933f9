//! Capture-side audio utilities for the conversation pipeline.
//!
//! This crate wraps the low-level audio building blocks the backend needs to
//! stand up a live capture session:
//! - Enumerating input devices and building input streams with `cpal`.
//! - Downmixing interleaved multi-channel frames to mono samples.
//! - Resampling a mono stream to the fixed session rate with `rubato`.
//! - Metering block amplitude for level feedback.
//!
//! # Real-time constraints
//! Audio callbacks run on a real-time thread. Avoid allocations, locks, and
//! blocking I/O inside callbacks whenever possible.

pub mod device;
pub mod meter;
pub mod mixer;
pub mod resampler;

/// A fallback fixed buffer size (in frames) used when the audio device
/// reports an unknown supported buffer size.
pub const FIXED_FRAME_COUNT: u32 = 4096;

/// Computes the greatest common divisor of two unsigned integers with the
/// classic Euclidean algorithm.
pub(crate) fn gcd(mut a: u32, mut b: u32) -> u32 {
    while b != 0 {
        let temp = a % b;
        a = b;
        b = temp;
    }
    a
}

/// Rounds `base` to the nearest multiple of `denominator`, rounding downward
/// when exactly halfway between two multiples.
pub(crate) fn find_nearest_to(base: u32, denominator: u32) -> u32 {
    let remainder = base % denominator;
    if remainder * 2 <= denominator {
        base - remainder
    } else {
        base - remainder + denominator
    }
}
