use std::str::FromStr;

use cpal::{
    Device, Host,
    traits::{DeviceTrait, HostTrait},
};

/// Errors that can occur while configuring or creating an audio input device.
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    /// The audio backend failed to enumerate input devices for the host.
    #[error("failed to read device's information: {0}")]
    ReadDevices(#[from] cpal::DevicesError),
    /// The audio backend rejected the requested stream configuration or
    /// failed to initialize the input stream.
    #[error("failed to build device input stream: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),
    /// The device does not support input streams, or its default input
    /// configuration could not be queried.
    #[error("failed to build device config: {0}")]
    BuildStreamConfig(#[from] cpal::DefaultStreamConfigError),
    /// The provided device id string could not be parsed.
    #[error("failed to parse device id: {0}")]
    ReadDeviceId(#[from] cpal::DeviceIdError),
}

/// An input audio device belonging to a specific host, ready to open capture
/// streams from.
#[derive(Clone)]
pub struct CaptureDevice {
    /// Unique identifier of the device within the host.
    pub id: cpal::DeviceId,
    /// Human-readable device description.
    pub description: String,

    device: Device,
}

impl std::fmt::Display for CaptureDevice {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{} ({})", self.description, self.id)
    }
}

impl From<Device> for CaptureDevice {
    fn from(device: Device) -> Self {
        Self {
            id: device.id().expect("failed to obtain device's id"),
            description: device
                .description()
                .expect("failed to obtain device's information")
                .to_string(),
            device,
        }
    }
}

impl CaptureDevice {
    /// Returns the default input sample rate and channel count selected by
    /// the audio backend for this device.
    pub fn sample_rate_and_channels(&self) -> Result<(cpal::SampleRate, u16), DeviceError> {
        let default_input_config = self.device.default_input_config()?;
        Ok((
            default_input_config.sample_rate(),
            default_input_config.channels(),
        ))
    }

    /// Returns a preferred input buffer size compatible with both the
    /// device's native sample rate and the requested `target_rate`.
    pub fn target_buffer_size(&self, target_rate: u32) -> Result<u32, DeviceError> {
        let default_input_config = self.device.default_input_config()?;
        let device_buffer_size = match default_input_config.buffer_size() {
            cpal::SupportedBufferSize::Range { max, .. } => *max,
            cpal::SupportedBufferSize::Unknown => super::FIXED_FRAME_COUNT,
        };

        // rubato wants a buffer size denominated to the target sample rate,
        // so round to the nearest multiple of the reduced rate ratio
        let original_sample_rate = default_input_config.sample_rate();
        let rate_denominator = crate::gcd(original_sample_rate, target_rate);
        Ok(crate::find_nearest_to(
            device_buffer_size,
            original_sample_rate / rate_denominator,
        ))
    }
}

/// Returns every input-capable audio device available on the given host.
///
/// # Errors
/// Returns [`DeviceError`] if the backend cannot enumerate input devices.
pub fn list_capture_devices(host: &Host) -> Result<Vec<CaptureDevice>, DeviceError> {
    Ok(host.input_devices()?.map(CaptureDevice::from).collect())
}

/// Looks up an input device by the string form of its [`cpal::DeviceId`].
pub fn get_device_by_id(host: &Host, device_id: &str) -> Result<Option<Device>, DeviceError> {
    let device_id = cpal::DeviceId::from_str(device_id)?;
    Ok(host.device_by_id(&device_id))
}

/// Creates an input audio stream for the given device using its default
/// input configuration and a fixed buffer size derived from
/// [`CaptureDevice::target_buffer_size`].
///
/// Two callbacks are registered:
/// - `callback` runs on the audio thread whenever a buffer of input samples
///   becomes available.
/// - `error_callback` runs on the audio thread if a runtime stream error
///   occurs.
///
/// # Threading
/// Both callbacks execute on a real-time audio thread and must be fast,
/// non-blocking, and free of allocation, locks, and I/O. Blocking inside
/// them may cause audio dropouts.
pub fn open_capture_stream<T>(
    input_device: &CaptureDevice,
    target_rate: u32,
    mut callback: impl FnMut(&[T]) + Send + 'static,
    error_callback: impl FnMut(cpal::StreamError) + Send + 'static,
) -> Result<cpal::Stream, DeviceError>
where
    T: cpal::SizedSample + cpal::Sample,
{
    let mut default_input_config: cpal::StreamConfig =
        input_device.device.default_input_config()?.into();
    default_input_config.buffer_size =
        cpal::BufferSize::Fixed(input_device.target_buffer_size(target_rate)?);

    Ok(input_device.device.build_input_stream(
        &default_input_config,
        move |data: &[T], _| callback(data),
        error_callback,
        None,
    )?)
}
