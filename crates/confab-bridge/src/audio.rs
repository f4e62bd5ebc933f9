/// An input audio device as presented to the client.
#[derive(Debug, Clone)]
pub struct InputDevice {
    /// String form of the device id, usable with
    /// [`crate::MessageToBackend::SelectAudioDevice`].
    pub id: String,
    /// Human-readable device description.
    pub description: String,
    /// Whether this device is the currently configured capture device.
    pub selected: bool,
}
