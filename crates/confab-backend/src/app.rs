//! Application context and message dispatching utilities.
//!
//! The context contains the shared state and provides helpers for sending
//! responses and notifications back to the client bridge.

use std::sync::Arc;

use confab_bridge::{MessageFromBackend, MessageToBackend};
use tokio::sync::mpsc::{Receiver, Sender};

use crate::services;
use crate::state::SharedState;

/// Shared application context passed to services and message handlers.
pub(crate) struct AppContext {
    /// Mutable runtime application state shared across services.
    pub state: SharedState,
    /// Outbound channel to the client bridge.
    pub tx: Sender<MessageFromBackend>,
}

impl AppContext {
    /// Read and dispatch messages from the client bridge until it closes.
    pub async fn consume_bridge_messages(self: &Arc<Self>, mut rx: Receiver<MessageToBackend>) {
        while let Some(message) = rx.recv().await {
            log::debug!("Got a client message: {message:?}");
            self.dispatch_message(message).await;
        }
    }

    /// Dispatches the received client message down to individual service
    /// handlers.
    async fn dispatch_message(self: &Arc<Self>, message: MessageToBackend) {
        match message {
            MessageToBackend::ConfigurationRequest => {
                services::config_service::handle_config_request(self.clone()).await;
            }
            MessageToBackend::AudioDevicesListRequest => {
                services::audio_service::handle_audio_devices_list_request(self.clone()).await;
            }
            MessageToBackend::SelectAudioDevice(id) => {
                services::audio_service::handle_audio_device_selection(self.clone(), id).await;
            }
            MessageToBackend::StartSessionRequest => {
                services::capture_service::handle_start_session_request(self.clone()).await;
            }
            MessageToBackend::StopSessionRequest => {
                services::session_service::handle_stop_session_request(self.clone()).await;
            }
            MessageToBackend::SubmitTranscript(text) => {
                services::session_service::handle_submit_transcript(self.clone(), text).await;
            }
            MessageToBackend::AddBookmarkRequest => {
                services::session_service::handle_add_bookmark(self.clone()).await;
            }
        }
    }

    /// Send a message to the client bridge.
    pub async fn send(&self, message: MessageFromBackend) {
        self.tx
            .send(message)
            .await
            .expect("failed to send message to client");
    }

    /// Send a message synchronously (blocking) to the client bridge, for use
    /// from the capture worker thread.
    pub fn send_blocking(&self, message: MessageFromBackend) {
        self.tx
            .blocking_send(message)
            .expect("failed to blocking send message to client");
    }

    /// Send a notification message to the client bridge.
    pub async fn send_notification(
        &self,
        notification_type: confab_bridge::notification::NotificationType,
        content: impl Into<String>,
    ) {
        self.send(MessageFromBackend::NotificationMessage(
            confab_bridge::notification::NotificationMessage {
                notification_type,
                message: content.into(),
            },
        ))
        .await;
    }
}
