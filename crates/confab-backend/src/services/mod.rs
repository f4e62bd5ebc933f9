//! Backend service handlers for client-driven requests.
//!
//! This module groups async request handlers that operate on the shared
//! `AppContext`, perform side effects (audio capture, filesystem), and emit
//! pipeline events or notifications back to the client.

pub mod audio_service;
pub mod capture_service;
pub mod config_service;
pub mod session_service;

/// Represents a type that is used in all handlers as an application context.
pub(crate) type AppContextHandle = std::sync::Arc<crate::app::AppContext>;
