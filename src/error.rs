//! Error types for pulsetalk.
//!
//! This module defines the custom error types used throughout the application.
//! It uses the `thiserror` crate to derive error implementations and provides
//! convenient conversions from common error types.

use thiserror::Error;

/// Custom error type for pulsetalk.
///
/// This enum represents the error conditions that can occur during the
/// application's operation: input events the hook delivers but we cannot
/// classify, and failures while talking to the PulseAudio server.
#[derive(Error, Debug)]
pub enum Error {
    /// A raw input event could not be classified as key or mouse
    #[error("Event not recognized: {0}")]
    UnrecognizedEvent(String),

    /// A list or mute request to the audio server failed
    #[error("Audio backend error: {0}")]
    AudioBackend(String),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::AudioBackend(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::AudioBackend(format!("unexpected pactl output: {err}"))
    }
}
