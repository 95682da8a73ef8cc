//! Error types for atwire.

use std::io;
use std::time::Duration;

use thiserror::Error;

/// Main error type for atwire operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Byte sink (UART) level errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Session engine errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Device profile errors
    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),
}

/// Errors raised by the underlying byte sink.
#[derive(Error, Debug)]
pub enum TransportError {
    /// The sink accepted fewer bytes than the command line holds
    #[error("Short write: {written} of {expected} bytes accepted")]
    WriteFailed { written: usize, expected: usize },

    /// The sink rejected the write outright
    #[error("Write failed: {0}")]
    Write(#[source] io::Error),

    /// The sink stopped accepting bytes for the whole budget
    #[error("Write did not complete within {0:?}")]
    WriteTimeout(Duration),

    /// Non-blocking read returned an error
    #[error("Read failed: {0}")]
    Read(#[source] io::Error),
}

/// Session-level errors.
///
/// The engine reports these as [`Outcome`] values; they only become errors
/// through [`Outcome::into_result`].
///
/// [`Outcome`]: crate::session::Outcome
/// [`Outcome::into_result`]: crate::session::Outcome::into_result
#[derive(Error, Debug)]
pub enum SessionError {
    /// Neither token seen within the budget
    #[error("No response token within {0:?}")]
    Timeout(Duration),

    /// The device answered with a failure token
    #[error("Device reported failure '{token}'")]
    DeviceReported { token: String },

    /// The link closed before the response could be classified
    #[error("Response could not be classified")]
    Unknown,
}

/// Device profile errors.
#[derive(Error, Debug)]
pub enum ProfileError {
    /// No profile registered under the name
    #[error("Unknown device profile '{name}'")]
    UnknownProfile { name: String },

    /// A profile with the same name already exists
    #[error("Device profile '{name}' is already registered")]
    AlreadyRegistered { name: String },

    /// Invalid profile definition
    #[error("Invalid profile definition: {message}")]
    InvalidDefinition { message: String },
}

/// Result type alias using atwire's Error.
pub type Result<T> = std::result::Result<T, Error>;
