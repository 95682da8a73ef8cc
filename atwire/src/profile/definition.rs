//! Device profile describing how a module speaks AT commands.

use std::time::Duration;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::channel::MatchTokens;
use crate::error::{ProfileError, Result};
use crate::transport::LineEnding;

/// Per-device protocol facts: terminator, tokens, pacing and buffer size.
///
/// Serde-compatible so profiles can live in configuration files next to
/// the board definitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceProfile {
    /// Profile name (e.g., "bm78", "expresslink").
    pub name: String,

    /// Terminator appended to each command.
    pub line_ending: LineEnding,

    /// Success and failure tokens.
    pub tokens: MatchTokens,

    /// Sleep between poll ticks.
    pub poll_interval: Duration,

    /// Default per-exchange budget, measured from `send`.
    pub timeout: Duration,

    /// Grace period after a success match for trailing bytes.
    pub settle_delay: Duration,

    /// Accumulation buffer capacity in bytes.
    pub capacity: usize,

    /// Largest single read per tick.
    pub read_chunk: usize,

    /// Bytes hidden from captured text in addition to `0x00`.
    pub filtered_bytes: Vec<u8>,
}

impl DeviceProfile {
    /// Create a profile with generic defaults.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            line_ending: LineEnding::CrLf,
            tokens: MatchTokens::default(),
            poll_interval: Duration::from_millis(10),
            timeout: Duration::from_secs(1),
            settle_delay: Duration::from_millis(10),
            capacity: 256,
            read_chunk: 64,
            filtered_bytes: vec![],
        }
    }

    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }

    /// Replace the token set.
    pub fn with_tokens(mut self, tokens: MatchTokens) -> Self {
        self.tokens = tokens;
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_read_chunk(mut self, read_chunk: usize) -> Self {
        self.read_chunk = read_chunk;
        self
    }

    /// Hide an extra byte (such as a `+` framing marker) from captured text.
    pub fn with_filtered_byte(mut self, byte: u8) -> Self {
        if !self.filtered_bytes.contains(&byte) {
            self.filtered_bytes.push(byte);
        }
        self
    }

    /// Check the profile can drive a session.
    pub fn validate(&self) -> Result<()> {
        let invalid = |message: &str| -> Result<()> {
            Err(ProfileError::InvalidDefinition {
                message: format!("{}: {}", self.name, message),
            }
            .into())
        };

        if self.name.is_empty() {
            return invalid("name must not be empty");
        }
        if self.capacity == 0 {
            return invalid("buffer capacity must be non-zero");
        }
        if self.poll_interval.is_zero() {
            return invalid("poll interval must be non-zero");
        }
        if self.read_chunk == 0 {
            return invalid("read chunk must be non-zero");
        }
        if self.tokens.success.is_empty() {
            return invalid("success token must not be empty");
        }
        if let Some(failure) = self
            .tokens
            .failures
            .iter()
            .find(|f| f.contains(self.tokens.success.as_str()))
        {
            // Allowed; such a line classifies as success.
            warn!(
                "{}: failure token {:?} contains success token {:?}",
                self.name, failure, self.tokens.success
            );
        }
        Ok(())
    }
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self::new("generic")
    }
}
