//! Builder for creating session engines.

use std::time::Duration;

use super::engine::SessionEngine;
use crate::channel::MatchTokens;
use crate::error::Result;
use crate::profile::{DeviceProfile, ProfileRegistry};
use crate::transport::{ByteSink, LineEnding};

/// Builder for constructing session engines.
///
/// Starts from a registered profile (or a custom one) and applies
/// per-session overrides on top.
///
/// # Example
///
/// ```rust
/// use std::time::Duration;
///
/// use atwire::session::SessionBuilder;
/// use atwire::transport::ScriptedSink;
///
/// # fn example() -> Result<(), atwire::Error> {
/// let engine = SessionBuilder::new()
///     .profile("bm78")
///     .timeout(Duration::from_secs(5))
///     .build(ScriptedSink::new())?;
/// assert_eq!(engine.profile().timeout, Duration::from_secs(5));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct SessionBuilder {
    profile_name: Option<String>,
    custom_profile: Option<DeviceProfile>,
    timeout: Option<Duration>,
    poll_interval: Option<Duration>,
    settle_delay: Option<Duration>,
    capacity: Option<usize>,
    tokens: Option<MatchTokens>,
    line_ending: Option<LineEnding>,
}

impl SessionBuilder {
    /// Create a builder. Without a profile, `generic` is used.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a registered profile by name (e.g., "bt840").
    pub fn profile(mut self, name: impl Into<String>) -> Self {
        self.profile_name = Some(name.into());
        self
    }

    /// Use a custom profile instead of a registered one.
    pub fn custom_profile(mut self, profile: DeviceProfile) -> Self {
        self.custom_profile = Some(profile);
        self
    }

    /// Override the per-exchange timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the sleep between poll ticks.
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    /// Override the post-success grace period.
    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = Some(delay);
        self
    }

    /// Override the buffer capacity.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Override the success and failure tokens.
    pub fn tokens(mut self, tokens: MatchTokens) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// Override the line terminator.
    pub fn line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = Some(line_ending);
        self
    }

    /// Resolve the profile and apply overrides, without building an engine.
    pub fn into_profile(self) -> Result<DeviceProfile> {
        let mut profile = if let Some(custom) = self.custom_profile {
            custom
        } else {
            ProfileRegistry::lookup(self.profile_name.as_deref().unwrap_or("generic"))?
        };

        if let Some(timeout) = self.timeout {
            profile.timeout = timeout;
        }
        if let Some(interval) = self.poll_interval {
            profile.poll_interval = interval;
        }
        if let Some(delay) = self.settle_delay {
            profile.settle_delay = delay;
        }
        if let Some(capacity) = self.capacity {
            profile.capacity = capacity;
        }
        if let Some(tokens) = self.tokens {
            profile.tokens = tokens;
        }
        if let Some(line_ending) = self.line_ending {
            profile.line_ending = line_ending;
        }

        profile.validate()?;
        Ok(profile)
    }

    /// Build an engine over `sink`.
    pub fn build<S: ByteSink>(self, sink: S) -> Result<SessionEngine<S>> {
        SessionEngine::new(sink, self.into_profile()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::error::ProfileError;
    use crate::transport::ScriptedSink;

    #[test]
    fn test_defaults_to_generic() {
        let profile = SessionBuilder::new().into_profile().unwrap();
        assert_eq!(profile.name, "generic");
    }

    #[test]
    fn test_registered_profile_with_overrides() {
        let profile = SessionBuilder::new()
            .profile("bt840")
            .timeout(Duration::from_secs(2))
            .capacity(64)
            .line_ending(LineEnding::Cr)
            .into_profile()
            .unwrap();

        assert_eq!(profile.name, "bt840");
        assert_eq!(profile.timeout, Duration::from_secs(2));
        assert_eq!(profile.capacity, 64);
        assert_eq!(profile.line_ending, LineEnding::Cr);
        assert_eq!(profile.poll_interval, Duration::from_millis(1));
    }

    #[test]
    fn test_custom_profile_wins() {
        let profile = SessionBuilder::new()
            .profile("bm78")
            .custom_profile(DeviceProfile::new("bench-rig"))
            .into_profile()
            .unwrap();
        assert_eq!(profile.name, "bench-rig");
    }

    #[test]
    fn test_unknown_profile() {
        let err = SessionBuilder::new()
            .profile("hc05")
            .build(ScriptedSink::new())
            .err()
            .unwrap();
        assert!(matches!(
            err,
            Error::Profile(ProfileError::UnknownProfile { .. })
        ));
    }

    #[test]
    fn test_invalid_override_rejected() {
        let result = SessionBuilder::new()
            .poll_interval(Duration::ZERO)
            .build(ScriptedSink::new());
        assert!(result.is_err());
    }

    #[test]
    fn test_tokens_override() {
        let engine = SessionBuilder::new()
            .tokens(MatchTokens::new("READY").with_failure("NAK"))
            .build(ScriptedSink::new())
            .unwrap();
        assert_eq!(engine.profile().tokens.success, "READY");
    }
}
