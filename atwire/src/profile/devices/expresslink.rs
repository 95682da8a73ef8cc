//! AWS IoT ExpressLink 2 module.
//!
//! Every response is a single line starting with `OK` or `ERR<code>`,
//! e.g. `ERR14 UNABLE TO CONNECT`. Connecting can take tens of seconds.

use std::time::Duration;

use crate::channel::MatchTokens;
use crate::profile::DeviceProfile;
use crate::transport::LineEnding;

/// Create the ExpressLink profile.
pub fn profile() -> DeviceProfile {
    DeviceProfile::new("expresslink")
        .with_line_ending(LineEnding::Lf)
        .with_tokens(MatchTokens::new("OK").with_failure("ERR"))
        .with_poll_interval(Duration::from_millis(100))
        .with_timeout(Duration::from_secs(60))
        .with_settle_delay(Duration::from_millis(50))
        .with_capacity(1024)
        .with_read_chunk(256)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::Verdict;

    #[test]
    fn test_expresslink_profile() {
        let profile = profile();
        assert_eq!(profile.line_ending.as_bytes(), b"\n");
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_error_line_classifies_as_failure() {
        let profile = profile();
        assert_eq!(
            profile.tokens.classify("ERR14 UNABLE TO CONNECT\n"),
            Verdict::DeviceFailure("ERR".to_string())
        );
    }
}
