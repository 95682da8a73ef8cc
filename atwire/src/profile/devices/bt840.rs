//! BT840 (nRF52840) module.
//!
//! Polled every millisecond with a 30 second budget; some commands such as
//! advertising start take several seconds to confirm.

use std::time::Duration;

use crate::channel::MatchTokens;
use crate::profile::DeviceProfile;
use crate::transport::LineEnding;

/// Create the BT840 profile.
pub fn profile() -> DeviceProfile {
    DeviceProfile::new("bt840")
        .with_line_ending(LineEnding::CrLf)
        .with_tokens(MatchTokens::new("OK").with_failure("ERROR"))
        .with_poll_interval(Duration::from_millis(1))
        .with_timeout(Duration::from_millis(30_000))
        .with_settle_delay(Duration::from_millis(5))
        .with_capacity(512)
        .with_read_chunk(128)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bt840_profile() {
        let profile = profile();
        assert_eq!(profile.poll_interval, Duration::from_millis(1));
        assert_eq!(profile.timeout, Duration::from_secs(30));
        assert!(profile.validate().is_ok());
    }
}
