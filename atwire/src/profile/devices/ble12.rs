//! BLE 12 click module.
//!
//! Answers `OK`, reports errors as `ERR` followed by a code, and announces
//! links with `+CONNECTED` / `+DISCONNECTED` lines.

use std::time::Duration;

use crate::channel::MatchTokens;
use crate::profile::DeviceProfile;
use crate::transport::LineEnding;

/// Create the BLE 12 profile.
pub fn profile() -> DeviceProfile {
    DeviceProfile::new("ble12")
        .with_line_ending(LineEnding::CrLf)
        .with_tokens(MatchTokens::new("OK").with_failure("ERR"))
        .with_poll_interval(Duration::from_millis(10))
        .with_timeout(Duration::from_secs(2))
        .with_settle_delay(Duration::from_millis(20))
        .with_capacity(256)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ble12_profile() {
        let profile = profile();
        assert_eq!(profile.name, "ble12");
        assert_eq!(profile.tokens.failures, vec!["ERR".to_string()]);
        assert!(profile.validate().is_ok());
    }
}
