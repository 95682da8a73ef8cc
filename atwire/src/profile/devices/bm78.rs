//! Microchip BM78 dual-mode module.
//!
//! Responses arrive framed with `+` markers that carry no meaning for
//! classification, so they are hidden from captured text.

use std::time::Duration;

use crate::channel::MatchTokens;
use crate::profile::DeviceProfile;
use crate::transport::LineEnding;

/// Create the BM78 profile.
pub fn profile() -> DeviceProfile {
    DeviceProfile::new("bm78")
        .with_line_ending(LineEnding::Cr)
        .with_tokens(MatchTokens::new("OK").with_failure("FAIL"))
        .with_poll_interval(Duration::from_millis(5))
        .with_timeout(Duration::from_secs(1))
        .with_settle_delay(Duration::from_millis(10))
        .with_capacity(128)
        .with_filtered_byte(b'+')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bm78_profile() {
        let profile = profile();
        assert_eq!(profile.line_ending, LineEnding::Cr);
        assert_eq!(profile.filtered_bytes, vec![b'+']);
        assert!(profile.validate().is_ok());
    }
}
