//! Built-in device profiles.

pub mod ble12;
pub mod bm78;
pub mod bt840;
pub mod expresslink;

use super::DeviceProfile;

/// Plain modem-style profile: CR+LF, `OK` versus `ERROR`/`FAIL`.
pub fn generic() -> DeviceProfile {
    DeviceProfile::new("generic")
}
