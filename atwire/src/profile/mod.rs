//! Device profiles for the supported AT-command modules.
//!
//! A profile bundles what differs between modules: line terminator,
//! success and failure tokens, poll pacing and buffer size.

mod definition;
pub mod devices;
mod registry;

pub use definition::DeviceProfile;
pub use registry::ProfileRegistry;
