//! # atwire
//!
//! Async AT-command session engine for UART-attached radio and IoT modules.
//!
//! Bluetooth and cloud-connectivity modules (BLE 12, BM78, BT840, IoT
//! ExpressLink) all speak the same half-duplex convention: write a command
//! line, then watch the wire until `OK` or an error token shows up. atwire
//! implements that exchange once, on top of any byte transport.
//!
//! ## Features
//!
//! - Generic over a [`ByteSink`]: tokio streams, scripted devices, or your own UART
//! - Bounded sliding-window buffer that never grows past its capacity
//! - Success/failure token matching across chunk boundaries
//! - Wall-clock timeouts with tick-exact behavior under a paused tokio clock
//! - Built-in profiles for common modules, plus a registry for your own
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use atwire::SessionBuilder;
//! use atwire::transport::StreamSink;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), atwire::Error> {
//!     let (uart, _device) = tokio::io::duplex(256);
//!
//!     let mut session = SessionBuilder::new()
//!         .profile("ble12")
//!         .build(StreamSink::new(uart))?;
//!
//!     let response = session.exchange("AT+VER").await?;
//!     println!("{}", response);
//!
//!     Ok(())
//! }
//! ```

pub mod channel;
pub mod error;
pub mod profile;
pub mod session;
pub mod transport;

// Re-export main types for convenience
pub use channel::{AccumulationBuffer, MatchTokens, Verdict};
pub use error::Error;
pub use profile::{DeviceProfile, ProfileRegistry};
pub use session::{Outcome, Response, SessionBuilder, SessionEngine, SessionState};
pub use transport::{ByteSink, LineEnding, ScriptedSink, StreamSink};
