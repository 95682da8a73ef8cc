//! Byte sink layer beneath the session engine.
//!
//! The engine is generic over anything that can write a command line and
//! hand back whatever bytes have already arrived without blocking. Opening
//! the UART, baud rate and pin control all stay with the caller.

pub mod config;
mod scripted;
mod stream;

use std::future::Future;
use std::io;

pub use config::LineEnding;
pub use scripted::ScriptedSink;
pub use stream::StreamSink;

/// A raw duplex byte transport, typically a UART.
pub trait ByteSink: Send {
    /// Write `bytes` and report how many were accepted.
    fn write(&mut self, bytes: &[u8]) -> impl Future<Output = io::Result<usize>> + Send;

    /// Copy whatever bytes are available right now into `buf`.
    ///
    /// Must not block. `Ok(0)` means nothing has arrived yet.
    fn read_available(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Whether the remote end has gone away and no more bytes will arrive.
    fn is_closed(&self) -> bool {
        false
    }
}

/// Lend a sink to an engine without giving it up.
impl<S: ByteSink> ByteSink for &mut S {
    fn write(&mut self, bytes: &[u8]) -> impl Future<Output = io::Result<usize>> + Send {
        (**self).write(bytes)
    }

    fn read_available(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        (**self).read_available(buf)
    }

    fn is_closed(&self) -> bool {
        (**self).is_closed()
    }
}
