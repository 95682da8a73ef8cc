//! Byte sink over any tokio async stream.
//!
//! Serial port crates, `tokio::io::duplex` pipes and test mocks all expose
//! `AsyncRead + AsyncWrite`; `StreamSink` adapts them to the engine's
//! non-blocking read contract by polling the reader exactly once.

use std::io;

use futures_util::FutureExt;
use log::{debug, trace};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use super::ByteSink;

/// [`ByteSink`] backed by a tokio `AsyncRead + AsyncWrite` stream.
#[derive(Debug)]
pub struct StreamSink<T> {
    inner: T,
    closed: bool,
}

impl<T> StreamSink<T>
where
    T: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Wrap an open stream.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            closed: false,
        }
    }

    /// Get a reference to the wrapped stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Get a mutable reference to the wrapped stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Unwrap the stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T> ByteSink for StreamSink<T>
where
    T: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        let mut written = 0;
        while written < bytes.len() {
            let n = self.inner.write(&bytes[written..]).await?;
            if n == 0 {
                // Peer stopped accepting; report the short count.
                break;
            }
            written += n;
        }
        self.inner.flush().await?;
        Ok(written)
    }

    fn read_available(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.closed || buf.is_empty() {
            return Ok(0);
        }

        // `read` is cancel-safe: dropping the pending future loses no data.
        match self.inner.read(buf).now_or_never() {
            None => Ok(0),
            Some(Ok(0)) => {
                debug!("stream sink reached EOF");
                self.closed = true;
                Ok(0)
            }
            Some(Ok(n)) => {
                trace!("stream sink read {} bytes", n);
                Ok(n)
            }
            Some(Err(e)) if e.kind() == io::ErrorKind::WouldBlock => Ok(0),
            Some(Err(e)) => Err(e),
        }
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_then_read() {
        let mock = tokio_test::io::Builder::new()
            .write(b"AT\r\n")
            .read(b"OK\r\n")
            .build();
        let mut sink = StreamSink::new(mock);

        assert_eq!(sink.write(b"AT\r\n").await.unwrap(), 4);

        let mut buf = [0u8; 32];
        let n = sink.read_available(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"OK\r\n");
        assert!(!sink.is_closed());

        // Script exhausted: the mock reports EOF.
        assert_eq!(sink.read_available(&mut buf).unwrap(), 0);
        assert!(sink.is_closed());
    }

    #[tokio::test]
    async fn test_pending_read_yields_zero() {
        let (near, _far) = tokio::io::duplex(64);
        let mut sink = StreamSink::new(near);

        let mut buf = [0u8; 16];
        assert_eq!(sink.read_available(&mut buf).unwrap(), 0);
        assert!(!sink.is_closed());
    }

    #[tokio::test]
    async fn test_duplex_round_trip() {
        let (near, mut far) = tokio::io::duplex(64);
        let mut sink = StreamSink::new(near);

        sink.write(b"AT+VER\r\n").await.unwrap();
        let mut line = [0u8; 8];
        far.read_exact(&mut line).await.unwrap();
        assert_eq!(&line, b"AT+VER\r\n");

        far.write_all(b"1.2\r\nOK\r\n").await.unwrap();
        let mut buf = [0u8; 64];
        let n = sink.read_available(&mut buf).unwrap();
        assert_eq!(&buf[..n], b"1.2\r\nOK\r\n");
    }

    #[tokio::test]
    async fn test_read_error_propagates() {
        let mock = tokio_test::io::Builder::new()
            .read_error(io::Error::new(io::ErrorKind::Other, "framing error"))
            .build();
        let mut sink = StreamSink::new(mock);

        let mut buf = [0u8; 8];
        let err = sink.read_available(&mut buf).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::Other);
    }

    #[tokio::test]
    async fn test_closed_peer_drops_reads() {
        let (near, far) = tokio::io::duplex(64);
        drop(far);
        let mut sink = StreamSink::new(near);

        let mut buf = [0u8; 8];
        assert_eq!(sink.read_available(&mut buf).unwrap(), 0);
        assert!(sink.is_closed());
    }
}
