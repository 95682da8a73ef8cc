//! In-memory byte sink that plays back a scripted device.
//!
//! Useful for bench simulation and tests: queue chunks to be read, insert
//! idle reads between them, and register replies that are released when a
//! matching command line is written.

use std::borrow::Cow;
use std::collections::VecDeque;
use std::io;

use bytes::{Bytes, BytesMut};
use memchr::memmem;

use super::ByteSink;

/// One scripted read result.
#[derive(Debug, Clone)]
enum Delivery {
    /// Bytes handed out by the next read (possibly across several reads).
    Data(Bytes),

    /// Number of consecutive reads that yield nothing.
    Idle(usize),
}

#[derive(Debug, Clone)]
struct Reply {
    trigger: Vec<u8>,
    deliveries: Vec<Delivery>,
}

/// Simulated device implementing [`ByteSink`].
///
/// # Example
///
/// ```rust
/// use atwire::transport::ScriptedSink;
///
/// let sink = ScriptedSink::new()
///     .reply("AT+VER", ["1.0.4\r\n", "OK\r\n"])
///     .reply_after("AT+CONNECT", 20, ["+CONNECTED\r\n"]);
/// assert_eq!(sink.pending(), 0);
/// ```
#[derive(Debug, Default)]
pub struct ScriptedSink {
    inbox: VecDeque<Delivery>,
    replies: Vec<Reply>,
    written: BytesMut,
    write_limit: Option<usize>,
    write_error: Option<io::ErrorKind>,
    closed: bool,
    reads: usize,
}

impl ScriptedSink {
    /// Create a sink with nothing queued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a chunk that the next read returns.
    pub fn chunk(mut self, data: impl Into<Bytes>) -> Self {
        self.push_chunk(data);
        self
    }

    /// Queue `reads` empty reads before whatever comes next.
    pub fn idle(mut self, reads: usize) -> Self {
        self.push_idle(reads);
        self
    }

    /// Release `chunks` once a written line contains `trigger`.
    ///
    /// Each reply fires once, in registration order.
    pub fn reply<I, C>(self, trigger: &str, chunks: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Bytes>,
    {
        self.reply_after(trigger, 0, chunks)
    }

    /// Like [`reply`](Self::reply), but the device stays silent for
    /// `idle_reads` reads before answering.
    pub fn reply_after<I, C>(mut self, trigger: &str, idle_reads: usize, chunks: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<Bytes>,
    {
        let mut deliveries = Vec::new();
        if idle_reads > 0 {
            deliveries.push(Delivery::Idle(idle_reads));
        }
        deliveries.extend(chunks.into_iter().map(|c| Delivery::Data(c.into())));

        self.replies.push(Reply {
            trigger: trigger.as_bytes().to_vec(),
            deliveries,
        });
        self
    }

    /// Accept at most `limit` bytes per write.
    pub fn short_writes(mut self, limit: usize) -> Self {
        self.write_limit = Some(limit);
        self
    }

    /// Fail every write with `kind`.
    pub fn failing_writes(mut self, kind: io::ErrorKind) -> Self {
        self.write_error = Some(kind);
        self
    }

    /// Queue a chunk while a session is running.
    pub fn push_chunk(&mut self, data: impl Into<Bytes>) {
        let data = data.into();
        if !data.is_empty() {
            self.inbox.push_back(Delivery::Data(data));
        }
    }

    /// Queue empty reads while a session is running.
    pub fn push_idle(&mut self, reads: usize) {
        if reads > 0 {
            self.inbox.push_back(Delivery::Idle(reads));
        }
    }

    /// Mark the device as gone once the inbox drains.
    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Everything written so far.
    pub fn written(&self) -> &[u8] {
        &self.written
    }

    /// Everything written so far, as text.
    pub fn written_str(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.written)
    }

    /// Number of `read_available` calls made.
    pub fn reads(&self) -> usize {
        self.reads
    }

    /// Queued deliveries not yet consumed.
    pub fn pending(&self) -> usize {
        self.inbox.len()
    }

    /// Replies still waiting for their trigger.
    pub fn unanswered(&self) -> usize {
        self.replies.len()
    }

    fn accept(&mut self, line: &[u8]) {
        self.written.extend_from_slice(line);

        if let Some(pos) = self
            .replies
            .iter()
            .position(|r| memmem::find(line, &r.trigger).is_some())
        {
            let reply = self.replies.remove(pos);
            self.inbox.extend(reply.deliveries);
        }
    }
}

impl ByteSink for ScriptedSink {
    async fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        if let Some(kind) = self.write_error {
            return Err(io::Error::new(kind, "scripted write failure"));
        }

        let n = self.write_limit.map_or(bytes.len(), |limit| limit.min(bytes.len()));
        self.accept(&bytes[..n]);
        Ok(n)
    }

    fn read_available(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.reads += 1;

        match self.inbox.pop_front() {
            None => Ok(0),
            Some(Delivery::Idle(n)) => {
                if n > 1 {
                    self.inbox.push_front(Delivery::Idle(n - 1));
                }
                Ok(0)
            }
            Some(Delivery::Data(mut data)) => {
                let n = data.len().min(buf.len());
                buf[..n].copy_from_slice(&data[..n]);
                if n < data.len() {
                    self.inbox.push_front(Delivery::Data(data.split_off(n)));
                }
                Ok(n)
            }
        }
    }

    fn is_closed(&self) -> bool {
        self.closed && self.inbox.is_empty()
    }
}
