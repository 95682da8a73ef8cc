//! Fixed-capacity accumulation buffer with drop-oldest overflow.
//!
//! Bytes pulled off the wire are appended here between poll ticks. When the
//! buffer is full the oldest bytes are discarded, so the matcher always sees
//! a contiguous window of the most recent output.

use bytes::{Buf, BytesMut};

/// Bounded sliding-window buffer for response bytes.
#[derive(Debug)]
pub struct AccumulationBuffer {
    /// The current window.
    window: BytesMut,

    /// Maximum number of bytes kept.
    capacity: usize,

    /// Bytes hidden from the text view. Always contains `0x00`.
    filtered: Vec<u8>,

    /// Bytes appended since the last clear.
    total_appended: usize,

    /// Bytes evicted from the front since the last clear.
    dropped: usize,
}

impl AccumulationBuffer {
    /// Create an empty buffer holding at most `capacity` bytes.
    pub fn new(capacity: usize) -> Self {
        Self {
            window: BytesMut::with_capacity(capacity),
            capacity,
            filtered: vec![0x00],
            total_appended: 0,
            dropped: 0,
        }
    }

    /// Also hide these bytes from [`as_text`](Self::as_text).
    pub fn with_filtered(mut self, bytes: &[u8]) -> Self {
        for b in bytes {
            if !self.filtered.contains(b) {
                self.filtered.push(*b);
            }
        }
        self
    }

    /// Append a chunk, evicting from the front if the window would overflow.
    ///
    /// Only the trailing `capacity` bytes of an oversized chunk survive.
    pub fn append(&mut self, data: &[u8]) {
        if data.is_empty() {
            return;
        }
        self.total_appended += data.len();

        if data.len() >= self.capacity {
            self.dropped += self.window.len() + (data.len() - self.capacity);
            self.window.clear();
            self.window
                .extend_from_slice(&data[data.len() - self.capacity..]);
            return;
        }

        let needed = self.window.len() + data.len();
        if needed > self.capacity {
            let overflow = needed - self.capacity;
            // O(1) pointer bump; the freed prefix is reclaimed on reserve.
            self.window.advance(overflow);
            self.dropped += overflow;
        }
        self.window.extend_from_slice(data);
    }

    /// Reset to empty. Storage is kept for reuse.
    pub fn clear(&mut self) {
        self.window.clear();
        self.total_appended = 0;
        self.dropped = 0;
    }

    /// The window as text, with filtered bytes removed (lossy UTF-8).
    pub fn as_text(&self) -> String {
        let visible: Vec<u8> = self
            .window
            .iter()
            .copied()
            .filter(|b| !self.filtered.contains(b))
            .collect();
        String::from_utf8_lossy(&visible).into_owned()
    }

    /// Raw window contents, unfiltered.
    pub fn as_bytes(&self) -> &[u8] {
        &self.window
    }

    pub fn len(&self) -> usize {
        self.window.len()
    }

    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes hidden from the text view.
    pub fn filtered_bytes(&self) -> &[u8] {
        &self.filtered
    }

    /// Total bytes appended since the last clear, including evicted ones.
    pub fn total_appended(&self) -> usize {
        self.total_appended
    }

    /// Bytes lost to overflow since the last clear.
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_small_response() {
        let mut buffer = AccumulationBuffer::new(16);
        buffer.append(b"OK\r\n");
        assert_eq!(buffer.as_text(), "OK\r\n");
        assert_eq!(buffer.len(), 4);
        assert_eq!(buffer.dropped(), 0);
    }

    #[test]
    fn test_overflow_drops_oldest() {
        let mut buffer = AccumulationBuffer::new(8);
        buffer.append(b"ABCDEFGH");
        buffer.append(b"IJ");
        assert_eq!(buffer.as_bytes(), b"CDEFGHIJ");
        assert_eq!(buffer.dropped(), 2);
        assert_eq!(buffer.total_appended(), 10);
    }

    #[test]
    fn test_oversized_chunk_keeps_tail() {
        let mut buffer = AccumulationBuffer::new(4);
        buffer.append(b"xy");
        buffer.append(b"0123456789");
        assert_eq!(buffer.as_bytes(), b"6789");
        assert_eq!(buffer.dropped(), 8);
    }

    #[test]
    fn test_chunk_exactly_capacity() {
        let mut buffer = AccumulationBuffer::new(4);
        buffer.append(b"ab");
        buffer.append(b"WXYZ");
        assert_eq!(buffer.as_bytes(), b"WXYZ");
    }

    #[test]
    fn test_sliding_window_matches_suffix() {
        let capacity = 7;
        let mut buffer = AccumulationBuffer::new(capacity);
        let mut everything = Vec::new();

        // Chunk sizes cycle through empty, small and oversized appends.
        let mut seed = 3u8;
        for round in 0..200usize {
            let size = (round * 5) % 11;
            let chunk: Vec<u8> = (0..size)
                .map(|_| {
                    seed = seed.wrapping_mul(31).wrapping_add(7);
                    b'a' + seed % 26
                })
                .collect();

            buffer.append(&chunk);
            everything.extend_from_slice(&chunk);

            assert!(buffer.len() <= capacity);
            let keep = capacity.min(everything.len());
            assert_eq!(buffer.as_bytes(), &everything[everything.len() - keep..]);
        }
    }

    #[test]
    fn test_empty_append_is_noop() {
        let mut buffer = AccumulationBuffer::new(8);
        buffer.append(b"AT");
        buffer.append(b"");
        assert_eq!(buffer.as_bytes(), b"AT");
        assert_eq!(buffer.total_appended(), 2);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut buffer = AccumulationBuffer::new(8);
        buffer.append(b"garbage data");
        buffer.clear();
        assert_eq!(buffer.as_text(), "");
        buffer.clear();
        assert_eq!(buffer.as_text(), "");
        assert!(buffer.is_empty());
        assert_eq!(buffer.dropped(), 0);
    }

    #[test]
    fn test_zero_bytes_filtered_from_text() {
        let mut buffer = AccumulationBuffer::new(16);
        buffer.append(b"O\0K\0\r\n");
        assert_eq!(buffer.as_text(), "OK\r\n");
        assert_eq!(buffer.len(), 6);
    }

    #[test]
    fn test_extra_filtered_bytes() {
        let mut buffer = AccumulationBuffer::new(32).with_filtered(b"+");
        buffer.append(b"+CONNECTED\r\n");
        assert_eq!(buffer.as_text(), "CONNECTED\r\n");
        assert_eq!(buffer.filtered_bytes(), &[0x00, b'+']);
    }
}
