//! Half-duplex AT-command session engine.

use std::time::Duration;

use log::{debug, trace, warn};
use tokio::time::{Instant, sleep};

use super::outcome::{Outcome, Response};
use crate::channel::{AccumulationBuffer, Verdict, classify};
use crate::error::{Result, TransportError};
use crate::profile::DeviceProfile;
use crate::transport::ByteSink;

/// Placeholder logged instead of hidden commands.
const MASK: &str = "********";

/// How a resolved exchange ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Ok,
    TimedOut,
    DeviceError,
    Unknown,
}

/// Engine state for the current exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No command in flight.
    Idle,

    /// Command written, polling not started.
    Sent,

    /// Waiting for a token.
    Polling,

    /// Exchange finished; the next `send` re-arms.
    Resolved(Resolution),
}

/// Drives command/response exchanges over a [`ByteSink`].
///
/// The engine owns its accumulation buffer and a sink value. Pass
/// `&mut sink` to lend a shared UART instead of handing it over.
///
/// # Example
///
/// ```rust
/// use atwire::profile::devices;
/// use atwire::session::SessionEngine;
/// use atwire::transport::ScriptedSink;
///
/// # async fn example() -> Result<(), atwire::Error> {
/// let sink = ScriptedSink::new().reply("AT+VER", ["1.0.4\r\nOK\r\n"]);
/// let mut engine = SessionEngine::new(sink, devices::ble12::profile())?;
///
/// let response = engine.exchange("AT+VER").await?;
/// println!("{}", response);
/// # Ok(())
/// # }
/// ```
pub struct SessionEngine<S> {
    /// Byte transport.
    sink: S,

    /// Protocol settings for the attached device.
    profile: DeviceProfile,

    /// Window of recent bytes.
    buffer: AccumulationBuffer,

    /// Per-tick read target.
    scratch: Vec<u8>,

    state: SessionState,

    /// When the current exchange started.
    started: Option<Instant>,

    /// Poll ticks spent on the current exchange.
    ticks: u64,

    /// Time the last exchange took to resolve.
    elapsed: Duration,

    /// Command in flight, masked if hidden.
    command: String,
}

impl<S: ByteSink> SessionEngine<S> {
    /// Create an engine for `sink` using `profile`.
    pub fn new(sink: S, profile: DeviceProfile) -> Result<Self> {
        profile.validate()?;

        let buffer = AccumulationBuffer::new(profile.capacity).with_filtered(&profile.filtered_bytes);
        let scratch = vec![0u8; profile.read_chunk];

        Ok(Self {
            sink,
            profile,
            buffer,
            scratch,
            state: SessionState::Idle,
            started: None,
            ticks: 0,
            elapsed: Duration::ZERO,
            command: String::new(),
        })
    }

    /// Write `command` plus the line terminator and arm the engine.
    ///
    /// Clears the buffer first so nothing from the previous exchange leaks
    /// into this one.
    pub async fn send(&mut self, command: &str) -> Result<()> {
        self.transmit(command, false).await
    }

    /// Like [`send`](Self::send), but the command never reaches the logs.
    pub async fn send_hidden(&mut self, command: &str) -> Result<()> {
        self.transmit(command, true).await
    }

    async fn transmit(&mut self, command: &str, hidden: bool) -> Result<()> {
        self.buffer.clear();
        self.ticks = 0;
        let shown = if hidden { MASK } else { command };
        self.command = shown.to_string();

        let line = self.profile.line_ending.frame(command);
        let started = Instant::now();
        debug!("{}: send {:?}", self.profile.name, self.command);

        // A stalled UART must not outlive the exchange budget.
        let budget = self.profile.timeout;
        let written = match tokio::time::timeout(budget, self.sink.write(&line)).await {
            Ok(Ok(n)) => n,
            Ok(Err(e)) => {
                self.disarm();
                return Err(TransportError::Write(e).into());
            }
            Err(_) => {
                warn!("{}: write of {:?} stalled", self.profile.name, self.command);
                self.disarm();
                return Err(TransportError::WriteTimeout(budget).into());
            }
        };
        if written != line.len() {
            self.disarm();
            return Err(TransportError::WriteFailed {
                written,
                expected: line.len(),
            }
            .into());
        }

        self.started = Some(started);
        self.state = SessionState::Sent;
        Ok(())
    }

    /// Poll until `success` or one of `failures` appears, or `timeout` elapses.
    ///
    /// The budget is wall-clock since [`send`](Self::send); bytes that match
    /// nothing do not extend it. Called without a command in flight, the
    /// engine clears its window and waits for unsolicited output instead.
    ///
    /// Dropping the returned future abandons the exchange; the next `send`
    /// starts over cleanly.
    pub async fn await_response<F: AsRef<str>>(
        &mut self,
        success: &str,
        failures: &[F],
        timeout: Duration,
    ) -> Result<Outcome> {
        let started = match (self.state, self.started) {
            (SessionState::Sent | SessionState::Polling, Some(started)) => started,
            _ => self.rearm(),
        };
        self.state = SessionState::Polling;

        if started.elapsed() >= timeout {
            // Budget spent before polling began.
            let captured = self.buffer.as_text();
            return Ok(self.resolve(started, Resolution::TimedOut, Outcome::Timeout { captured }));
        }

        loop {
            self.pull()?;

            match classify(&self.buffer.as_text(), success, failures) {
                Verdict::Success => {
                    self.settle(started, timeout).await?;
                    let captured = self.buffer.as_text();
                    return Ok(self.resolve(started, Resolution::Ok, Outcome::Ok(captured)));
                }
                Verdict::DeviceFailure(token) => {
                    let captured = self.buffer.as_text();
                    debug!("{}: device reported {:?}", self.profile.name, token);
                    return Ok(self.resolve(
                        started,
                        Resolution::DeviceError,
                        Outcome::DeviceReported { token, captured },
                    ));
                }
                Verdict::Undecided => {}
            }

            if self.sink.is_closed() {
                warn!(
                    "{}: link closed while waiting on {:?}",
                    self.profile.name, self.command
                );
                let captured = self.buffer.as_text();
                return Ok(self.resolve(started, Resolution::Unknown, Outcome::Unknown { captured }));
            }

            let remaining = timeout.saturating_sub(started.elapsed());
            if !remaining.is_zero() {
                sleep(self.profile.poll_interval.min(remaining)).await;
            }
            self.ticks += 1;

            if started.elapsed() >= timeout {
                let captured = self.buffer.as_text();
                return Ok(self.resolve(started, Resolution::TimedOut, Outcome::Timeout { captured }));
            }
        }
    }

    /// Await the profile's own tokens with the profile's default timeout.
    pub async fn await_reply(&mut self) -> Result<Outcome> {
        let tokens = self.profile.tokens.clone();
        let timeout = self.profile.timeout;
        self.await_response(&tokens.success, &tokens.failures, timeout)
            .await
    }

    /// Send a command and wait for its reply.
    pub async fn exchange(&mut self, command: &str) -> Result<Response> {
        self.send(command).await?;
        self.finish_exchange().await
    }

    /// Like [`exchange`](Self::exchange), with the command masked in logs
    /// and in the returned [`Response`].
    pub async fn exchange_hidden(&mut self, command: &str) -> Result<Response> {
        self.send_hidden(command).await?;
        self.finish_exchange().await
    }

    async fn finish_exchange(&mut self) -> Result<Response> {
        let outcome = self.await_reply().await?;
        Ok(Response {
            command: self.command.clone(),
            outcome,
            elapsed: self.elapsed,
            ticks: self.ticks,
            dropped_bytes: self.buffer.dropped(),
        })
    }

    /// Run commands in order, stopping after the first one that does not
    /// succeed. The failing response is the last element.
    ///
    /// A transport error aborts the run and is returned in place of the
    /// responses collected so far; the window still holds whatever the
    /// failed command captured. Use [`exchange`](Self::exchange) per step
    /// to keep earlier responses across a link failure.
    pub async fn exchange_all(&mut self, commands: &[&str]) -> Result<Vec<Response>> {
        let mut responses = Vec::with_capacity(commands.len());
        for command in commands {
            let response = self.exchange(command).await?;
            let proceed = response.is_success();
            responses.push(response);
            if !proceed {
                break;
            }
        }
        Ok(responses)
    }

    /// Wait for an unsolicited line such as `+CONNECTED` without sending.
    pub async fn listen(&mut self, token: &str, timeout: Duration) -> Result<Outcome> {
        self.disarm();
        self.command = format!("<listen {}>", token);
        self.await_response::<&str>(token, &[], timeout).await
    }

    /// The current window as text.
    pub fn last_captured_text(&self) -> String {
        self.buffer.as_text()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Poll ticks spent on the current or last exchange.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn profile(&self) -> &DeviceProfile {
        &self.profile
    }

    /// Change the default per-exchange timeout.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.profile.timeout = timeout;
    }

    pub fn buffer(&self) -> &AccumulationBuffer {
        &self.buffer
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Give the sink back.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Read whatever is available and append it to the window.
    fn pull(&mut self) -> Result<usize> {
        let n = match self.sink.read_available(&mut self.scratch) {
            Ok(n) => n.min(self.scratch.len()),
            Err(e) => {
                self.disarm();
                return Err(TransportError::Read(e).into());
            }
        };

        if n > 0 {
            trace!(
                "{}: rx {} bytes: {:?}",
                self.profile.name,
                n,
                String::from_utf8_lossy(&self.scratch[..n])
            );
            self.buffer.append(&self.scratch[..n]);
        }
        Ok(n)
    }

    /// Grace period after a success match: let trailing bytes land, then
    /// drain them so they do not leak into the next exchange.
    async fn settle(&mut self, started: Instant, timeout: Duration) -> Result<()> {
        let grace = self
            .profile
            .settle_delay
            .min(timeout.saturating_sub(started.elapsed()));
        if !grace.is_zero() {
            sleep(grace).await;
        }

        if started.elapsed() >= timeout {
            return Ok(());
        }

        // Anything past one full window would be evicted anyway.
        let mut drained = 0;
        while drained < self.buffer.capacity() {
            match self.pull()? {
                0 => break,
                n => drained += n,
            }
        }
        Ok(())
    }

    fn rearm(&mut self) -> Instant {
        self.buffer.clear();
        self.ticks = 0;
        let now = Instant::now();
        self.started = Some(now);
        now
    }

    fn disarm(&mut self) {
        self.state = SessionState::Idle;
        self.started = None;
    }

    fn resolve(&mut self, started: Instant, resolution: Resolution, outcome: Outcome) -> Outcome {
        self.elapsed = started.elapsed();
        self.state = SessionState::Resolved(resolution);

        if self.buffer.dropped() > 0 {
            warn!(
                "{}: response window overflowed, {} oldest bytes dropped",
                self.profile.name,
                self.buffer.dropped()
            );
        }
        debug!(
            "{}: {:?} resolved {:?} after {:?} ({} ticks)",
            self.profile.name, self.command, resolution, self.elapsed, self.ticks
        );
        outcome
    }
}
