//! Outcome and response types for AT exchanges.

use std::fmt;
use std::time::Duration;

use crate::error::{Result, SessionError};

/// How a single `await_response` call concluded.
///
/// Every variant carries the text captured from the wire, so callers can
/// print it whatever the result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The success token was seen.
    Ok(String),

    /// Neither token was seen within the budget.
    Timeout { captured: String },

    /// The device answered with a failure token.
    DeviceReported { token: String, captured: String },

    /// The link closed before any token was seen.
    Unknown { captured: String },
}

impl Outcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Ok(_))
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Outcome::Timeout { .. })
    }

    /// The text captured during the exchange.
    pub fn captured(&self) -> &str {
        match self {
            Outcome::Ok(captured)
            | Outcome::Timeout { captured }
            | Outcome::DeviceReported { captured, .. }
            | Outcome::Unknown { captured } => captured,
        }
    }

    /// Turn non-success outcomes into errors for `?`-style call sites.
    ///
    /// `budget` is only used to describe a timeout.
    pub fn into_result(self, budget: Duration) -> Result<String> {
        match self {
            Outcome::Ok(captured) => Ok(captured),
            Outcome::Timeout { .. } => Err(SessionError::Timeout(budget).into()),
            Outcome::DeviceReported { token, .. } => {
                Err(SessionError::DeviceReported { token }.into())
            }
            Outcome::Unknown { .. } => Err(SessionError::Unknown.into()),
        }
    }
}

/// Result of one full command exchange.
#[derive(Debug, Clone)]
pub struct Response {
    /// The command that was sent (masked if hidden).
    pub command: String,

    /// How the exchange concluded.
    pub outcome: Outcome,

    /// Time from send to resolution.
    pub elapsed: Duration,

    /// Poll ticks spent waiting.
    pub ticks: u64,

    /// Bytes evicted from the window during the exchange.
    pub dropped_bytes: usize,
}

impl Response {
    /// Check if the response indicates success.
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// The captured text.
    pub fn text(&self) -> &str {
        self.outcome.captured()
    }

    /// Non-empty captured lines, with terminators stripped.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text()
            .lines()
            .map(|l| l.trim_end_matches('\r'))
            .filter(|l| !l.is_empty())
    }

    /// Check if the captured text contains a substring (e.g. `+CONNECTED`).
    pub fn contains(&self, pattern: &str) -> bool {
        self.text().contains(pattern)
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    fn response(outcome: Outcome) -> Response {
        Response {
            command: "AT+VER".to_string(),
            outcome,
            elapsed: Duration::from_millis(12),
            ticks: 3,
            dropped_bytes: 0,
        }
    }

    #[test]
    fn test_captured_for_every_variant() {
        assert_eq!(Outcome::Ok("OK".into()).captured(), "OK");
        assert_eq!(
            Outcome::Timeout {
                captured: "...".into()
            }
            .captured(),
            "..."
        );
        assert_eq!(
            Outcome::DeviceReported {
                token: "ERR".into(),
                captured: "ERR7".into()
            }
            .captured(),
            "ERR7"
        );
    }

    #[test]
    fn test_into_result() {
        let budget = Duration::from_secs(1);
        assert_eq!(Outcome::Ok("OK".into()).into_result(budget).unwrap(), "OK");

        let err = Outcome::Timeout {
            captured: String::new(),
        }
        .into_result(budget)
        .unwrap_err();
        assert!(matches!(err, Error::Session(SessionError::Timeout(d)) if d == budget));

        let err = Outcome::DeviceReported {
            token: "FAIL".into(),
            captured: "FAIL\r\n".into(),
        }
        .into_result(budget)
        .unwrap_err();
        assert!(matches!(
            err,
            Error::Session(SessionError::DeviceReported { ref token }) if token == "FAIL"
        ));
    }

    #[test]
    fn test_response_lines() {
        let resp = response(Outcome::Ok("\r\n1.0.4\r\n+READY\r\nOK\r\n".into()));
        let lines: Vec<&str> = resp.lines().collect();
        assert_eq!(lines, vec!["1.0.4", "+READY", "OK"]);
        assert!(resp.contains("+READY"));
        assert!(resp.is_success());
        assert_eq!(resp.to_string(), resp.text());
    }
}
