//! Response classification by substring search.

use memchr::memmem;
use serde::{Deserialize, Serialize};

/// Result of classifying the current window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The success token is present.
    Success,

    /// A failure token is present (and the success token is not).
    DeviceFailure(String),

    /// Keep polling.
    Undecided,
}

impl Verdict {
    /// Whether the exchange has concluded either way.
    pub fn is_decided(&self) -> bool {
        !matches!(self, Verdict::Undecided)
    }
}

/// The success token and failure tokens a device answers with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchTokens {
    /// Literal that concludes a successful exchange.
    pub success: String,

    /// Literals that conclude a failed exchange.
    pub failures: Vec<String>,
}

impl MatchTokens {
    /// Tokens with no failure literals; only the timeout ends a failed exchange.
    pub fn new(success: impl Into<String>) -> Self {
        Self {
            success: success.into(),
            failures: Vec::new(),
        }
    }

    /// Add a failure token.
    pub fn with_failure(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        if !self.failures.contains(&token) {
            self.failures.push(token);
        }
        self
    }

    /// Classify `text` against these tokens.
    pub fn classify(&self, text: &str) -> Verdict {
        classify(text, &self.success, &self.failures)
    }
}

impl Default for MatchTokens {
    fn default() -> Self {
        Self::new("OK").with_failure("ERROR").with_failure("FAIL")
    }
}

/// Decide whether `text` holds a success or failure token.
///
/// The success check runs first, so a window containing both resolves as
/// success. Empty tokens never match.
pub fn classify<S: AsRef<str>>(text: &str, success: &str, failures: &[S]) -> Verdict {
    let haystack = text.as_bytes();

    if contains(haystack, success) {
        return Verdict::Success;
    }

    failures
        .iter()
        .map(AsRef::as_ref)
        .find(|token| contains(haystack, token))
        .map(|token| Verdict::DeviceFailure(token.to_string()))
        .unwrap_or(Verdict::Undecided)
}

fn contains(haystack: &[u8], token: &str) -> bool {
    !token.is_empty() && memmem::find(haystack, token.as_bytes()).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_token() {
        assert_eq!(classify("OK\r\n", "OK", &["FAIL"]), Verdict::Success);
    }

    #[test]
    fn test_failure_token() {
        assert_eq!(
            classify("ERR14 UNABLE TO CONNECT", "OK", &["ERR"]),
            Verdict::DeviceFailure("ERR".to_string())
        );
    }

    #[test]
    fn test_success_takes_priority() {
        let text = "FAIL: retrying\r\nOK\r\n";
        assert_eq!(classify(text, "OK", &["FAIL"]), Verdict::Success);
    }

    #[test]
    fn test_undecided() {
        let verdict = classify("+CONNEC", "OK", &["ERR", "FAIL"]);
        assert_eq!(verdict, Verdict::Undecided);
        assert!(!verdict.is_decided());
    }

    #[test]
    fn test_token_spanning_chunks() {
        // Classification always sees the joined window.
        let window = ["+CONNEC", "TED\r\nOK\r\n"].concat();
        assert_eq!(classify(&window, "OK", &["ERR"]), Verdict::Success);
    }

    #[test]
    fn test_empty_tokens_never_match() {
        let none: [&str; 0] = [];
        assert_eq!(classify("anything", "", &none), Verdict::Undecided);
        assert_eq!(classify("anything", "OK", &[""]), Verdict::Undecided);
    }

    #[test]
    fn test_match_tokens_builder() {
        let tokens = MatchTokens::new("OK")
            .with_failure("ERR")
            .with_failure("FAIL")
            .with_failure("ERR");
        assert_eq!(tokens.failures, vec!["ERR".to_string(), "FAIL".to_string()]);
        assert_eq!(
            tokens.classify("FAIL\r\n"),
            Verdict::DeviceFailure("FAIL".to_string())
        );
    }

    #[test]
    fn test_default_tokens() {
        let tokens = MatchTokens::default();
        assert_eq!(tokens.success, "OK");
        assert!(tokens.classify("ERROR\r\n").is_decided());
    }
}
