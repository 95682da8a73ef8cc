//! Wire-level settings shared by every sink.

use serde::{Deserialize, Serialize};

/// Line terminator appended to each command line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineEnding {
    /// Carriage return alone (`\r`).
    Cr,

    /// Carriage return then line feed (`\r\n`). Accepted by most modules.
    #[default]
    CrLf,

    /// Line feed alone (`\n`).
    Lf,
}

impl LineEnding {
    /// The terminator bytes.
    pub fn as_bytes(&self) -> &'static [u8] {
        match self {
            LineEnding::Cr => b"\r",
            LineEnding::CrLf => b"\r\n",
            LineEnding::Lf => b"\n",
        }
    }

    /// Build a full command line: command bytes followed by the terminator.
    pub fn frame(&self, command: &str) -> Vec<u8> {
        let terminator = self.as_bytes();
        let mut line = Vec::with_capacity(command.len() + terminator.len());
        line.extend_from_slice(command.as_bytes());
        line.extend_from_slice(terminator);
        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame() {
        assert_eq!(LineEnding::CrLf.frame("AT"), b"AT\r\n");
        assert_eq!(LineEnding::Cr.frame("AT+RESET"), b"AT+RESET\r");
        assert_eq!(LineEnding::Lf.frame("AT+CONNECT"), b"AT+CONNECT\n");
    }

    #[test]
    fn test_default_is_crlf() {
        assert_eq!(LineEnding::default(), LineEnding::CrLf);
    }
}
