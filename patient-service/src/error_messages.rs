//! User-facing error messages, keyed by symbolic name.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorMessage {
    NotFound,
    RequiredParameter,
    Unauthorized,
}

impl ErrorMessage {
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorMessage::NotFound => "Resource not found",
            ErrorMessage::RequiredParameter => "Required parameter is missing",
            ErrorMessage::Unauthorized => "Not authorized",
        }
    }
}

impl fmt::Display for ErrorMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
