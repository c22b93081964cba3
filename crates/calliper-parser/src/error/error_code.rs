//! Error codes for path data diagnostics.

use std::fmt;

/// Error codes for categorizing path data errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Unexpected character.
    ///
    /// A character that is neither a command letter, a number nor a separator.
    E001,

    /// Missing or malformed coordinate.
    ///
    /// A command was given fewer arguments than it takes, or an argument
    /// is not a valid number.
    E002,

    /// Path data must begin with a moveto.
    E003,

    /// Empty path data.
    ///
    /// The `d` attribute is empty or contains only whitespace.
    E004,

    /// Invalid arc flag.
    ///
    /// The large-arc and sweep flags of an arc must be `0` or `1`.
    E005,
}

impl ErrorCode {
    /// Returns the string representation of this error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "E001",
            ErrorCode::E002 => "E002",
            ErrorCode::E003 => "E003",
            ErrorCode::E004 => "E004",
            ErrorCode::E005 => "E005",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::E001 => "unexpected character",
            ErrorCode::E002 => "missing or malformed coordinate",
            ErrorCode::E003 => "path data must begin with a moveto",
            ErrorCode::E004 => "empty path data",
            ErrorCode::E005 => "invalid arc flag",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
