//! User-facing failure categories shared by all core operations.

use std::fmt::{Display, Formatter};

/// Category of an operation failure, surfaced to the UI next to the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Bad caller input: missing columns, no files, non-numeric values.
    Validation,
    /// An input spreadsheet could not be read.
    Read,
    /// The output spreadsheet could not be written.
    Write,
    /// The store rejected a write.
    Persistence,
    /// Any other failure while importing.
    Import,
}

impl ErrorKind {
    /// Stable snake_case label used in logs and UI envelopes.
    pub fn label(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Read => "read",
            Self::Write => "write",
            Self::Persistence => "persistence",
            Self::Import => "import",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
