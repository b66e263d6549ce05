//! Diagnostics non fatals relevés pendant un scan.
//!
//! Ils ne modifient jamais les fragments émis : ils servent à `swapgen check`
//! et aux logs.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    /// Ligne (1-based) du header.
    pub line: Option<usize>,
    /// Structure en cours au moment du diagnostic.
    pub record: Option<String>,
}

impl Diagnostic {
    pub fn error(msg: impl Into<String>) -> Self {
        Self::new(Severity::Error, msg)
    }

    pub fn warning(msg: impl Into<String>) -> Self {
        Self::new(Severity::Warning, msg)
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self::new(Severity::Info, msg)
    }

    fn new(severity: Severity, msg: impl Into<String>) -> Self {
        Self { severity, message: msg.into(), line: None, record: None }
    }

    #[must_use]
    pub fn at_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    #[must_use]
    pub fn in_record(mut self, record: impl Into<String>) -> Self {
        self.record = Some(record.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.severity)?;
        if let Some(line) = self.line {
            write!(f, " [ligne {line}]")?;
        }
        if let Some(rec) = &self.record {
            write!(f, " ({rec})")?;
        }
        write!(f, ": {}", self.message)
    }
}
