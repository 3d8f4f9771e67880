use std::fmt;

/// Workflow-command levels the CI runner renders as annotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationLevel {
    Notice,
    Error,
}

impl fmt::Display for AnnotationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotationLevel::Notice => write!(f, "notice"),
            AnnotationLevel::Error => write!(f, "error"),
        }
    }
}

/// A single `::level::message` line for the CI log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub level: AnnotationLevel,
    pub message: String,
}

impl Annotation {
    pub fn notice(message: impl Into<String>) -> Self {
        Self {
            level: AnnotationLevel::Notice,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: AnnotationLevel::Error,
            message: message.into(),
        }
    }
}

impl fmt::Display for Annotation {
    /// Always a single line: `%`, CR and LF in the message are escaped.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "::{}::{}", self.level, escape_data(&self.message))
    }
}

fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
