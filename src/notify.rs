use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Success,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Success => "success",
            Severity::Warning => "warning",
            Severity::Error => "error",
        };

        f.write_str(label)
    }
}

/// User-facing outcome sink. Rendering is up to the host.
pub trait Notify: Send + Sync {
    fn notify(&self, message: &str, severity: Severity);
}
