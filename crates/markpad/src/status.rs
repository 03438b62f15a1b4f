use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    fn display_duration(self) -> Duration {
        match self {
            Severity::Info => Duration::from_secs(3),
            Severity::Success => Duration::from_secs(2),
            Severity::Warning => Duration::from_secs(5),
            Severity::Error => Duration::from_secs(7),
        }
    }
}

/// Transient status line with severity-dependent auto-expiry.
#[derive(Debug, Default)]
pub struct StatusLine {
    message: Option<(String, Severity, Instant)>,
}

impl StatusLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, severity: Severity, message: impl Into<String>) {
        self.message = Some((message.into(), severity, Instant::now()));
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.set(Severity::Info, message);
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.set(Severity::Success, message);
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.set(Severity::Warning, message);
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.set(Severity::Error, message);
    }

    /// Drops the message once its display window has passed.
    pub fn update(&mut self) {
        if let Some((_, severity, created_at)) = &self.message {
            if created_at.elapsed() > severity.display_duration() {
                self.message = None;
            }
        }
    }

    pub fn current(&self) -> Option<(&str, Severity)> {
        self.message
            .as_ref()
            .map(|(message, severity, _)| (message.as_str(), *severity))
    }

    pub fn clear(&mut self) {
        self.message = None;
    }
}
