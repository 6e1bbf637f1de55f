//! User-facing notifications
//!
//! Managers never print. They hand a message and a [`Severity`] to an injected
//! [`Notifier`]; the terminal front end uses [`TerminalNotifier`], a web
//! front end would raise a toast.

use colored::Colorize;
use std::fmt;

/// How a notification should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Success,
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Success => "success",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
        };
        f.write_str(label)
    }
}

/// Sink for user-facing messages
pub trait Notifier: Send + Sync {
    /// Present `message` to the user
    fn notify(&self, message: &str, severity: Severity);
}

/// Notifier that prints colored lines to the terminal
///
/// Success and info lines go to stdout and are suppressed in quiet mode;
/// warnings and errors always go to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalNotifier {
    quiet: bool,
}

impl TerminalNotifier {
    /// Create a notifier
    #[must_use]
    pub const fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        tracing::debug!(%severity, text = message, "notification");

        match severity {
            Severity::Success if !self.quiet => println!("{}", message.green()),
            Severity::Info if !self.quiet => println!("{}", message.cyan()),
            Severity::Warning => eprintln!("{} {message}", "warning:".yellow().bold()),
            Severity::Error => eprintln!("{} {message}", "error:".red().bold()),
            _ => {}
        }
    }
}
