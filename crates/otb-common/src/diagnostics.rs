//! Diagnostics sink for non-fatal decode conditions.
//!
//! Decoders never print. Anything worth reporting that does not abort the
//! load (skipped attributes, normalized ids, dropped items) is handed to a
//! [`Diagnostics`] implementation supplied by the caller.

use std::fmt;

use log::Level;

/// Receives messages emitted while decoding.
pub trait Diagnostics {
    /// Record one message.
    fn emit(&mut self, level: Level, message: fmt::Arguments<'_>);

    /// Record a warning.
    fn warn(&mut self, message: fmt::Arguments<'_>) {
        self.emit(Level::Warn, message);
    }

    /// Record an informational note.
    fn info(&mut self, message: fmt::Arguments<'_>) {
        self.emit(Level::Info, message);
    }

    /// Record a debug note.
    fn debug(&mut self, message: fmt::Arguments<'_>) {
        self.emit(Level::Debug, message);
    }
}

impl<D: Diagnostics + ?Sized> Diagnostics for &mut D {
    fn emit(&mut self, level: Level, message: fmt::Arguments<'_>) {
        (**self).emit(level, message);
    }
}

/// Forwards every message to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDiagnostics {
    target: Option<&'static str>,
}

impl LogDiagnostics {
    /// Log under the default `otb` target.
    pub const fn new() -> Self {
        Self { target: None }
    }

    /// Log under a custom target.
    pub const fn with_target(target: &'static str) -> Self {
        Self {
            target: Some(target),
        }
    }
}

impl Diagnostics for LogDiagnostics {
    fn emit(&mut self, level: Level, message: fmt::Arguments<'_>) {
        let target = self.target.unwrap_or("otb");
        log::log!(target: target, level, "{}", message);
    }
}

/// Discards every message.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Diagnostics for Silent {
    fn emit(&mut self, _level: Level, _message: fmt::Arguments<'_>) {}
}

/// Keeps every message in memory for later inspection.
#[derive(Debug, Clone, Default)]
pub struct Collected {
    entries: Vec<(Level, String)>,
}

impl Collected {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded messages, oldest first.
    pub fn entries(&self) -> &[(Level, String)] {
        &self.entries
    }

    /// Recorded warnings only.
    pub fn warnings(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(level, _)| *level == Level::Warn)
            .map(|(_, message)| message.as_str())
    }

    /// Whether no warning was recorded.
    pub fn is_clean(&self) -> bool {
        self.warnings().next().is_none()
    }
}

impl Diagnostics for Collected {
    fn emit(&mut self, level: Level, message: fmt::Arguments<'_>) {
        self.entries.push((level, message.to_string()));
    }
}
