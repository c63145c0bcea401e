//! Progress reporting for the workflow.

use std::sync::Mutex;

/// Sink for the per-step progress lines. Passed explicitly into the workflow
/// so callers decide where output goes.
pub trait Reporter: Send + Sync {
    fn success(&self, message: &str);
    fn message(&self, message: &str);
    fn error(&self, message: &str);
}

/// Emits progress through `tracing`, picking up the current ticket span.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn success(&self, message: &str) {
        tracing::info!(outcome = "success", "{message}");
    }

    fn message(&self, message: &str) {
        tracing::info!("{message}");
    }

    fn error(&self, message: &str) {
        tracing::error!("{message}");
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Success(String),
    Message(String),
    Error(String),
}

/// Keeps every reported line in memory, in order.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    lines: Mutex<Vec<Line>>,
}

impl MemoryReporter {
    pub fn lines(&self) -> Vec<Line> {
        self.lines.lock().map(|l| l.clone()).unwrap_or_default()
    }

    pub fn errors(&self) -> Vec<String> {
        self.lines()
            .into_iter()
            .filter_map(|line| match line {
                Line::Error(msg) => Some(msg),
                _ => None,
            })
            .collect()
    }

    fn push(&self, line: Line) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(line);
        }
    }
}

impl Reporter for MemoryReporter {
    fn success(&self, message: &str) {
        self.push(Line::Success(message.to_string()));
    }

    fn message(&self, message: &str) {
        self.push(Line::Message(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.push(Line::Error(message.to_string()));
    }
}
