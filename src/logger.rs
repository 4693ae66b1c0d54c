use std::sync::Mutex;

/// Sink for the connector's progress and failure messages.
pub trait Logger: Send + Sync {
    fn log(&self, message: &str);
}

/// Forwards every message to `tracing` at info level.
#[derive(Default, Clone, Copy, Debug)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, message: &str) {
        tracing::info!(target: "perforce_connector", "{message}");
    }
}

/// Keeps messages in memory so a host can inspect what happened during a fetch.
#[derive(Default, Debug)]
pub struct MemoryLogger {
    messages: Mutex<Vec<String>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// True if any recorded message contains `needle`.
    pub fn contains(&self, needle: &str) -> bool {
        self.messages().iter().any(|m| m.contains(needle))
    }
}

impl Logger for MemoryLogger {
    fn log(&self, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(message.to_string());
    }
}
