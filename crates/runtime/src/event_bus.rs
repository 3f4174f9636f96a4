use crate::frame::Frame;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

/// Structured diagnostic record.
///
/// Every event is also forwarded to `tracing`, so hosts with a subscriber see
/// the same stream the tests inspect here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub frame_index: u64,
    pub severity: Severity,
    pub kind: &'static str,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct EventBus {
    events: Vec<Event>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn emit(&mut self, frame: Frame, kind: &'static str, message: impl Into<String>) {
        let message = message.into();
        tracing::debug!(frame = frame.index, kind, "{message}");
        self.push(frame, Severity::Info, kind, message);
    }

    pub fn error(&mut self, frame: Frame, kind: &'static str, message: impl Into<String>) {
        let message = message.into();
        tracing::error!(frame = frame.index, kind, "{message}");
        self.push(frame, Severity::Error, kind, message);
    }

    fn push(&mut self, frame: Frame, severity: Severity, kind: &'static str, message: String) {
        self.events.push(Event {
            frame_index: frame.index,
            severity,
            kind,
            message,
        });
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}
