//! Rolling Logger
//!
//! A `tracing` layer that mirrors every event to the browser console
//! (stderr on native targets) and keeps the most recent records in a
//! circular buffer, so the app can show or dump them later.

use std::collections::VecDeque;
use std::fmt::{self, Write as _};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::Layer;

/// Default number of records kept in the buffer
pub const DEFAULT_CAPACITY: usize = 256;

/// One captured log event
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub level: Level,
    pub target: String,
    pub message: String,
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:>5} {}: {}",
            self.timestamp.format("%H:%M:%S%.3f"),
            self.level,
            self.target,
            self.message
        )
    }
}

/// Logger settings
#[derive(Debug, Clone, Copy)]
pub struct RollingConfig {
    /// Max records kept in memory
    pub capacity: usize,
    /// Most verbose level that is recorded
    pub max_level: LevelFilter,
}

impl Default for RollingConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            max_level: if cfg!(debug_assertions) {
                LevelFilter::DEBUG
            } else {
                LevelFilter::INFO
            },
        }
    }
}

/// Read access to the circular buffer
#[derive(Debug, Clone)]
pub struct RollingHandle {
    buffer: Arc<Mutex<VecDeque<LogRecord>>>,
    capacity: usize,
}

impl RollingHandle {
    fn new(capacity: usize) -> Self {
        Self {
            buffer: Arc::new(Mutex::new(VecDeque::with_capacity(capacity))),
            capacity,
        }
    }

    fn push(&self, record: LogRecord) {
        if self.capacity == 0 {
            return;
        }
        let Ok(mut buffer) = self.buffer.lock() else {
            return;
        };
        while buffer.len() >= self.capacity {
            buffer.pop_front();
        }
        buffer.push_back(record);
    }

    /// Buffered records, oldest first
    pub fn recent(&self) -> Vec<LogRecord> {
        self.buffer
            .lock()
            .map(|buffer| buffer.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut buffer) = self.buffer.lock() {
            buffer.clear();
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Layer that records events into a [`RollingHandle`]
pub struct RollingLayer {
    handle: RollingHandle,
    echo: bool,
}

impl RollingLayer {
    /// Layer that also echoes each record to the console
    pub fn new(capacity: usize) -> (Self, RollingHandle) {
        let handle = RollingHandle::new(capacity);
        (Self { handle: handle.clone(), echo: true }, handle)
    }

    /// Layer that only buffers
    pub fn silent(capacity: usize) -> (Self, RollingHandle) {
        let handle = RollingHandle::new(capacity);
        (Self { handle: handle.clone(), echo: false }, handle)
    }
}

impl<S: Subscriber> Layer<S> for RollingLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        let mut visitor = RecordVisitor::default();
        event.record(&mut visitor);

        let record = LogRecord {
            timestamp: Utc::now(),
            level: *meta.level(),
            target: visitor.target.take().unwrap_or_else(|| meta.target().to_string()),
            message: visitor.finish(),
        };
        if self.echo {
            emit(&record);
        }
        self.handle.push(record);
    }
}

/// Collects the message and any extra fields of an event
#[derive(Default)]
struct RecordVisitor {
    message: String,
    fields: String,
    /// Original target of events bridged from the `log` crate
    target: Option<String>,
}

impl RecordVisitor {
    fn finish(self) -> String {
        let mut out = self.message;
        out.push_str(&self.fields);
        out
    }
}

impl Visit for RecordVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            "message" => self.message.push_str(value),
            "log.target" => self.target = Some(value.to_string()),
            name if name.starts_with("log.") => {}
            name => {
                let _ = write!(self.fields, " {}={}", name, value);
            }
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        match field.name() {
            "message" => {
                let _ = write!(self.message, "{:?}", value);
            }
            name if name.starts_with("log.") => {}
            name => {
                let _ = write!(self.fields, " {}={:?}", name, value);
            }
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn emit(record: &LogRecord) {
    use wasm_bindgen::JsValue;
    use web_sys::console;

    let line = JsValue::from_str(&record.to_string());
    match record.level {
        Level::ERROR => console::error_1(&line),
        Level::WARN => console::warn_1(&line),
        Level::INFO => console::info_1(&line),
        _ => console::debug_1(&line),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn emit(record: &LogRecord) {
    eprintln!("{}", record);
}

/// Install the rolling layer as the global subscriber.
///
/// Also bridges the `log` crate, so library crates logging through it
/// end up in the same buffer. Fails if a global subscriber already exists.
pub fn init(config: RollingConfig) -> Result<RollingHandle, TryInitError> {
    let (layer, handle) = RollingLayer::new(config.capacity);
    tracing_subscriber::registry()
        .with(layer.with_filter(config.max_level))
        .try_init()?;
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::{info, warn};

    fn capture(capacity: usize, f: impl FnOnce()) -> RollingHandle {
        let (layer, handle) = RollingLayer::silent(capacity);
        let subscriber = tracing_subscriber::registry().with(layer);
        tracing::subscriber::with_default(subscriber, f);
        handle
    }

    #[test]
    fn test_records_message_and_fields() {
        let handle = capture(8, || {
            info!(card = "42", "[BOARD] moved card");
        });

        let records = handle.recent();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].level, Level::INFO);
        assert_eq!(records[0].message, "[BOARD] moved card card=42");
    }

    #[test]
    fn test_evicts_oldest_when_full() {
        let handle = capture(2, || {
            info!("first");
            info!("second");
            warn!("third");
        });

        let messages: Vec<_> = handle.recent().into_iter().map(|r| r.message).collect();
        assert_eq!(messages, vec!["second", "third"]);
    }

    #[test]
    fn test_zero_capacity_keeps_nothing() {
        let handle = capture(0, || info!("dropped"));
        assert!(handle.recent().is_empty());
    }

    #[test]
    fn test_clear() {
        let handle = capture(4, || info!("one"));
        handle.clear();
        assert!(handle.recent().is_empty());
        assert_eq!(handle.capacity(), 4);
    }

    #[test]
    fn test_display_format() {
        let handle = capture(1, || warn!("careful"));
        let line = handle.recent()[0].to_string();
        assert!(line.contains(" WARN "));
        assert!(line.ends_with(": careful"));
    }
}
