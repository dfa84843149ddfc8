//! Trace sinks.

use std::io::Write;
use std::sync::Mutex;

use thiserror::Error;

use crate::trace::event::{TraceCategory, TraceEvent};

/// Errors a sink may report. The executor logs and drops them.
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("Trace sink I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Trace sink unavailable: {0}")]
    Unavailable(String),
}

/// Destination for trace lines.
pub trait TraceSink: Send + Sync {
    fn emit(&self, event: TraceEvent) -> Result<(), TraceError>;
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl TraceSink for NoopSink {
    fn emit(&self, _event: TraceEvent) -> Result<(), TraceError> {
        Ok(())
    }
}

/// Forwards each line to `tracing` under the `http_exec::trace` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TraceSink for TracingSink {
    fn emit(&self, event: TraceEvent) -> Result<(), TraceError> {
        tracing::info!(
            target: "http_exec::trace",
            category = %event.category,
            "{}",
            event.text
        );
        Ok(())
    }
}

/// Writes one plain line per event to any writer (stdout, a file, a buffer).
pub struct WriterSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(w) => w,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write + Send> TraceSink for WriterSink<W> {
    fn emit(&self, event: TraceEvent) -> Result<(), TraceError> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| TraceError::Unavailable("writer lock poisoned".to_string()))?;
        writeln!(writer, "{}", event.text)?;
        Ok(())
    }
}

/// Keeps every event in memory, in emission order.
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: Mutex<Vec<TraceEvent>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<TraceEvent> {
        match self.events.lock() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.events().into_iter().map(|e| e.text).collect()
    }

    pub fn of_category(&self, category: TraceCategory) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|e| e.category == category)
            .map(|e| e.text)
            .collect()
    }
}

impl TraceSink for CollectingSink {
    fn emit(&self, event: TraceEvent) -> Result<(), TraceError> {
        self.events
            .lock()
            .map_err(|_| TraceError::Unavailable("event buffer poisoned".to_string()))?
            .push(event);
        Ok(())
    }
}

/// Emit a block of events; a failing sink never fails the call.
pub(crate) fn emit_all(sink: &dyn TraceSink, events: Vec<TraceEvent>) {
    for event in events {
        let category = event.category;
        if let Err(e) = sink.emit(event) {
            tracing::warn!(
                error = %e,
                category = %category,
                "Trace sink rejected event, dropping it"
            );
        }
    }
}
