// src/trace.rs
//! Injectable diagnostic sink
//!
//! Decode diagnostics are routed through a sink owned by the parsing
//! context instead of a process-global callback. The default sink drops
//! everything; `LogSink` forwards to the `log` facade.

/// Receives raw-sentence traces and decode error messages
pub trait TraceSink {
    fn trace(&self, message: &str);
    fn error(&self, message: &str);
}

/// Default sink: discards all diagnostics
#[derive(Debug, Default)]
pub struct NopSink;

impl TraceSink for NopSink {
    fn trace(&self, _message: &str) {}
    fn error(&self, _message: &str) {}
}

/// Forwards diagnostics to the `log` crate facade
#[derive(Debug, Default)]
pub struct LogSink;

impl TraceSink for LogSink {
    fn trace(&self, message: &str) {
        log::trace!("{}", message);
    }

    fn error(&self, message: &str) {
        log::error!("{}", message);
    }
}
