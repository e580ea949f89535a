//! Console Logger
//!
//! Installs a `tracing-subscriber` fmt layer whose writer forwards each
//! formatted event to the browser console (`console.error` / `console.warn` /
//! `console.log` by level). On native targets the same lines go to stderr,
//! which keeps the logger usable from tests.

use std::io;

use thiserror::Error;
use tracing::{Level, Metadata};
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::fmt::MakeWriter;

#[derive(Debug, Error)]
pub enum LoggerError {
    #[error("logger already initialized: {0}")]
    AlreadyInitialized(String),
}

/// Install the global subscriber.
///
/// `debug` lowers the max level from INFO to DEBUG.
pub fn init_logger(app_name: &str, debug: bool) -> Result<(), LoggerError> {
    let max_level = if debug { Level::DEBUG } else { Level::INFO };

    tracing_subscriber::fmt()
        .with_writer(ConsoleMakeWriter)
        .with_timer(LocalClock)
        .with_ansi(false)
        .with_target(true)
        .with_max_level(max_level)
        .try_init()
        .map_err(|e| LoggerError::AlreadyInitialized(e.to_string()))?;

    tracing::info!(app = app_name, ?max_level, "logger initialized");
    Ok(())
}

/// `HH:MM:SS.mmm` in local time
struct LocalClock;

impl FormatTime for LocalClock {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%H:%M:%S%.3f"))
    }
}

/// Hands out one [`ConsoleWriter`] per event, tagged with the event level.
#[derive(Clone, Copy)]
pub struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter::new(Level::INFO)
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter::new(*meta.level())
    }
}

/// Buffers one formatted event and emits it when dropped.
pub struct ConsoleWriter {
    level: Level,
    buf: Vec<u8>,
}

impl ConsoleWriter {
    fn new(level: Level) -> Self {
        Self { level, buf: Vec::new() }
    }
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if let Some(line) = take_line(&mut self.buf) {
            emit(self.level, &line);
        }
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        if let Some(line) = take_line(&mut self.buf) {
            emit(self.level, &line);
        }
    }
}

/// Drain the buffer into a single line without the trailing newline.
fn take_line(buf: &mut Vec<u8>) -> Option<String> {
    if buf.is_empty() {
        return None;
    }
    let text = String::from_utf8_lossy(buf).trim_end().to_string();
    buf.clear();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(target_arch = "wasm32")]
fn emit(level: Level, line: &str) {
    let value = wasm_bindgen::JsValue::from_str(line);
    match level {
        Level::ERROR => web_sys::console::error_1(&value),
        Level::WARN => web_sys::console::warn_1(&value),
        Level::INFO => web_sys::console::info_1(&value),
        _ => web_sys::console::log_1(&value),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn emit(_level: Level, line: &str) {
    eprintln!("{}", line);
}
