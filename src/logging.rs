//! Console sink for the `log` facade.
//!
//! The service logs through `log` under [`LOG_TARGET`]. In the browser,
//! [`init_console_logger`] routes those records to `console.*`; on native
//! targets they go to stdout/stderr.

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

/// Target used for every record emitted by this crate.
pub const LOG_TARGET: &str = "stripe_service";

/// Plain-text `log::Log` implementation writing to the browser console.
#[derive(Debug)]
pub struct ConsoleLogger {
    level: LevelFilter,
}

impl ConsoleLogger {
    pub fn new(level: LevelFilter) -> Self {
        Self { level }
    }
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        write_console(record.level(), &record.args().to_string());
    }

    fn flush(&self) {}
}

/// Install [`ConsoleLogger`] as the global logger.
pub fn init_console_logger(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_boxed_logger(Box::new(ConsoleLogger::new(level)))?;
    log::set_max_level(level);
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn write_console(level: Level, line: &str) {
    use wasm_bindgen::JsValue;
    use web_sys::console;

    let line = JsValue::from_str(line);
    match level {
        Level::Error => console::error_1(&line),
        Level::Warn => console::warn_1(&line),
        Level::Info => console::info_1(&line),
        Level::Debug | Level::Trace => console::debug_1(&line),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn write_console(level: Level, line: &str) {
    if level <= Level::Warn {
        eprintln!("{line}");
    } else {
        println!("{line}");
    }
}
