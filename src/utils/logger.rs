use std::sync::atomic::{AtomicU8, Ordering};

use crate::bindings::{jsLog, LogLevel};

static MAX_LOG_LEVEL: AtomicU8 = AtomicU8::new(3);

#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub enum LoggerLevel {
    None = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
}

/// Logging façade forwarding to the JavaScript console through `jsLog`, with a
/// process-wide maximum level.
pub struct Logger {}

impl Logger {
    pub fn set_logger_level(new_level: LoggerLevel) {
        MAX_LOG_LEVEL.store(new_level as u8, Ordering::Relaxed);
    }

    pub fn error(text: &str) {
        if MAX_LOG_LEVEL.load(Ordering::Relaxed) >= LoggerLevel::Error as u8 {
            jsLog(LogLevel::Error, text);
        }
    }

    pub fn warn(text: &str) {
        if MAX_LOG_LEVEL.load(Ordering::Relaxed) >= LoggerLevel::Warn as u8 {
            jsLog(LogLevel::Warn, text);
        }
    }

    pub fn info(text: &str) {
        if MAX_LOG_LEVEL.load(Ordering::Relaxed) >= LoggerLevel::Info as u8 {
            jsLog(LogLevel::Info, text);
        }
    }

    pub fn debug(text: &str) {
        if MAX_LOG_LEVEL.load(Ordering::Relaxed) >= LoggerLevel::Debug as u8 {
            jsLog(LogLevel::Debug, text);
        }
    }

    /// Variant of `Logger::debug` only formatting its message when the level is
    /// actually logged.
    pub fn lazy_debug(func: &dyn Fn() -> String) {
        if MAX_LOG_LEVEL.load(Ordering::Relaxed) >= LoggerLevel::Debug as u8 {
            jsLog(LogLevel::Debug, &func());
        }
    }

    /// Variant of `Logger::info` only formatting its message when the level is
    /// actually logged.
    pub fn lazy_info(func: &dyn Fn() -> String) {
        if MAX_LOG_LEVEL.load(Ordering::Relaxed) >= LoggerLevel::Info as u8 {
            jsLog(LogLevel::Info, &func());
        }
    }
}
