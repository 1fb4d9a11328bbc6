//! Structured logging setup.
//!
//! One idempotent entry point, [`init_tracing`], installs a `tracing`
//! subscriber filtered per module. `RUST_LOG` overrides the configured filter.
//! A subscriber installed earlier by the host (Bevy's `LogPlugin`, a test
//! harness) is left in place.

use std::sync::Once;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TracingConfig {
    pub default_level: LogLevel,
    pub module_filters: Vec<(String, LogLevel)>,
    pub show_targets: bool,
    pub show_file_line: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            default_level: LogLevel::Info,
            module_filters: vec![
                ("duel_core::fighter".to_string(), LogLevel::Info),
                ("duel_core::ai".to_string(), LogLevel::Info),
                ("duel_core::combat".to_string(), LogLevel::Info),
                ("duel_core::game".to_string(), LogLevel::Info),
            ],
            show_targets: true,
            show_file_line: false,
        }
    }
}

impl TracingConfig {
    /// Same defaults with every duel module at `level`.
    pub fn verbose(level: LogLevel) -> Self {
        let mut config = Self::default();
        for (_, module_level) in config.module_filters.iter_mut() {
            *module_level = level;
        }
        config
    }

    pub fn to_env_filter_string(&self) -> String {
        let mut parts = vec![self.default_level.as_str().to_string()];
        for (module, level) in &self.module_filters {
            parts.push(format!("{}={}", module, level.as_str()));
        }
        parts.join(",")
    }
}

static TRACING_INIT: Once = Once::new();

pub fn init_tracing_default() {
    init_tracing(&TracingConfig::default());
}

/// Install the global subscriber. First call wins.
pub fn init_tracing(config: &TracingConfig) {
    let filter_str = config.to_env_filter_string();
    let show_targets = config.show_targets;
    let show_file_line = config.show_file_line;

    TRACING_INIT.call_once(move || {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&filter_str));

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(show_targets)
            .with_file(show_file_line)
            .with_line_number(show_file_line)
            .compact();

        let _ = subscriber.try_init();
    });
}

/// Span guard that reports its wall-clock duration when dropped.
pub struct TimingSpan {
    name: String,
    started: Instant,
    _span: tracing::span::EnteredSpan,
}

impl TimingSpan {
    pub fn new(name: &str) -> Self {
        let span = tracing::info_span!("timed", name = name);
        Self {
            name: name.to_string(),
            started: Instant::now(),
            _span: span.entered(),
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for TimingSpan {
    fn drop(&mut self) {
        tracing::debug!(name = %self.name, elapsed_ms = self.elapsed_ms(), "finished");
    }
}
