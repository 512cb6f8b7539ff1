//! Tracing subscriber setup for hopnet
//!
//! # Quick Start
//!
//! ```ignore
//! use hopnet_logging::{HopnetSubscriberBuilder, LogConfig};
//!
//! // JSONL to console
//! HopnetSubscriberBuilder::new().init();
//!
//! // Pretty human-readable output with debug walk traces
//! HopnetSubscriberBuilder::new()
//!     .with_config(LogConfig::development())
//!     .init();
//! ```
//!
//! `RUST_LOG` always wins over the configured default level, so
//! `RUST_LOG=hopnet_routing=trace` shows every forward hop.

pub mod config;

pub use config::{ConsoleConfig, FileConfig, JsonlConfig, LogConfig, RotationStrategy};

use std::fs::{self, File};

use thiserror::Error;
use tracing::Subscriber;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::format::{Format, Json, JsonFields};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Errors raised while installing the subscriber
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log filter {0:?}: {1}")]
    InvalidFilter(String, String),

    #[error("Log file setup failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Rolling appender setup failed: {0}")]
    Appender(String),

    #[error("A global subscriber is already installed: {0}")]
    AlreadyInitialized(String),
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Builder for configuring and initializing the hopnet logging subscriber
///
/// By default, console output uses JSONL format. Use
/// `LogConfig::development()` for human-readable pretty output.
#[derive(Debug, Default)]
pub struct HopnetSubscriberBuilder {
    config: LogConfig,
}

impl HopnetSubscriberBuilder {
    /// Create a new subscriber builder with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific configuration
    pub fn with_config(mut self, config: LogConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the default log level
    pub fn with_level(mut self, level: impl Into<String>) -> Self {
        self.config.default_level = level.into();
        self
    }

    /// Enable or disable console output
    pub fn with_console(mut self, enabled: bool) -> Self {
        self.config.console.enabled = enabled;
        self
    }

    /// Configure file output
    pub fn with_file_output(mut self, config: FileConfig) -> Self {
        self.config.file = Some(config);
        self
    }

    pub fn config(&self) -> &LogConfig {
        &self.config
    }

    /// Initialize the subscriber globally, reporting failures on stderr.
    ///
    /// The returned guard flushes file output on drop; keep it alive for
    /// the life of the program.
    pub fn init(self) -> Option<WorkerGuard> {
        match self.try_init() {
            Ok(guard) => guard,
            Err(e) => {
                eprintln!("Warning: logging not initialized: {}", e);
                None
            }
        }
    }

    /// Initialize the subscriber globally
    pub fn try_init(self) -> Result<Option<WorkerGuard>, LoggingError> {
        let env_filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::try_new(&self.config.default_level).map_err(|e| {
                LoggingError::InvalidFilter(self.config.default_level.clone(), e.to_string())
            })?,
        };

        let mut layers: Vec<BoxedLayer> = Vec::new();
        let mut guard = None;

        if self.config.console.enabled {
            if self.config.console.pretty {
                layers.push(
                    fmt::layer()
                        .with_ansi(self.config.console.ansi)
                        .with_target(true)
                        .boxed(),
                );
            } else {
                layers.push(json_layer(&self.config.jsonl).boxed());
            }
        }

        if let Some(file_config) = &self.config.file {
            let (writer, file_guard) = file_writer(file_config)?;
            guard = Some(file_guard);
            layers.push(
                json_layer(&self.config.jsonl)
                    .with_ansi(false)
                    .with_writer(writer)
                    .boxed(),
            );
        }

        Registry::default()
            .with(layers)
            .with(env_filter)
            .try_init()
            .map_err(|e| LoggingError::AlreadyInitialized(e.to_string()))?;

        Ok(guard)
    }
}

fn json_layer<S>(config: &JsonlConfig) -> fmt::Layer<S, JsonFields, Format<Json>>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fmt::layer()
        .json()
        .with_current_span(config.include_current_span)
        .with_span_list(config.include_spans)
        .flatten_event(config.flatten_events)
        .with_file(config.include_location)
        .with_line_number(config.include_location)
}

/// Truncates a single file for `Never`, rolls for the others
fn file_writer(config: &FileConfig) -> Result<(NonBlocking, WorkerGuard), LoggingError> {
    fs::create_dir_all(&config.directory)?;
    let rotation = match config.rotation {
        RotationStrategy::Never => {
            let path = config.directory.join(format!("{}.log", config.prefix));
            let file = File::create(path)?;
            return Ok(tracing_appender::non_blocking(file));
        }
        RotationStrategy::Daily => Rotation::DAILY,
        RotationStrategy::Hourly => Rotation::HOURLY,
    };
    let appender = RollingFileAppender::builder()
        .rotation(rotation)
        .filename_prefix(config.prefix.as_str())
        .filename_suffix("log")
        .build(&config.directory)
        .map_err(|e| LoggingError::Appender(e.to_string()))?;
    Ok(tracing_appender::non_blocking(appender))
}
