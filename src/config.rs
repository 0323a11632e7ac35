//! Configuration file support
//!
//! Loads settings from ~/.trace-annotator.toml (or
//! %USERPROFILE%\.trace-annotator.toml on Windows), or from a path given on
//! the command line. A missing file means defaults.
//!
//! Example:
//! ```text
//! # trace-annotator configuration
//! export_path = "annotations.json"
//! traces = "traces.json"
//! default_behavior = "Causal inference"
//! default_score = 2
//! wrap_width = 100
//! log_file = "/tmp/trace-annotator.log"
//! log_filter = "trace_annotator=debug"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::annotation::{Behavior, Score};
use crate::error::{AnnotatorError, Result};

const CONFIG_FILE_NAME: &str = ".trace-annotator.toml";

/// Default tracing filter when neither RUST_LOG nor the config sets one
pub const DEFAULT_LOG_FILTER: &str = "trace_annotator=info";

/// Configuration settings
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Where exported annotations are written
    pub export_path: PathBuf,
    /// Trace file to load instead of the built-in samples
    pub traces: Option<PathBuf>,
    /// Behavior preselected for new annotations
    pub default_behavior: Behavior,
    /// Score preselected for new annotations
    pub default_score: Score,
    /// Maximum width the trace text is wrapped to (None = terminal width)
    pub wrap_width: Option<usize>,
    /// Log file; logging is off when unset
    pub log_file: Option<PathBuf>,
    /// tracing-subscriber filter directive
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            export_path: PathBuf::from("annotations.json"),
            traces: None,
            default_behavior: Behavior::default(),
            default_score: Score::default(),
            wrap_width: None,
            log_file: None,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

/// On-disk form; every key is optional
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    export_path: Option<PathBuf>,
    traces: Option<PathBuf>,
    default_behavior: Option<String>,
    default_score: Option<Score>,
    wrap_width: Option<usize>,
    log_file: Option<PathBuf>,
    log_filter: Option<String>,
}

impl Config {
    /// Get the default config file path
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(windows)]
        {
            std::env::var("USERPROFILE")
                .ok()
                .map(|home| PathBuf::from(home).join(CONFIG_FILE_NAME))
        }

        #[cfg(not(windows))]
        {
            std::env::var("HOME")
                .ok()
                .map(|home| PathBuf::from(home).join(CONFIG_FILE_NAME))
        }
    }

    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse config file contents
    pub fn parse(contents: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(contents)?;
        let mut config = Config::default();
        config.apply(raw)?;
        Ok(config)
    }

    /// Apply settings from a parsed config
    fn apply(&mut self, raw: RawConfig) -> Result<()> {
        if let Some(path) = raw.export_path {
            self.export_path = path;
        }

        if raw.traces.is_some() {
            self.traces = raw.traces;
        }

        if let Some(name) = raw.default_behavior {
            self.default_behavior = Behavior::from_name(&name).ok_or_else(|| {
                AnnotatorError::InvalidArgument(format!("unknown behavior: {}", name))
            })?;
        }

        if let Some(score) = raw.default_score {
            self.default_score = score;
        }

        if let Some(width) = raw.wrap_width {
            self.wrap_width = Some(width.clamp(20, 400)); // Between 20 and 400
        }

        if raw.log_file.is_some() {
            self.log_file = raw.log_file;
        }

        if let Some(filter) = raw.log_filter {
            self.log_filter = filter;
        }

        Ok(())
    }
}
