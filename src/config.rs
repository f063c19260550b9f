//! Sorting rules and watcher configuration.
//!
//! Configuration is loaded from a TOML document that supplies the
//! extension-to-folder rule table, the fallback folder for unmatched
//! extensions, the settle delay used by watch mode, and rules for files
//! that should never be touched (temporary download files, hidden files,
//! and so on).
//!
//! # Configuration File Format
//!
//! ```toml
//! default_folder = "Others"
//! settle_delay_ms = 500
//!
//! [rules]
//! pdf = "Documents"
//! jpg = "Images"
//! jpeg = "Images"
//! zip = "Archives"
//!
//! [ignore]
//! filenames = [".DS_Store", "Thumbs.db"]
//! extensions = ["tmp", "crdownload", "part", "partial"]
//! patterns = ["*.lock"]
//! include_hidden = false
//! ```

use crate::classifier::RuleTable;
use glob::Pattern;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Errors that can occur during configuration loading and compilation.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    ConfigInvalid(String),
    /// Invalid glob pattern in the ignore rules.
    InvalidIgnorePattern(String),
    /// IO error while reading configuration.
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::InvalidIgnorePattern(pattern) => {
                write!(f, "Invalid ignore pattern '{}'", pattern)
            }
            ConfigError::IoError(msg) => write!(f, "IO error reading configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Raw sorting configuration as read from a TOML document.
///
/// Call [`SortConfig::compile`] to turn it into the validated structures
/// the sorting engine works with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortConfig {
    /// Extension-to-folder mapping (e.g. `pdf = "Documents"`).
    #[serde(default)]
    pub rules: HashMap<String, String>,

    /// Destination folder for files whose extension has no rule.
    #[serde(default = "default_folder_name")]
    pub default_folder: String,

    /// How long watch mode waits after a file appears before moving it,
    /// in milliseconds. Best-effort only; see the watcher module.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Rules for files that should be left in place.
    #[serde(default)]
    pub ignore: IgnoreRules,
}

fn default_folder_name() -> String {
    "Others".to_string()
}

fn default_settle_delay_ms() -> u64 {
    500
}

/// Rules for files the sorter must leave alone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IgnoreRules {
    /// Exact filenames to skip (e.g. ".DS_Store", "Thumbs.db").
    #[serde(default)]
    pub filenames: Vec<String>,

    /// File extensions to skip. Defaults to common in-progress download
    /// suffixes so watch mode does not grab half-written files.
    #[serde(default = "default_ignore_extensions")]
    pub extensions: Vec<String>,

    /// Glob patterns to skip (matched against the file name).
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Whether to sort hidden files (starting with "."). Defaults to false.
    #[serde(default)]
    pub include_hidden: bool,
}

fn default_ignore_extensions() -> Vec<String> {
    vec![
        "tmp".to_string(),
        "crdownload".to_string(),
        "part".to_string(),
        "partial".to_string(),
    ]
}

impl Default for IgnoreRules {
    fn default() -> Self {
        Self {
            filenames: Vec::new(),
            extensions: default_ignore_extensions(),
            patterns: Vec::new(),
            include_hidden: false,
        }
    }
}

impl SortConfig {
    /// Load configuration from a file, with fallback to defaults.
    ///
    /// Attempts to load configuration in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `sortwatch.toml` in the current directory
    /// 3. Look for `~/.config/sortwatch/config.toml` in home directory
    /// 4. Fall back to default configuration (empty rules, "Others")
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is explicitly provided but
    /// cannot be read or parsed.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        // If explicitly specified, load from that path
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        // Try current directory
        let local_config = PathBuf::from("sortwatch.toml");
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        // Try home directory
        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("sortwatch")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        // Fall back to defaults
        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ConfigNotFound` if the file does not exist.
    /// Returns `ConfigError::ConfigInvalid` if TOML parsing fails.
    /// Returns `ConfigError::IoError` if the file cannot be read.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// Compile configuration into the structures the sorting engine uses.
    ///
    /// # Errors
    ///
    /// Returns an error if any ignore glob patterns are invalid.
    pub fn compile(self) -> Result<SortPlan, ConfigError> {
        let ignore = CompiledIgnore::new(self.ignore)?;
        Ok(SortPlan {
            rules: RuleTable::new(self.rules, self.default_folder),
            settle_delay: Duration::from_millis(self.settle_delay_ms),
            ignore,
        })
    }
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            rules: HashMap::new(),
            default_folder: default_folder_name(),
            settle_delay_ms: default_settle_delay_ms(),
            ignore: IgnoreRules::default(),
        }
    }
}

/// Validated, ready-to-use sorting configuration.
///
/// Owned by the process for its lifetime and never mutated; both the
/// one-shot scanner and the watcher borrow it per file.
#[derive(Clone)]
pub struct SortPlan {
    /// Extension-to-folder resolution.
    pub rules: RuleTable,
    /// Fixed wait before watch mode handles a newly observed file.
    pub settle_delay: Duration,
    /// Files the sorter must leave in place.
    pub ignore: CompiledIgnore,
}

/// Pre-compiled ignore rules for efficient per-file matching.
#[derive(Clone)]
pub struct CompiledIgnore {
    include_hidden: bool,
    filenames: HashSet<String>,
    extensions: HashSet<String>,
    patterns: Vec<Pattern>,
}

impl CompiledIgnore {
    /// Create compiled ignore rules, validating all glob patterns.
    fn new(rules: IgnoreRules) -> Result<Self, ConfigError> {
        let patterns = rules
            .patterns
            .iter()
            .map(|pattern| {
                Pattern::new(pattern)
                    .map_err(|_| ConfigError::InvalidIgnorePattern(pattern.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            include_hidden: rules.include_hidden,
            filenames: rules.filenames.into_iter().collect(),
            extensions: rules
                .extensions
                .iter()
                .map(|ext| ext.to_lowercase())
                .collect(),
            patterns,
        })
    }

    /// Check if a file should be sorted (not ignored).
    ///
    /// Checks are performed in this order, with early termination:
    /// 1. Hidden file filter - if hidden and not included, skip
    /// 2. Exact filename match - if matched, skip
    /// 3. File extension match - if matched, skip
    /// 4. Glob pattern match against the file name - if matched, skip
    /// 5. Default: sort
    pub fn should_sort(&self, file_path: &Path) -> bool {
        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        if !self.include_hidden && file_name.starts_with('.') {
            return false;
        }

        if self.filenames.contains(file_name.as_ref()) {
            return false;
        }

        if let Some(ext) = file_path.extension() {
            let ext_lower = ext.to_string_lossy().to_lowercase();
            if self.extensions.contains(&ext_lower) {
                return false;
            }
        }

        if self
            .patterns
            .iter()
            .any(|pattern| pattern.matches(&file_name))
        {
            return false;
        }

        true
    }
}
