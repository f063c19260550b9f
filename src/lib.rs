//! sortwatch - sort files into extension-based subfolders
//!
//! This library sorts the files of a directory into subfolders chosen by
//! file extension, driven by a user-defined rule table. It supports a
//! one-shot mode that sorts everything currently present, and a watch
//! mode that reacts to filesystem notifications as new files appear.
//! Both modes share one engine: classify by extension, then move into
//! the destination folder, renaming on collision so nothing is ever
//! overwritten.

pub mod classifier;
pub mod cli;
pub mod config;
pub mod file_mover;
pub mod organizer;
pub mod output;
pub mod watcher;

pub use classifier::RuleTable;
pub use config::{ConfigError, IgnoreRules, SortConfig, SortPlan};
pub use file_mover::{FileMover, MoveError};
pub use organizer::{ScanSummary, organize_once};
pub use watcher::{WatchError, watch};

pub use cli::{Cli, run_cli};
