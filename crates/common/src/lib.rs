// # -----------------------------
// # crates/common/src/lib.rs
// # -----------------------------
//! Types shared by every diffnav crate: parsed file changes, configuration
//! and the values exchanged with the external diff formatter.

pub mod change;
pub mod config;
pub mod patch;
pub mod render;

pub use change::{sort_files, ChangeStatus, FileChange, HunkStat};
pub use config::{Config, ConfigError, IconStyle, UiConfig};
pub use patch::{parse_unified_diff, PatchError};
pub use render::{RenderRequest, RenderResult};

/// Separator between path segments in diff paths.
pub const SEPARATOR: char = '/';
