// # -----------------------------
// # crates/core/src/lib.rs
// # -----------------------------
//! Terminal-independent heart of diffnav.
//!
//! The path tree is rebuilt from the flat file list on every change; the
//! panel state machine in [`app`] consumes [`app::Input`] values and answers
//! with [`app::Command`] values for the front end to carry out.

pub mod app;
pub mod cache;
pub mod diff_view;
pub mod file_tree;
pub mod icons;
pub mod keys;
pub mod panes;
pub mod search;
pub mod tree;

pub use app::{App, Command, Input, MouseKind, Panel};
pub use cache::{Lookup, RenderCache, RenderParams, StoreOutcome};
pub use file_tree::FileTree;
pub use keys::{Action, Key};
pub use search::Search;
pub use tree::{Row, RowKind, Selection, TreeNode};
