// # -----------------------------
// # crates/tools/src/lib.rs
// # -----------------------------
//! Processes and services the viewer hands work to: the diff formatter,
//! the system clipboard and the user's editor.

pub mod clipboard;
pub mod editor;
pub mod formatter;

pub use clipboard::copy_to_clipboard;
pub use editor::{editor_command, open_in_editor};
pub use formatter::{Formatter, FormatterError};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("clipboard unavailable: {0}")]
    Clipboard(#[from] arboard::Error),
    #[error("failed to start editor `{editor}`: {source}")]
    EditorSpawn {
        editor: String,
        #[source]
        source: std::io::Error,
    },
    #[error("editor `{editor}` exited with status {code}")]
    EditorFailed { editor: String, code: i32 },
}
