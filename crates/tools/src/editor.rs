use std::process::Command;

use tracing::{debug, info};

use crate::ToolError;

/// `$EDITOR`, if set to something non-empty.
pub fn editor_command() -> Option<String> {
    std::env::var("EDITOR")
        .ok()
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty())
}

/// Runs `$EDITOR <path>` in the foreground and waits for it.
///
/// Returns `Ok(false)` without doing anything when no editor is configured.
/// The caller must hand the terminal over before calling this.
pub fn open_in_editor(path: &str) -> Result<bool, ToolError> {
    let Some(editor) = editor_command() else {
        debug!("EDITOR not set, ignoring open");
        return Ok(false);
    };
    info!(editor = %editor, path, "opening editor");
    let status = Command::new(&editor)
        .arg(path)
        .status()
        .map_err(|source| ToolError::EditorSpawn {
            editor: editor.clone(),
            source,
        })?;
    if !status.success() {
        return Err(ToolError::EditorFailed {
            editor,
            code: status.code().unwrap_or(-1),
        });
    }
    Ok(true)
}
