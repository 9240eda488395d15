use arboard::Clipboard;
use tracing::debug;

use crate::ToolError;

pub fn copy_to_clipboard(text: &str) -> Result<(), ToolError> {
    let mut clipboard = Clipboard::new()?;
    clipboard.set_text(text.to_string())?;
    debug!(chars = text.len(), "copied to clipboard");
    Ok(())
}
