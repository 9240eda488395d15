//! Values exchanged with the external diff formatter.
//!
//! A request is a snapshot: it owns its patch text, so later changes to the
//! viewer state cannot leak into an in-flight render.

/// One formatter invocation for a file or directory key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub key: String,
    /// Bumped by the cache each time it re-issues a request for `key`.
    pub generation: u64,
    pub patch: String,
    pub width: u16,
    pub side_by_side: bool,
}

impl RenderRequest {
    /// Lines longer than this are wrapped by the formatter.
    pub fn max_line_length(&self) -> u16 {
        self.width
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderResult {
    pub key: String,
    pub generation: u64,
    /// Styled text, or the failure message.
    pub outcome: Result<String, String>,
}
