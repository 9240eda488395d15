use ansi_to_tui::IntoText;
use ratatui::text::Line;
use tracing::debug;

/// Formatter output parsed into styled lines, kept until the text changes.
#[derive(Default)]
pub struct StyledDiff {
    key: String,
    source: String,
    lines: Vec<Line<'static>>,
}

impl StyledDiff {
    pub fn lines(&mut self, key: &str, raw: &str) -> &[Line<'static>] {
        if self.key != key || self.source != raw {
            self.key = key.to_string();
            self.source = raw.to_string();
            self.lines = to_lines(raw);
        }
        &self.lines
    }
}

/// SGR sequences become styles; unparseable output is shown as plain text.
pub fn to_lines(raw: &str) -> Vec<Line<'static>> {
    match raw.as_bytes().into_text() {
        Ok(text) => text.lines,
        Err(err) => {
            debug!(error = %err, "formatter output is not valid ANSI");
            raw.lines().map(|l| Line::raw(l.to_string())).collect()
        }
    }
}
