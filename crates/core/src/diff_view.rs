/// Rows taken by the diff pane header: path, stats and a rule.
pub const DIFF_HEADER_HEIGHT: usize = 3;

/// Viewport over the rendered diff of the displayed key.
#[derive(Debug, Clone, Default)]
pub struct DiffView {
    key: Option<String>,
    scroll: usize,
    width: usize,
    height: usize,
}

impl DiffView {
    /// Switches to `key`; scrolling restarts at the top when it changes.
    pub fn show(&mut self, key: &str) {
        if self.key.as_deref() != Some(key) {
            self.key = Some(key.to_string());
            self.scroll = 0;
        }
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn set_size(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Rows left for diff text below the header.
    pub fn content_height(&self) -> usize {
        self.height.saturating_sub(DIFF_HEADER_HEIGHT)
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    /// Scrolls down, stopping when the last of `total_lines` reaches the
    /// bottom of the viewport.
    pub fn scroll_down(&mut self, lines: usize, total_lines: usize) {
        let max = total_lines.saturating_sub(self.content_height());
        self.scroll = (self.scroll + lines).min(max);
    }

    pub fn half_page(&self) -> usize {
        (self.content_height() / 2).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scroll_stops_at_last_page() {
        let mut view = DiffView::default();
        view.set_size(80, 13);
        view.show("a.rs");
        view.scroll_down(100, 25);
        assert_eq!(view.scroll(), 15);
        view.scroll_up(4);
        assert_eq!(view.scroll(), 11);
    }

    #[test]
    fn new_key_resets_scroll() {
        let mut view = DiffView::default();
        view.set_size(80, 13);
        view.show("a.rs");
        view.scroll_down(3, 100);
        view.show("a.rs");
        assert_eq!(view.scroll(), 3);
        view.show("b.rs");
        assert_eq!(view.scroll(), 0);
    }
}
