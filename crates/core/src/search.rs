use std::sync::Arc;

use diffnav_common::FileChange;

/// Paths of `files` containing `query`, case-insensitively, in file order.
pub fn filter(files: &[Arc<FileChange>], query: &str) -> Vec<String> {
    let needle = query.to_lowercase();
    files
        .iter()
        .map(|f| f.path())
        .filter(|path| path.to_lowercase().contains(&needle))
        .map(str::to_string)
        .collect()
}

/// State of the file search overlay.
#[derive(Debug, Clone, Default)]
pub struct Search {
    active: bool,
    query: String,
    results: Vec<String>,
    cursor: usize,
    scroll: usize,
    height: usize,
}

impl Search {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn results(&self) -> &[String] {
        &self.results
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    pub fn set_height(&mut self, height: usize) {
        self.height = height;
        self.keep_cursor_visible();
    }

    /// Opens the overlay with an empty query listing every file.
    pub fn begin(&mut self, files: &[Arc<FileChange>]) {
        self.active = true;
        self.query.clear();
        self.refilter(files);
    }

    pub fn end(&mut self) {
        self.active = false;
        self.query.clear();
        self.results.clear();
        self.cursor = 0;
        self.scroll = 0;
    }

    pub fn push(&mut self, c: char, files: &[Arc<FileChange>]) {
        self.query.push(c);
        self.refilter(files);
    }

    pub fn pop(&mut self, files: &[Arc<FileChange>]) {
        self.query.pop();
        self.refilter(files);
    }

    fn refilter(&mut self, files: &[Arc<FileChange>]) {
        self.results = filter(files, &self.query);
        self.cursor = 0;
        self.scroll = 0;
    }

    pub fn up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
        self.keep_cursor_visible();
    }

    pub fn down(&mut self) {
        if self.cursor + 1 < self.results.len() {
            self.cursor += 1;
        }
        self.keep_cursor_visible();
    }

    pub fn selected(&self) -> Option<&str> {
        self.results.get(self.cursor).map(String::as_str)
    }

    /// Result under viewport line `line`.
    pub fn result_at_line(&self, line: usize) -> Option<&str> {
        self.results.get(line + self.scroll).map(String::as_str)
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        let max = self.results.len().saturating_sub(self.height);
        self.scroll = (self.scroll + lines).min(max);
    }

    pub fn visible_results(&self) -> &[String] {
        let start = self.scroll.min(self.results.len());
        let end = (start + self.height).min(self.results.len());
        &self.results[start..end]
    }

    fn keep_cursor_visible(&mut self) {
        if self.height == 0 {
            return;
        }
        if self.cursor < self.scroll {
            self.scroll = self.cursor;
        } else if self.cursor >= self.scroll + self.height {
            self.scroll = self.cursor + 1 - self.height;
        }
    }
}
