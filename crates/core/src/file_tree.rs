//! Sidebar view model: the laid-out tree plus selection and scroll.

use std::sync::Arc;

use diffnav_common::{FileChange, IconStyle};
use tracing::debug;

use crate::tree::{self, LayoutOptions, Row, Selection, TreeNode};

/// Rows kept visible above a newly selected entry.
pub const CONTEXT_MARGIN: usize = 15;

#[derive(Debug, Clone)]
pub struct FileTree {
    files: Vec<Arc<FileChange>>,
    options: LayoutOptions,
    selection: Option<Selection>,
    root: TreeNode,
    rows: Vec<Row>,
    scroll: usize,
    height: usize,
}

impl FileTree {
    pub fn new(options: LayoutOptions) -> Self {
        FileTree {
            files: Vec::new(),
            options,
            selection: None,
            root: tree::build(&[]),
            rows: Vec::new(),
            scroll: 0,
            height: 0,
        }
    }

    pub fn set_files(&mut self, files: Vec<Arc<FileChange>>) {
        self.files = files;
        self.selection = None;
        self.scroll = 0;
        self.rebuild();
    }

    pub fn set_size(&mut self, width: usize, height: usize) {
        self.height = height;
        if self.options.width != width {
            self.options.width = width;
            self.rebuild();
        }
        self.scroll = self.scroll.min(self.max_scroll());
    }

    pub fn set_icons(&mut self, icons: IconStyle) {
        self.options.icons = icons;
        self.rebuild();
    }

    pub fn icons(&self) -> IconStyle {
        self.options.icons
    }

    pub fn show_stats(&self) -> bool {
        self.options.show_stats
    }

    /// Marks `selection` and scrolls it into view with [`CONTEXT_MARGIN`]
    /// rows of context above.
    pub fn select(&mut self, selection: Selection) {
        self.selection = Some(selection);
        self.rebuild();
        if let Some(offset) = self.selected_offset() {
            self.scroll = offset.saturating_sub(CONTEXT_MARGIN);
        }
    }

    /// Marks `selection` leaving the viewport where it is.
    pub fn select_no_scroll(&mut self, selection: Selection) {
        self.selection = Some(selection);
        self.rebuild();
    }

    fn selected_offset(&self) -> Option<usize> {
        self.rows.iter().find(|row| row.selected).map(|row| row.offset)
    }

    fn rebuild(&mut self) {
        let collapsed = tree::collapse(tree::build(&self.files));
        self.root = collapsed;
        self.rows = tree::layout(&mut self.root, &self.options, self.selection.as_ref());
        debug!(
            files = self.files.len(),
            rows = self.rows.len(),
            width = self.options.width,
            "file tree rebuilt"
        );
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Rows inside the viewport.
    pub fn visible_rows(&self) -> &[Row] {
        let start = self.scroll.min(self.rows.len());
        let end = (start + self.height).min(self.rows.len());
        &self.rows[start..end]
    }

    pub fn scroll(&self) -> usize {
        self.scroll
    }

    fn max_scroll(&self) -> usize {
        self.rows.len().saturating_sub(self.height)
    }

    pub fn scroll_up(&mut self, lines: usize) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.scroll = (self.scroll + lines).min(self.max_scroll()).max(self.scroll);
    }

    /// Row under viewport line `line`.
    pub fn row_at_line(&self, line: usize) -> Option<&Row> {
        self.rows.get(line + self.scroll)
    }

    /// File under viewport line `line`; `None` on directory rows and past the end.
    pub fn file_at_line(&self, line: usize) -> Option<&str> {
        self.row_at_line(line).and_then(Row::file_path)
    }

    /// Directory that holds `path` in the collapsed tree.
    pub fn parent_dir_of(&self, path: &str) -> Option<String> {
        tree::parent_dir_of(&self.root, path)
    }

    pub fn changes_under(&self, full_path: &str) -> Vec<Arc<FileChange>> {
        tree::changes_under(&self.root, full_path)
    }
}
