//! Panel state machine.
//!
//! Every event goes through [`App::update`], which mutates the state and
//! returns the side effects to perform. Formatter output comes back later
//! as [`Input::Rendered`] and is accepted only if it matches the latest
//! request for its key.

use std::sync::Arc;

use diffnav_common::{FileChange, RenderRequest, RenderResult, UiConfig};
use tracing::{debug, info};

use crate::cache::{Lookup, RenderCache, RenderParams, StoreOutcome};
use crate::diff_view::DiffView;
use crate::file_tree::FileTree;
use crate::keys::{self, Action, Key};
use crate::panes::Panes;
use crate::search::Search;
use crate::tree::{dir_key, LayoutOptions, Selection};

/// Lines moved per mouse wheel tick.
pub const SCROLL_LINES: usize = 3;
/// Columns either side of the sidebar border that start a drag.
pub const GRAB_THRESHOLD: u16 = 2;
pub const SIDEBAR_MIN_WIDTH: u16 = 20;
/// Dragging the border left of this column hides the sidebar.
pub const SIDEBAR_HIDE_WIDTH: u16 = 10;
/// Smallest width change applied while dragging.
pub const MIN_RESIZE_STEP: u16 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Tree,
    Diff,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseKind {
    Down,
    Up,
    Drag,
    Moved,
    ScrollUp,
    ScrollDown,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Key(Key),
    Mouse { kind: MouseKind, x: u16, y: u16 },
    Resize { width: u16, height: u16 },
    Rendered(RenderResult),
    /// A clipboard or editor side effect failed.
    ToolFailed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Render(RenderRequest),
    CopyToClipboard(String),
    OpenEditor(String),
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum View {
    File,
    Directory(String),
}

pub struct App {
    config: UiConfig,
    files: Vec<Arc<FileChange>>,
    cursor: usize,
    view: View,
    tree: FileTree,
    search: Search,
    cache: RenderCache,
    diff: DiffView,
    width: u16,
    height: u16,
    showing_tree: bool,
    active: Panel,
    dragging: bool,
    custom_width: Option<u16>,
    side_by_side: bool,
    notice: Option<String>,
}

impl App {
    /// `files` must already be in display order.
    pub fn new(config: UiConfig, files: Vec<Arc<FileChange>>) -> App {
        let mut tree = FileTree::new(LayoutOptions {
            width: usize::from(config.file_tree_width),
            icons: config.icon_style(),
            show_stats: config.show_diff_stats,
            hide_root: config.hide_root,
        });
        tree.set_files(files.clone());
        let showing_tree = config.show_file_tree;
        let side_by_side = config.side_by_side;
        let mut app = App {
            config,
            files,
            cursor: 0,
            view: View::File,
            tree,
            search: Search::default(),
            cache: RenderCache::new(),
            diff: DiffView::default(),
            width: 0,
            height: 0,
            showing_tree,
            active: if showing_tree { Panel::Tree } else { Panel::Diff },
            dragging: false,
            custom_width: None,
            side_by_side,
            notice: None,
        };
        if !app.files.is_empty() {
            app.select_file(0, true);
        }
        info!(files = app.files.len(), "session started");
        app
    }

    pub fn update(&mut self, input: Input) -> Vec<Command> {
        match input {
            Input::Key(key) => {
                self.notice = None;
                if self.search.is_active() {
                    self.search_key(key)
                } else {
                    self.normal_key(key)
                }
            }
            Input::Mouse { kind, x, y } => self.mouse(kind, x, y),
            Input::Resize { width, height } => {
                debug!(width, height, "resize");
                self.width = width;
                self.height = height;
                self.sync()
            }
            Input::Rendered(result) => {
                let displayed = self.diff.key() == Some(result.key.as_str());
                if let StoreOutcome::Fallback(message) = self.cache.store(result) {
                    if displayed {
                        self.notice = Some(format!("diff formatter failed: {message}"));
                    }
                }
                Vec::new()
            }
            Input::ToolFailed(message) => {
                self.notice = Some(message);
                Vec::new()
            }
        }
    }

    fn normal_key(&mut self, key: Key) -> Vec<Command> {
        let Some(action) = keys::action_for(key) else {
            return Vec::new();
        };
        match action {
            Action::Quit => vec![Command::Quit],
            Action::Search => self.begin_search(),
            Action::ToggleFileTree => {
                self.showing_tree = !self.showing_tree;
                if self.showing_tree {
                    self.custom_width = None;
                    self.active = Panel::Tree;
                } else {
                    self.active = Panel::Diff;
                }
                self.sync()
            }
            Action::SwitchPanel => {
                if self.showing_tree {
                    self.active = match self.active {
                        Panel::Tree => Panel::Diff,
                        Panel::Diff => Panel::Tree,
                    };
                }
                Vec::new()
            }
            Action::CycleIcons => {
                let next = self.tree.icons().next();
                debug!(icons = next.name(), "icon style");
                self.tree.set_icons(next);
                Vec::new()
            }
            Action::ToggleSideBySide => {
                self.side_by_side = !self.side_by_side;
                self.rerender_active()
            }
            Action::Up => match self.active {
                Panel::Tree => self.step_cursor(-1),
                Panel::Diff => {
                    self.diff.scroll_up(1);
                    Vec::new()
                }
            },
            Action::Down => match self.active {
                Panel::Tree => self.step_cursor(1),
                Panel::Diff => {
                    let total = self.diff_line_count();
                    self.diff.scroll_down(1, total);
                    Vec::new()
                }
            },
            Action::HalfPageDown | Action::PageDown => {
                let lines = if action == Action::PageDown {
                    self.diff.content_height()
                } else {
                    self.diff.half_page()
                };
                let total = self.diff_line_count();
                self.diff.scroll_down(lines, total);
                Vec::new()
            }
            Action::HalfPageUp | Action::PageUp => {
                let lines = if action == Action::PageUp {
                    self.diff.content_height()
                } else {
                    self.diff.half_page()
                };
                self.diff.scroll_up(lines);
                Vec::new()
            }
            Action::CopyPath => match self.selected_path() {
                Some(path) => vec![Command::CopyToClipboard(path)],
                None => Vec::new(),
            },
            Action::OpenInEditor => match self.files.get(self.cursor) {
                Some(file) => vec![Command::OpenEditor(file.path().to_string())],
                None => Vec::new(),
            },
            Action::DirectoryView => self.directory_view(),
        }
    }

    fn search_key(&mut self, key: Key) -> Vec<Command> {
        match key {
            Key::Ctrl('c') => vec![Command::Quit],
            Key::Esc => {
                self.search.end();
                self.sync()
            }
            Key::Enter => {
                let picked = self.search.selected().map(str::to_string);
                self.search.end();
                if let Some(idx) = picked.and_then(|path| self.index_of(&path)) {
                    self.select_file(idx, true);
                }
                self.sync()
            }
            Key::Up | Key::Ctrl('p') => {
                self.search.up();
                Vec::new()
            }
            Key::Down | Key::Ctrl('n') => {
                self.search.down();
                Vec::new()
            }
            Key::Backspace => {
                self.search.pop(&self.files);
                Vec::new()
            }
            Key::Char(c) => {
                self.search.push(c, &self.files);
                Vec::new()
            }
            _ => Vec::new(),
        }
    }

    fn begin_search(&mut self) -> Vec<Command> {
        self.search.begin(&self.files);
        self.sync()
    }

    fn step_cursor(&mut self, delta: isize) -> Vec<Command> {
        if self.files.is_empty() {
            return Vec::new();
        }
        let target = self
            .cursor
            .saturating_add_signed(delta)
            .min(self.files.len() - 1);
        if target == self.cursor && self.view == View::File {
            return Vec::new();
        }
        self.set_cursor(target)
    }

    /// Selects file `idx`, scrolling the tree to it, and requests its diff.
    pub fn set_cursor(&mut self, idx: usize) -> Vec<Command> {
        if idx >= self.files.len() {
            return Vec::new();
        }
        self.select_file(idx, true);
        self.sync()
    }

    fn select_file(&mut self, idx: usize, scroll: bool) {
        self.cursor = idx;
        self.view = View::File;
        let path = self.files[idx].path().to_string();
        self.diff.show(&path);
        let selection = Selection::File(path);
        if scroll {
            self.tree.select(selection);
        } else {
            self.tree.select_no_scroll(selection);
        }
    }

    fn directory_view(&mut self) -> Vec<Command> {
        let Some(file) = self.files.get(self.cursor) else {
            return Vec::new();
        };
        let Some(dir) = self.tree.parent_dir_of(file.path()) else {
            return Vec::new();
        };
        debug!(dir = %dir, "directory view");
        self.diff.show(&dir_key(&dir));
        self.tree.select(Selection::Directory(dir.clone()));
        self.view = View::Directory(dir);
        self.sync()
    }

    fn index_of(&self, path: &str) -> Option<usize> {
        self.files.iter().position(|f| f.path() == path)
    }

    fn mouse(&mut self, kind: MouseKind, x: u16, y: u16) -> Vec<Command> {
        match kind {
            MouseKind::ScrollUp => {
                self.wheel(x, y, false);
                Vec::new()
            }
            MouseKind::ScrollDown => {
                self.wheel(x, y, true);
                Vec::new()
            }
            MouseKind::Down => self.press(x, y),
            MouseKind::Up => {
                self.dragging = false;
                Vec::new()
            }
            MouseKind::Drag | MouseKind::Moved => {
                if self.dragging {
                    self.drag(x)
                } else {
                    Vec::new()
                }
            }
        }
    }

    fn press(&mut self, x: u16, y: u16) -> Vec<Command> {
        if !self.search.is_active() {
            if self.showing_tree {
                let border = self.sidebar_width().unwrap_or(0);
                if x.abs_diff(border) <= GRAB_THRESHOLD {
                    self.dragging = true;
                    return Vec::new();
                }
            } else if x <= GRAB_THRESHOLD {
                self.dragging = true;
                self.showing_tree = true;
                return self.sync();
            }
        }

        let panes = self.panes();
        if panes.search_box.is_some_and(|area| area.contains(x, y)) {
            if self.search.is_active() {
                return Vec::new();
            }
            return self.begin_search();
        }
        let Some(list) = panes.list.filter(|area| area.contains(x, y)) else {
            return Vec::new();
        };
        let line = usize::from(y - list.y);
        if self.search.is_active() {
            let Some(path) = self.search.result_at_line(line).map(str::to_string) else {
                return Vec::new();
            };
            self.search.end();
            if let Some(idx) = self.index_of(&path) {
                self.select_file(idx, true);
            }
            return self.sync();
        }
        let Some(idx) = self
            .tree
            .file_at_line(line)
            .and_then(|path| self.index_of(path))
        else {
            return Vec::new();
        };
        self.select_file(idx, false);
        self.sync()
    }

    fn drag(&mut self, x: u16) -> Vec<Command> {
        if x < SIDEBAR_HIDE_WIDTH {
            self.showing_tree = false;
            self.dragging = false;
            self.active = Panel::Diff;
            return self.sync();
        }
        let new_width = x.min(self.width / 2).max(SIDEBAR_MIN_WIDTH);
        let current = self.sidebar_width().unwrap_or(0);
        if new_width.abs_diff(current) < MIN_RESIZE_STEP {
            return Vec::new();
        }
        debug!(width = new_width, "sidebar resized");
        self.custom_width = Some(new_width);
        self.sync()
    }

    fn wheel(&mut self, x: u16, y: u16, down: bool) {
        let panes = self.panes();
        if panes.list.is_some_and(|area| area.contains(x, y)) {
            match (self.search.is_active(), down) {
                (true, true) => self.search.scroll_down(SCROLL_LINES),
                (true, false) => self.search.scroll_up(SCROLL_LINES),
                (false, true) => self.tree.scroll_down(SCROLL_LINES),
                (false, false) => self.tree.scroll_up(SCROLL_LINES),
            }
        } else if panes.diff.contains(x, y) {
            if down {
                let total = self.diff_line_count();
                self.diff.scroll_down(SCROLL_LINES, total);
            } else {
                self.diff.scroll_up(SCROLL_LINES);
            }
        }
    }

    /// Applies the current geometry, then makes sure the displayed key has
    /// text or a request in flight. A changed diff width re-renders it.
    fn sync(&mut self) -> Vec<Command> {
        let width_changed = self.apply_layout();
        if width_changed {
            self.rerender_active()
        } else {
            self.request_active()
        }
    }

    fn apply_layout(&mut self) -> bool {
        let panes = self.panes();
        if let Some(list) = panes.list {
            self.tree
                .set_size(usize::from(list.width), usize::from(list.height));
            self.search.set_height(usize::from(list.height));
        }
        let before = self.diff.width();
        self.diff
            .set_size(usize::from(panes.diff.width), usize::from(panes.diff.height));
        before != self.diff.width()
    }

    fn render_params(&self) -> Option<RenderParams> {
        let width = u16::try_from(self.diff.width()).ok()?;
        (width > 0).then_some(RenderParams {
            width,
            side_by_side: self.side_by_side,
        })
    }

    fn request_active(&mut self) -> Vec<Command> {
        let (Some(key), Some(params)) = (self.active_key(), self.render_params()) else {
            return Vec::new();
        };
        let files = &self.files;
        let tree = &self.tree;
        let view = &self.view;
        let cursor = self.cursor;
        let members = || -> Vec<Arc<FileChange>> {
            match view {
                View::File => files.get(cursor).cloned().into_iter().collect(),
                View::Directory(dir) => tree.changes_under(dir),
            }
        };
        match self.cache.get(&key, members, params) {
            Lookup::Requested(request) => vec![Command::Render(request)],
            Lookup::Ready(_) | Lookup::Pending => Vec::new(),
        }
    }

    /// Re-issues the displayed key's render after a mode or width change.
    fn rerender_active(&mut self) -> Vec<Command> {
        let (Some(key), Some(params)) = (self.active_key(), self.render_params()) else {
            return Vec::new();
        };
        match self.cache.refresh(&key, params) {
            Some(request) => vec![Command::Render(request)],
            None => self.request_active(),
        }
    }

    fn active_key(&self) -> Option<String> {
        match &self.view {
            View::File => self.files.get(self.cursor).map(|f| f.path().to_string()),
            View::Directory(dir) => Some(dir_key(dir)),
        }
    }

    /// Path copied by `y`: the selected file or the viewed directory.
    fn selected_path(&self) -> Option<String> {
        match &self.view {
            View::File => self.files.get(self.cursor).map(|f| f.path().to_string()),
            View::Directory(dir) => Some(dir.clone()),
        }
    }

    fn diff_line_count(&self) -> usize {
        self.diff_text().map_or(0, |text| text.lines().count())
    }

    /// Width of the sidebar content, `None` when hidden. Searching always
    /// shows it at the search width.
    pub fn sidebar_width(&self) -> Option<u16> {
        if self.search.is_active() {
            Some(self.config.search_tree_width)
        } else if self.showing_tree {
            Some(self.custom_width.unwrap_or(self.config.file_tree_width))
        } else {
            None
        }
    }

    pub fn panes(&self) -> Panes {
        Panes::compute(
            self.width,
            self.height,
            self.sidebar_width(),
            !self.config.hide_header,
            !self.config.hide_footer,
        )
    }

    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    pub fn files(&self) -> &[Arc<FileChange>] {
        &self.files
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn tree(&self) -> &FileTree {
        &self.tree
    }

    pub fn search(&self) -> &Search {
        &self.search
    }

    pub fn cache(&self) -> &RenderCache {
        &self.cache
    }

    pub fn diff_view(&self) -> &DiffView {
        &self.diff
    }

    pub fn active_panel(&self) -> Panel {
        self.active
    }

    pub fn is_searching(&self) -> bool {
        self.search.is_active()
    }

    pub fn is_showing_tree(&self) -> bool {
        self.showing_tree
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn is_directory_view(&self) -> bool {
        matches!(self.view, View::Directory(_))
    }

    /// Rendered text of the displayed key, once available.
    pub fn diff_text(&self) -> Option<&str> {
        let key = self.diff.key()?;
        self.cache.entry(key)?.text()
    }

    /// Title and (added, deleted) totals for the diff pane header.
    pub fn diff_header(&self) -> Option<(String, u64, u64)> {
        match &self.view {
            View::File => {
                let file = self.files.get(self.cursor)?;
                let (added, deleted) = file.stats();
                Some((file.path().to_string(), added, deleted))
            }
            View::Directory(dir) => {
                let (added, deleted) = self
                    .tree
                    .changes_under(dir)
                    .iter()
                    .fold((0, 0), |(a, d), f| {
                        let (fa, fd) = f.stats();
                        (a + fa, d + fd)
                    });
                Some((dir_key(dir), added, deleted))
            }
        }
    }
}
