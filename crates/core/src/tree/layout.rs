use std::sync::Arc;

use diffnav_common::IconStyle;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::{Row, RowKind, Selection, TreeNode};
use crate::icons;

const ELLIPSIS: char = '\u{2026}';

/// Columns of indentation per depth level.
pub const INDENT: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutOptions {
    /// Columns available to one row.
    pub width: usize,
    pub icons: IconStyle,
    pub show_stats: bool,
    /// Leave the root out of the rows; its children start at depth 0.
    pub hide_root: bool,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        LayoutOptions {
            width: 26,
            icons: IconStyle::Ascii,
            show_stats: true,
            hide_root: false,
        }
    }
}

struct Pass<'a> {
    opts: &'a LayoutOptions,
    selection: Option<&'a Selection>,
    rows: Vec<Row>,
}

/// Pre-order pass assigning depth, label, visual offset and the selected
/// flag to every node. Returns the drawable rows in visual order.
pub fn layout(root: &mut TreeNode, opts: &LayoutOptions, selection: Option<&Selection>) -> Vec<Row> {
    let mut pass = Pass {
        opts,
        selection,
        rows: Vec::new(),
    };
    visit(root, 0, &mut pass);
    pass.rows
}

fn visit(node: &mut TreeNode, depth: usize, pass: &mut Pass<'_>) {
    match node {
        TreeNode::Directory(dir) => {
            let hidden = pass.opts.hide_root && dir.is_root();
            dir.depth = depth;
            dir.selected =
                matches!(pass.selection, Some(Selection::Directory(p)) if *p == dir.full_path);
            if hidden {
                dir.visual_offset = 0;
                dir.label.clear();
            } else {
                let prefix = icons::dir_prefix(pass.opts.icons);
                let budget = pass
                    .opts
                    .width
                    .saturating_sub(INDENT * depth + icons::prefix_width(&prefix));
                dir.visual_offset = pass.rows.len();
                dir.label = truncate(&dir.name, budget);
                pass.rows.push(Row {
                    depth,
                    offset: dir.visual_offset,
                    label: dir.label.clone(),
                    selected: dir.selected,
                    kind: RowKind::Directory {
                        full_path: dir.full_path.clone(),
                    },
                });
            }
            let child_depth = if hidden { depth } else { depth + 1 };
            for child in dir.children.iter_mut() {
                visit(child, child_depth, pass);
            }
        }
        TreeNode::Leaf(leaf) => {
            leaf.depth = depth;
            leaf.selected =
                matches!(pass.selection, Some(Selection::File(p)) if p == leaf.change.path());
            let prefix = icons::file_prefix(pass.opts.icons, &leaf.change);
            let stats_width = if pass.opts.show_stats {
                let (added, deleted) = leaf.change.stats();
                match icons::stats_text(added, deleted).width() {
                    0 => 0,
                    w => w + 1,
                }
            } else {
                0
            };
            let budget = pass
                .opts
                .width
                .saturating_sub(INDENT * depth + icons::prefix_width(&prefix) + stats_width);
            leaf.visual_offset = pass.rows.len();
            leaf.label = truncate(&leaf.name, budget);
            pass.rows.push(Row {
                depth,
                offset: leaf.visual_offset,
                label: leaf.label.clone(),
                selected: leaf.selected,
                kind: RowKind::Leaf {
                    change: Arc::clone(&leaf.change),
                },
            });
        }
    }
}

/// Cuts `s` to at most `max` columns, ending in an ellipsis when shortened.
pub fn truncate(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > max - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push(ELLIPSIS);
    out
}
