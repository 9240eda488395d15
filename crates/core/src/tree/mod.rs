//! Path tree built from the flat list of changed files.
//!
//! [`build`] nests files under one directory node per path segment,
//! [`collapse`] compresses single-child chains, and [`layout::layout`]
//! assigns depths, labels and visual offsets for drawing and hit-testing.

use std::sync::Arc;

use diffnav_common::{FileChange, SEPARATOR};

pub mod layout;

pub use layout::{layout, truncate, LayoutOptions};

/// Name shown for the session root.
pub const ROOT_NAME: &str = ".";

#[derive(Debug, Clone, PartialEq)]
pub enum TreeNode {
    Directory(DirNode),
    Leaf(LeafNode),
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirNode {
    pub name: String,
    /// Path from the root; empty for the root itself.
    pub full_path: String,
    pub children: Vec<TreeNode>,
    pub depth: usize,
    pub visual_offset: usize,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeafNode {
    pub change: Arc<FileChange>,
    /// File name, or the path below the parent once collapsed into it.
    pub name: String,
    pub depth: usize,
    pub visual_offset: usize,
    pub label: String,
    pub selected: bool,
}

impl DirNode {
    fn new(name: &str, full_path: String) -> Self {
        DirNode {
            name: name.to_string(),
            full_path,
            children: Vec::new(),
            depth: 0,
            visual_offset: 0,
            label: String::new(),
            selected: false,
        }
    }

    pub fn is_root(&self) -> bool {
        self.full_path.is_empty() && self.name == ROOT_NAME
    }
}

impl LeafNode {
    fn new(change: Arc<FileChange>) -> Self {
        let name = change.file_name().to_string();
        LeafNode {
            change,
            name,
            depth: 0,
            visual_offset: 0,
            label: String::new(),
            selected: false,
        }
    }

    pub fn path(&self) -> &str {
        self.change.path()
    }
}

/// What the tree highlights: one file, or a directory in directory view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    File(String),
    Directory(String),
}

/// Cache key of a directory view. Trailing separator keeps it apart from
/// file keys.
pub fn dir_key(full_path: &str) -> String {
    if full_path.is_empty() {
        format!("{ROOT_NAME}{SEPARATOR}")
    } else {
        format!("{full_path}{SEPARATOR}")
    }
}

/// One drawable row of a laid-out tree. Its index in the row list equals
/// its visual offset.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub depth: usize,
    pub offset: usize,
    pub label: String,
    pub selected: bool,
    pub kind: RowKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RowKind {
    Directory { full_path: String },
    Leaf { change: Arc<FileChange> },
}

impl Row {
    pub fn file_path(&self) -> Option<&str> {
        match &self.kind {
            RowKind::Leaf { change } => Some(change.path()),
            RowKind::Directory { .. } => None,
        }
    }
}

/// Builds the uncollapsed tree. Directory nodes appear in first-seen order.
pub fn build(files: &[Arc<FileChange>]) -> TreeNode {
    let mut root = DirNode::new(ROOT_NAME, String::new());
    for change in files {
        let path = change.path().to_string();
        let mut segments: Vec<&str> = path.split(SEPARATOR).collect();
        segments.pop();
        insert(&mut root, &segments, Arc::clone(change));
    }
    TreeNode::Directory(root)
}

fn insert(dir: &mut DirNode, segments: &[&str], change: Arc<FileChange>) {
    let Some((segment, rest)) = segments.split_first() else {
        dir.children.push(TreeNode::Leaf(LeafNode::new(change)));
        return;
    };
    let existing = dir
        .children
        .iter()
        .position(|child| matches!(child, TreeNode::Directory(d) if d.name == *segment));
    let idx = match existing {
        Some(idx) => idx,
        None => {
            let full_path = if dir.is_root() {
                segment.to_string()
            } else {
                format!("{}{SEPARATOR}{segment}", dir.full_path)
            };
            dir.children
                .push(TreeNode::Directory(DirNode::new(segment, full_path)));
            dir.children.len() - 1
        }
    };
    match &mut dir.children[idx] {
        TreeNode::Directory(child) => insert(child, rest, change),
        TreeNode::Leaf(_) => unreachable!("index was matched against a directory"),
    }
}

/// Path-compresses the tree.
///
/// A directory holding a single file is replaced by that file, renamed to
/// its path below the parent. A non-root directory whose only child is a
/// directory absorbs it as `parent/child`. The root always stays.
pub fn collapse(node: TreeNode) -> TreeNode {
    match node {
        TreeNode::Directory(mut dir) => {
            let is_root = dir.is_root();
            collapse_dir(&mut dir, is_root);
            TreeNode::Directory(dir)
        }
        leaf => leaf,
    }
}

fn collapse_dir(dir: &mut DirNode, is_root: bool) {
    for child in dir.children.iter_mut() {
        if let TreeNode::Directory(sub) = child {
            collapse_dir(sub, false);
        }
    }

    for child in dir.children.iter_mut() {
        let TreeNode::Directory(sub) = child else {
            continue;
        };
        if sub.children.len() != 1 || !matches!(sub.children[0], TreeNode::Leaf(_)) {
            continue;
        }
        if let Some(TreeNode::Leaf(mut leaf)) = sub.children.pop() {
            leaf.name = format!("{}{SEPARATOR}{}", sub.name, leaf.name);
            *child = TreeNode::Leaf(leaf);
        }
    }

    if !is_root && dir.children.len() == 1 && matches!(dir.children[0], TreeNode::Directory(_)) {
        if let Some(TreeNode::Directory(only)) = dir.children.pop() {
            dir.name = format!("{}{SEPARATOR}{}", dir.name, only.name);
            dir.full_path = only.full_path;
            dir.children = only.children;
        }
    }
}

pub fn leaf_count(node: &TreeNode) -> usize {
    match node {
        TreeNode::Leaf(_) => 1,
        TreeNode::Directory(dir) => dir.children.iter().map(leaf_count).sum(),
    }
}

/// Effective paths of all leaves, in pre-order.
pub fn leaf_paths(node: &TreeNode) -> Vec<String> {
    let mut out = Vec::new();
    collect_leaves(node, &mut |leaf| out.push(leaf.path().to_string()));
    out
}

/// Changes below the directory at `full_path`, in tree order.
pub fn changes_under(node: &TreeNode, full_path: &str) -> Vec<Arc<FileChange>> {
    let mut out = Vec::new();
    if let Some(dir) = find_dir(node, full_path) {
        for child in &dir.children {
            collect_leaves(child, &mut |leaf| out.push(Arc::clone(&leaf.change)));
        }
    }
    out
}

/// Full path of the directory that directly holds the leaf for `path`.
pub fn parent_dir_of(node: &TreeNode, path: &str) -> Option<String> {
    let TreeNode::Directory(dir) = node else {
        return None;
    };
    for child in &dir.children {
        match child {
            TreeNode::Leaf(leaf) if leaf.path() == path => return Some(dir.full_path.clone()),
            TreeNode::Leaf(_) => {}
            TreeNode::Directory(_) => {
                if let Some(found) = parent_dir_of(child, path) {
                    return Some(found);
                }
            }
        }
    }
    None
}

fn find_dir<'a>(node: &'a TreeNode, full_path: &str) -> Option<&'a DirNode> {
    let TreeNode::Directory(dir) = node else {
        return None;
    };
    if dir.full_path == full_path {
        return Some(dir);
    }
    dir.children.iter().find_map(|child| find_dir(child, full_path))
}

fn collect_leaves<'a>(node: &'a TreeNode, f: &mut impl FnMut(&'a LeafNode)) {
    match node {
        TreeNode::Leaf(leaf) => f(leaf),
        TreeNode::Directory(dir) => {
            for child in &dir.children {
                collect_leaves(child, f);
            }
        }
    }
}
