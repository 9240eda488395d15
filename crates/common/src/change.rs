use std::cmp::Ordering;

use crate::SEPARATOR;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeStatus {
    Added,
    Deleted,
    Modified,
}

/// Line counts of one `@@` hunk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HunkStat {
    pub lines_added: u64,
    pub lines_deleted: u64,
}

/// One file section of a unified diff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileChange {
    pub old_path: String,
    pub new_path: String,
    pub status: ChangeStatus,
    pub hunks: Vec<HunkStat>,
    /// The file's section of the diff, verbatim, as handed to the formatter.
    pub patch: String,
}

impl FileChange {
    /// The new path, or the old one for deletions.
    pub fn path(&self) -> &str {
        if self.new_path.is_empty() {
            &self.old_path
        } else {
            &self.new_path
        }
    }

    pub fn file_name(&self) -> &str {
        let path = self.path();
        path.rsplit(SEPARATOR).next().unwrap_or(path)
    }

    /// Total (added, deleted) lines over all hunks.
    pub fn stats(&self) -> (u64, u64) {
        self.hunks.iter().fold((0, 0), |(added, deleted), hunk| {
            (added + hunk.lines_added, deleted + hunk.lines_deleted)
        })
    }

    /// Added or deleted files are shown whole, never side by side.
    pub fn is_whole_file(&self) -> bool {
        matches!(self.status, ChangeStatus::Added | ChangeStatus::Deleted)
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum SortToken {
    Dir(String, String),
    File(String, String),
}

fn sort_key(path: &str) -> Vec<SortToken> {
    let mut segments: Vec<&str> = path.split(SEPARATOR).collect();
    let name = segments.pop().unwrap_or_default();
    let mut key: Vec<SortToken> = segments
        .into_iter()
        .map(|seg| SortToken::Dir(seg.to_lowercase(), seg.to_string()))
        .collect();
    key.push(SortToken::File(name.to_lowercase(), name.to_string()));
    key
}

fn compare_paths(a: &str, b: &str) -> Ordering {
    sort_key(a).cmp(&sort_key(b))
}

/// Sorts files into tree display order.
///
/// Files sharing a directory are ordered case-insensitively by name. At every
/// level the subdirectory groups come before the files that sit directly in
/// that directory, so files at the root of the diff come last.
pub fn sort_files<F: AsRef<FileChange>>(files: &mut [F]) {
    files.sort_by(|a, b| compare_paths(a.as_ref().path(), b.as_ref().path()));
}

impl AsRef<FileChange> for FileChange {
    fn as_ref(&self) -> &FileChange {
        self
    }
}
