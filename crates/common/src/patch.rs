//! Unified diff parsing into [`FileChange`] records.

use thiserror::Error;

use crate::change::{ChangeStatus, FileChange, HunkStat};

const DEV_NULL: &str = "/dev/null";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PatchError {
    #[error("line {line}: hunk header outside of a file section")]
    OrphanHunk { line: usize },
    #[error("line {line}: malformed hunk header {header:?}")]
    MalformedHunkHeader { line: usize, header: String },
    #[error("line {line}: file section has no path")]
    MissingPath { line: usize },
}

#[derive(Default)]
struct PartialFile {
    start_line: usize,
    old_path: Option<String>,
    new_path: Option<String>,
    header_path: Option<String>,
    saw_old_header: bool,
    is_new: bool,
    is_delete: bool,
    hunks: Vec<HunkStat>,
    lines: Vec<String>,
}

impl PartialFile {
    fn starting_at(line_no: usize) -> Self {
        PartialFile {
            start_line: line_no,
            ..Default::default()
        }
    }

    fn finalize(self) -> Result<FileChange, PatchError> {
        let old = self.old_path.filter(|p| p != DEV_NULL);
        let new = self.new_path.filter(|p| p != DEV_NULL);
        let is_new = self.is_new || (old.is_none() && new.is_some());
        let is_delete = self.is_delete || (new.is_none() && old.is_some());

        let fallback = self.header_path;
        let (old_path, new_path, status) = if is_new {
            let path = new.or(fallback).unwrap_or_default();
            (String::new(), path, ChangeStatus::Added)
        } else if is_delete {
            let path = old.or(fallback).unwrap_or_default();
            (path, String::new(), ChangeStatus::Deleted)
        } else {
            let new = new.or_else(|| fallback.clone()).unwrap_or_default();
            let old = old.or(fallback).unwrap_or_else(|| new.clone());
            (old, new, ChangeStatus::Modified)
        };

        if old_path.is_empty() && new_path.is_empty() {
            return Err(PatchError::MissingPath {
                line: self.start_line,
            });
        }

        let mut patch = self.lines.join("\n");
        patch.push('\n');
        Ok(FileChange {
            old_path,
            new_path,
            status,
            hunks: self.hunks,
            patch,
        })
    }
}

/// Remaining body lines of the hunk being read.
struct OpenHunk {
    old_remaining: u64,
    new_remaining: u64,
}

impl OpenHunk {
    fn is_done(&self) -> bool {
        self.old_remaining == 0 && self.new_remaining == 0
    }
}

/// Parses a unified diff (git or plain) into one record per file.
///
/// Text before the first file section (commit messages, mail headers) is
/// ignored. An empty input yields an empty list.
pub fn parse_unified_diff(content: &str) -> Result<Vec<FileChange>, PatchError> {
    let mut files: Vec<FileChange> = Vec::new();
    let mut current: Option<PartialFile> = None;
    let mut hunk: Option<OpenHunk> = None;

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;

        if let Some(open) = hunk.as_mut() {
            if consume_hunk_line(open, line) {
                if let Some(file) = current.as_mut() {
                    if let Some(stat) = file.hunks.last_mut() {
                        count_line(stat, line);
                    }
                    file.lines.push(line.to_string());
                }
                if open.is_done() {
                    hunk = None;
                }
                continue;
            }
            hunk = None;
        }

        if line.starts_with("diff --git ") {
            flush(&mut files, current.take())?;
            let mut file = PartialFile::starting_at(line_no);
            file.header_path = path_from_git_header(line);
            file.lines.push(line.to_string());
            current = Some(file);
            continue;
        }

        if let Some(rest) = line.strip_prefix("--- ") {
            let starts_new = current
                .as_ref()
                .map_or(true, |file| !file.hunks.is_empty() || file.saw_old_header);
            if starts_new {
                flush(&mut files, current.take())?;
                current = Some(PartialFile::starting_at(line_no));
            }
            if let Some(file) = current.as_mut() {
                file.old_path = Some(clean_diff_path(rest));
                file.saw_old_header = true;
                file.lines.push(line.to_string());
            }
            continue;
        }

        if line.starts_with("@@") {
            let Some(file) = current.as_mut() else {
                return Err(PatchError::OrphanHunk { line: line_no });
            };
            let (old_len, new_len) =
                parse_hunk_ranges(line).ok_or_else(|| PatchError::MalformedHunkHeader {
                    line: line_no,
                    header: line.to_string(),
                })?;
            file.hunks.push(HunkStat::default());
            file.lines.push(line.to_string());
            let open = OpenHunk {
                old_remaining: old_len,
                new_remaining: new_len,
            };
            if !open.is_done() {
                hunk = Some(open);
            }
            continue;
        }

        let Some(file) = current.as_mut() else {
            continue;
        };

        if let Some(rest) = line.strip_prefix("+++ ") {
            file.new_path = Some(clean_diff_path(rest));
        } else if line.starts_with("new file mode") {
            file.is_new = true;
        } else if line.starts_with("deleted file mode") {
            file.is_delete = true;
        } else if let Some(rest) = line.strip_prefix("rename from ") {
            file.old_path = Some(rest.to_string());
        } else if let Some(rest) = line.strip_prefix("rename to ") {
            file.new_path = Some(rest.to_string());
        }
        file.lines.push(line.to_string());
    }

    flush(&mut files, current.take())?;
    Ok(files)
}

fn flush(files: &mut Vec<FileChange>, file: Option<PartialFile>) -> Result<(), PatchError> {
    if let Some(file) = file {
        files.push(file.finalize()?);
    }
    Ok(())
}

/// Returns whether `line` belongs to the open hunk, updating its counters.
fn consume_hunk_line(open: &mut OpenHunk, line: &str) -> bool {
    match line.as_bytes().first() {
        Some(b'+') if open.new_remaining > 0 => {
            open.new_remaining -= 1;
            true
        }
        Some(b'-') if open.old_remaining > 0 => {
            open.old_remaining -= 1;
            true
        }
        Some(b' ') | None => {
            open.old_remaining = open.old_remaining.saturating_sub(1);
            open.new_remaining = open.new_remaining.saturating_sub(1);
            true
        }
        Some(b'\\') => true,
        _ => false,
    }
}

fn count_line(stat: &mut HunkStat, line: &str) {
    match line.as_bytes().first() {
        Some(b'+') => stat.lines_added += 1,
        Some(b'-') => stat.lines_deleted += 1,
        _ => {}
    }
}

/// Parses `@@ -a[,b] +c[,d] @@` into the old and new line counts.
fn parse_hunk_ranges(line: &str) -> Option<(u64, u64)> {
    let inner = line.strip_prefix("@@ ")?;
    let end = inner.find(" @@")?;
    let mut parts = inner[..end].split_whitespace();
    let old = parse_range(parts.next()?.strip_prefix('-')?)?;
    let new = parse_range(parts.next()?.strip_prefix('+')?)?;
    Some((old, new))
}

fn parse_range(range: &str) -> Option<u64> {
    match range.split_once(',') {
        Some((start, len)) => {
            start.parse::<u64>().ok()?;
            len.parse().ok()
        }
        None => range.parse::<u64>().ok().map(|_| 1),
    }
}

fn clean_diff_path(raw: &str) -> String {
    let raw = raw.split('\t').next().unwrap_or(raw).trim_end();
    let trimmed = raw.trim_matches('"');
    if trimmed == DEV_NULL {
        return trimmed.to_string();
    }
    trimmed
        .strip_prefix("a/")
        .or_else(|| trimmed.strip_prefix("b/"))
        .unwrap_or(trimmed)
        .to_string()
}

fn path_from_git_header(line: &str) -> Option<String> {
    // diff --git a/path b/path
    let rest = line.strip_prefix("diff --git ")?;
    let new = rest.rsplit_once(" b/").map(|(_, new)| new).unwrap_or(rest);
    let new = new.trim();
    if new.is_empty() {
        None
    } else {
        Some(clean_diff_path(new))
    }
}
