use diffnav_common::{ChangeStatus, FileChange, IconStyle};
use unicode_width::UnicodeWidthStr;

const NERD_ADDED: &str = "\u{f457}";
const NERD_DELETED: &str = "\u{eadf}";
const NERD_MODIFIED: &str = "\u{f459}";
const NERD_FILE: &str = "\u{f15b}";
const NERD_DIR: &str = "\u{f07b}";

/// Icons drawn before a file name, left to right.
pub fn file_icons(style: IconStyle, change: &FileChange) -> Vec<&'static str> {
    match style {
        IconStyle::Ascii => vec![status_glyph(change.status, "+", "x", "*")],
        IconStyle::Unicode => vec![status_glyph(change.status, "+", "\u{26cc}", "\u{25cf}")],
        IconStyle::NerdFontsStatus => vec![nerd_status(change.status)],
        IconStyle::NerdFontsSimple => vec![NERD_FILE],
        IconStyle::NerdFontsFiletype => vec![filetype_icon(change.file_name())],
        IconStyle::NerdFontsFull => vec![nerd_status(change.status), filetype_icon(change.file_name())],
    }
}

pub fn dir_icon(style: IconStyle) -> &'static str {
    match style {
        IconStyle::Ascii => ">",
        IconStyle::Unicode => "\u{25b6}",
        _ => NERD_DIR,
    }
}

/// Icons joined and followed by a space each.
pub fn file_prefix(style: IconStyle, change: &FileChange) -> String {
    file_icons(style, change)
        .into_iter()
        .fold(String::new(), |mut acc, icon| {
            acc.push_str(icon);
            acc.push(' ');
            acc
        })
}

pub fn dir_prefix(style: IconStyle) -> String {
    format!("{} ", dir_icon(style))
}

pub fn prefix_width(prefix: &str) -> usize {
    prefix.width()
}

/// `+N -M`, leaving out zero counts.
pub fn stats_text(added: u64, deleted: u64) -> String {
    match (added, deleted) {
        (0, 0) => String::new(),
        (a, 0) => format!("+{a}"),
        (0, d) => format!("-{d}"),
        (a, d) => format!("+{a} -{d}"),
    }
}

fn status_glyph(
    status: ChangeStatus,
    added: &'static str,
    deleted: &'static str,
    modified: &'static str,
) -> &'static str {
    match status {
        ChangeStatus::Added => added,
        ChangeStatus::Deleted => deleted,
        ChangeStatus::Modified => modified,
    }
}

fn nerd_status(status: ChangeStatus) -> &'static str {
    status_glyph(status, NERD_ADDED, NERD_DELETED, NERD_MODIFIED)
}

fn filetype_icon(name: &str) -> &'static str {
    let ext = name.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
    match ext.to_ascii_lowercase().as_str() {
        "rs" => "\u{e7a8}",
        "go" => "\u{e627}",
        "md" => "\u{e73e}",
        "json" => "\u{e60b}",
        "toml" => "\u{e6b2}",
        "yml" | "yaml" => "\u{e6a8}",
        "js" | "mjs" => "\u{e74e}",
        "ts" | "tsx" => "\u{e628}",
        "py" => "\u{e73c}",
        "sh" | "bash" | "zsh" => "\u{f489}",
        "lock" => "\u{f023}",
        _ => NERD_FILE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_skip_zero_sides() {
        assert_eq!(stats_text(0, 0), "");
        assert_eq!(stats_text(3, 0), "+3");
        assert_eq!(stats_text(0, 2), "-2");
        assert_eq!(stats_text(3, 2), "+3 -2");
    }

    #[test]
    fn full_style_has_status_and_filetype_icons() {
        let change = FileChange {
            old_path: String::new(),
            new_path: "src/main.rs".into(),
            status: ChangeStatus::Added,
            hunks: Vec::new(),
            patch: String::new(),
        };
        assert_eq!(
            file_icons(IconStyle::NerdFontsFull, &change),
            vec![NERD_ADDED, "\u{e7a8}"]
        );
        assert_eq!(file_prefix(IconStyle::Ascii, &change), "+ ");
    }
}
