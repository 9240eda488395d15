use diffnav_common::{parse_unified_diff, ChangeStatus, PatchError};

const GIT_DIFF: &str = "\
diff --git a/src/lib.rs b/src/lib.rs
index 1234567..89abcde 100644
--- a/src/lib.rs
+++ b/src/lib.rs
@@ -1,3 +1,4 @@
 fn a() {}
-fn b() {}
+fn b() -> u8 { 1 }
+fn c() {}
 fn d() {}
diff --git a/new.txt b/new.txt
new file mode 100644
index 0000000..e69de29
--- /dev/null
+++ b/new.txt
@@ -0,0 +1,2 @@
+hello
+world
diff --git a/old.txt b/old.txt
deleted file mode 100644
index e69de29..0000000
--- a/old.txt
+++ /dev/null
@@ -1 +0,0 @@
-bye
";

#[test]
fn git_diff_yields_one_change_per_file() {
    let files = parse_unified_diff(GIT_DIFF).unwrap();
    let paths: Vec<&str> = files.iter().map(|f| f.path()).collect();
    assert_eq!(paths, vec!["src/lib.rs", "new.txt", "old.txt"]);

    assert_eq!(files[0].status, ChangeStatus::Modified);
    assert_eq!(files[0].stats(), (2, 1));
    assert_eq!(files[1].status, ChangeStatus::Added);
    assert_eq!(files[1].old_path, "");
    assert_eq!(files[1].stats(), (2, 0));
    assert_eq!(files[2].status, ChangeStatus::Deleted);
    assert_eq!(files[2].new_path, "");
    assert_eq!(files[2].stats(), (0, 1));
}

#[test]
fn each_change_keeps_its_own_patch_text() {
    let files = parse_unified_diff(GIT_DIFF).unwrap();
    assert!(files[0].patch.starts_with("diff --git a/src/lib.rs b/src/lib.rs\n"));
    assert!(files[0].patch.ends_with(" fn d() {}\n"));
    assert!(!files[0].patch.contains("new.txt"));
    assert!(files[2].patch.ends_with("-bye\n"));
}

#[test]
fn rename_without_hunks_is_a_modification() {
    let diff = "\
diff --git a/a.txt b/b.txt
similarity index 100%
rename from a.txt
rename to b.txt
";
    let files = parse_unified_diff(diff).unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].old_path, "a.txt");
    assert_eq!(files[0].new_path, "b.txt");
    assert_eq!(files[0].status, ChangeStatus::Modified);
    assert!(files[0].hunks.is_empty());
}

#[test]
fn rename_with_edits_stays_one_change() {
    let diff = "\
diff --git a/old.rs b/new.rs
similarity index 90%
rename from old.rs
rename to new.rs
index 1111111..2222222 100644
--- a/old.rs
+++ b/new.rs
@@ -1 +1 @@
-a
+b
diff --git a/other.rs b/other.rs
--- a/other.rs
+++ b/other.rs
@@ -1 +1,2 @@
 x
+y
";
    let files = parse_unified_diff(diff).unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0].old_path, "old.rs");
    assert_eq!(files[0].new_path, "new.rs");
    assert_eq!(files[0].status, ChangeStatus::Modified);
    assert_eq!(files[0].stats(), (1, 1));
    assert!(files[0].patch.starts_with("diff --git a/old.rs b/new.rs\n"));
    assert!(files[0].patch.ends_with("-a\n+b\n"));
    assert_eq!(files[1].path(), "other.rs");
}

#[test]
fn plain_diff_without_git_headers_splits_on_file_headers() {
    let diff = "\
--- a/one.txt\t2024-01-01 10:00:00
+++ b/one.txt\t2024-01-02 10:00:00
@@ -1,2 +1,2 @@
-x
+y
 z
--- a/two.txt
+++ b/two.txt
@@ -1 +1 @@
-p
+q
";
    let files = parse_unified_diff(diff).unwrap();
    let paths: Vec<&str> = files.iter().map(|f| f.path()).collect();
    assert_eq!(paths, vec!["one.txt", "two.txt"]);
    assert_eq!(files[0].stats(), (1, 1));
}

#[test]
fn removed_line_that_looks_like_a_header_stays_in_the_hunk() {
    let diff = "\
--- a/notes.md
+++ b/notes.md
@@ -1,2 +1,1 @@
--- old rule
-x
+y
";
    let files = parse_unified_diff(diff).unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].stats(), (1, 2));
}

#[test]
fn commit_preamble_is_ignored() {
    let diff = format!("commit 0123456789\nAuthor: someone\n\n    message\n\n{GIT_DIFF}");
    let files = parse_unified_diff(&diff).unwrap();
    assert_eq!(files.len(), 3);
}

#[test]
fn empty_input_has_no_files() {
    assert!(parse_unified_diff("").unwrap().is_empty());
}

#[test]
fn hunk_before_any_file_is_an_error() {
    let err = parse_unified_diff("@@ -1 +1 @@\n-a\n+b\n").unwrap_err();
    assert_eq!(err, PatchError::OrphanHunk { line: 1 });
}

#[test]
fn malformed_hunk_header_reports_its_line() {
    let err = parse_unified_diff("--- a/x\n+++ b/x\n@@ -x +1 @@\n").unwrap_err();
    assert!(matches!(err, PatchError::MalformedHunkHeader { line: 3, .. }));
}
