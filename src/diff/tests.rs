//! Tests for diff parsing and the changed-line index.

use std::collections::BTreeSet;

use super::*;
use crate::error::LintError;
use crate::test_support::{commit_all, create_test_repo, git, write_file};

fn lines(values: &[u32]) -> BTreeSet<u32> {
    values.iter().copied().collect()
}

// =========================================================================
// Parser
// =========================================================================

/// Lines 10-12 inserted into a 20-line file.
#[test]
fn test_parse_inserted_block() {
    let diff = r#"diff --git a/x.py b/x.py
index abc1234..def5678 100644
--- a/x.py
+++ b/x.py
@@ -9,0 +10,3 @@ def f():
+    a = 1
+    b = 2
+    c = 3
"#;

    let files = parse_unified_diff(diff).unwrap();

    assert_eq!(files.len(), 1);
    assert_eq!(files[0].path, "x.py");
    assert_eq!(files[0].status, FileStatus::Modified);
    assert_eq!(files[0].added_lines, lines(&[10, 11, 12]));
}

#[test]
fn test_parse_multiple_hunks_and_files() {
    let diff = r#"diff --git a/src/main.rs b/src/main.rs
index abc1234..def5678 100644
--- a/src/main.rs
+++ b/src/main.rs
@@ -5,0 +6,1 @@ fn main() {
+    // first
@@ -20,0 +22,1 @@ fn helper() {
+    // second
diff --git a/lib.py b/lib.py
index 1111111..2222222 100644
--- a/lib.py
+++ b/lib.py
@@ -1 +1 @@
-import os
+import sys
"#;

    let files = parse_unified_diff(diff).unwrap();

    assert_eq!(files.len(), 2);
    assert_eq!(files[0].added_lines, lines(&[6, 22]));
    assert_eq!(files[1].path, "lib.py");
    assert_eq!(files[1].added_lines, lines(&[1]));
}

#[test]
fn test_context_lines_are_never_marked() {
    let diff = r#"diff --git a/a.c b/a.c
--- a/a.c
+++ b/a.c
@@ -3,4 +3,5 @@
 int a;
 int b;
-int c;
+int c2;
+int c3;
 int d;
"#;

    let files = parse_unified_diff(diff).unwrap();
    assert_eq!(files[0].added_lines, lines(&[5, 6]));
}

#[test]
fn test_pure_deletion_touches_file_without_lines() {
    let diff = r#"diff --git a/y.py b/y.py
--- a/y.py
+++ b/y.py
@@ -5,2 +4,0 @@
-old = 1
-older = 2
"#;

    let files = parse_unified_diff(diff).unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].status, FileStatus::Modified);
    assert!(files[0].added_lines.is_empty());
}

#[test]
fn test_deleted_line_starting_with_dashes_stays_in_hunk() {
    let diff = r#"diff --git a/notes.sql b/notes.sql
--- a/notes.sql
+++ b/notes.sql
@@ -1,2 +1,1 @@
--- a sql comment
+-- another sql comment
-select 1;
"#;

    let files = parse_unified_diff(diff).unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].path, "notes.sql");
    assert_eq!(files[0].added_lines, lines(&[1]));
}

#[test]
fn test_parse_new_file() {
    let diff = r#"diff --git a/src/new_file.rs b/src/new_file.rs
new file mode 100644
index 0000000..abc1234
--- /dev/null
+++ b/src/new_file.rs
@@ -0,0 +1,3 @@
+//! New module
+
+pub fn hello() {}
"#;

    let files = parse_unified_diff(diff).unwrap();
    assert_eq!(files[0].path, "src/new_file.rs");
    assert_eq!(files[0].status, FileStatus::Added);
}

#[test]
fn test_parse_deleted_file() {
    let diff = r#"diff --git a/y.py b/y.py
deleted file mode 100644
index abc1234..0000000
--- a/y.py
+++ /dev/null
@@ -1,2 +0,0 @@
-a = 1
-b = 2
"#;

    let files = parse_unified_diff(diff).unwrap();
    assert_eq!(files[0].path, "y.py");
    assert_eq!(files[0].status, FileStatus::Deleted);
    assert!(files[0].added_lines.is_empty());
}

#[test]
fn test_parse_pure_rename() {
    let diff = r#"diff --git a/old/name.py b/new/name.py
similarity index 100%
rename from old/name.py
rename to new/name.py
"#;

    let files = parse_unified_diff(diff).unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].path, "new/name.py");
    assert_eq!(
        files[0].status,
        FileStatus::Renamed {
            from: "old/name.py".to_string()
        }
    );
    assert!(files[0].added_lines.is_empty());
}

#[test]
fn test_parse_binary_and_mode_changes() {
    let diff = r#"diff --git a/logo.png b/logo.png
index 1111111..2222222 100644
Binary files a/logo.png and b/logo.png differ
diff --git a/run.sh b/run.sh
old mode 100644
new mode 100755
"#;

    let files = parse_unified_diff(diff).unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0].path, "logo.png");
    assert_eq!(files[1].path, "run.sh");
    assert!(files.iter().all(|f| f.status == FileStatus::Modified));
    assert!(files.iter().all(|f| f.added_lines.is_empty()));
}

#[test]
fn test_parse_mode_change_on_path_with_b_slash() {
    let diff = r#"diff --git a/x b/y.py b/x b/y.py
old mode 100644
new mode 100755
"#;

    let files = parse_unified_diff(diff).unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].path, "x b/y.py");
    assert_eq!(files[0].status, FileStatus::Modified);
}

#[test]
fn test_parse_plain_unified_diff() {
    let diff = [
        "--- a/one.txt\t2024-01-01 10:00:00",
        "+++ b/one.txt\t2024-01-02 10:00:00",
        "@@ -1,2 +1,2 @@",
        " keep",
        "-drop",
        "+add",
        "--- /dev/null",
        "+++ b/two.txt",
        "@@ -0,0 +1 @@",
        "+hello",
    ]
    .join("\n");

    let files = parse_unified_diff(&diff).unwrap();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0].path, "one.txt");
    assert_eq!(files[0].added_lines, lines(&[2]));
    assert_eq!(files[1].path, "two.txt");
    assert_eq!(files[1].status, FileStatus::Added);
}

#[test]
fn test_parse_records_old_spans() {
    let diff = [
        "--- a.py\t2024-01-01 10:00:00",
        "+++ a.py\t2024-01-01 10:00:01",
        "@@ -3,2 +3,1 @@",
        "-x=1",
        "-y=2",
        "+x, y = 1, 2",
        "@@ -9,0 +9,1 @@",
        "+",
    ]
    .join("\n");

    let files = parse_unified_diff(&diff).unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].path, "a.py");
    assert_eq!(
        files[0].old_spans,
        vec![HunkSpan { start: 3, len: 2 }, HunkSpan { start: 9, len: 0 }]
    );
}

#[test]
fn test_no_newline_marker_is_ignored() {
    let diff = r#"diff --git a/a.txt b/a.txt
--- a/a.txt
+++ b/a.txt
@@ -1 +1 @@
-old
\ No newline at end of file
+new
\ No newline at end of file
"#;

    let files = parse_unified_diff(diff).unwrap();
    assert_eq!(files[0].added_lines, lines(&[1]));
}

#[test]
fn test_malformed_hunk_header_is_unavailable() {
    let diff = r#"diff --git a/a.txt b/a.txt
--- a/a.txt
+++ b/a.txt
@@ -x +y @@
+new
"#;

    let err = parse_unified_diff(diff).unwrap_err();
    assert!(matches!(err, LintError::DiffUnavailable(_)));
    assert!(err.to_string().contains("malformed hunk header"));
}

#[test]
fn test_empty_diff() {
    assert!(parse_unified_diff("").unwrap().is_empty());
    assert!(DiffIndex::from_diff("").unwrap().is_empty());
}

// =========================================================================
// Index
// =========================================================================

#[test]
fn test_index_changed_lines_and_deletion() {
    let diff = r#"diff --git a/x.py b/x.py
--- a/x.py
+++ b/x.py
@@ -9,0 +10,3 @@
+a
+b
+c
diff --git a/y.py b/y.py
deleted file mode 100644
--- a/y.py
+++ /dev/null
@@ -1 +0,0 @@
-gone
"#;

    let index = DiffIndex::from_diff(diff).unwrap();

    assert_eq!(index.changed_lines("x.py"), Some(&lines(&[10, 11, 12])));
    assert!(index.is_selectable("x.py"));
    assert!(index.is_deleted("y.py"));
    assert!(!index.is_selectable("y.py"));
    assert_eq!(index.selectable_paths(), vec!["x.py"]);
}

#[test]
fn test_index_lookup_variants() {
    let index = DiffIndex::from_hunks(
        vec!["new.py".to_string()],
        vec!["gone.py".to_string()],
        vec![DiffHunk::new("mod.py", [3, 4]), DiffHunk::new("mod.py", [9])],
    );

    assert_eq!(index.lookup("new.py"), FileChange::New);
    assert_eq!(index.lookup("gone.py"), FileChange::Deleted);
    assert_eq!(index.lookup("mod.py"), FileChange::Changed(&lines(&[3, 4, 9])));
    assert_eq!(index.lookup("other.py"), FileChange::Untouched);
    assert_eq!(index.lookup("./mod.py"), FileChange::Changed(&lines(&[3, 4, 9])));
    assert_eq!(index.len(), 3);
}

#[test]
fn test_index_rename_marks_old_path_deleted() {
    let diff = r#"diff --git a/old.py b/new.py
similarity index 100%
rename from old.py
rename to new.py
"#;

    let index = DiffIndex::from_diff(diff).unwrap();

    assert_eq!(index.lookup("new.py"), FileChange::Changed(&BTreeSet::new()));
    assert!(index.is_deleted("old.py"));
}

#[test]
fn test_index_path_reused_after_rename_is_not_deleted() {
    let index = DiffIndex::from_hunks(
        vec!["a.py".to_string()],
        vec!["a.py".to_string()],
        Vec::new(),
    );
    assert!(index.is_new("a.py"));
    assert!(!index.is_deleted("a.py"));
}

#[test]
fn test_index_is_shareable_across_threads() {
    fn assert_sync<T: Sync + Send>() {}
    assert_sync::<DiffIndex>();
}

// =========================================================================
// Building from git
// =========================================================================

#[test]
fn test_build_from_repository() {
    let temp_dir = create_test_repo();
    let root = temp_dir.path();
    let original: String = (1..=20).map(|i| format!("line{}\n", i)).collect();
    write_file(root, "x.py", &original);
    write_file(root, "y.py", "doomed = True\n");
    commit_all(root, "base");
    git(root, &["tag", "base"]);

    let mut edited: Vec<String> = (1..=20).map(|i| format!("line{}", i)).collect();
    edited.insert(9, "inserted_a".to_string());
    edited.insert(10, "inserted_b".to_string());
    edited.insert(11, "inserted_c".to_string());
    write_file(root, "x.py", &(edited.join("\n") + "\n"));
    std::fs::remove_file(root.join("y.py")).unwrap();
    write_file(root, "z.py", "fresh = 1\n");
    commit_all(root, "change");

    let index = DiffIndex::build(root, "base", Some("HEAD")).unwrap();

    assert_eq!(index.changed_lines("x.py"), Some(&lines(&[10, 11, 12])));
    assert!(index.is_deleted("y.py"));
    assert!(index.is_new("z.py"));
}

#[test]
fn test_build_against_working_tree() {
    let temp_dir = create_test_repo();
    let root = temp_dir.path();
    write_file(root, "README.md", "# Test\nextra\n");

    let index = DiffIndex::build(root, "HEAD", None).unwrap();
    assert_eq!(index.changed_lines("README.md"), Some(&lines(&[2])));
}

#[test]
fn test_build_with_invalid_ref_fails() {
    let temp_dir = create_test_repo();
    let err = DiffIndex::build(temp_dir.path(), "does-not-exist", None).unwrap_err();
    assert!(matches!(err, LintError::DiffUnavailable(_)));
}
