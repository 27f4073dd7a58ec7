pub mod types;
pub mod discovery;
pub mod rewriter;
pub mod checker;
pub mod format;

use std::path::Path;

use types::{CheckOutcome, FieldSpec, UpdateOutcome};

/// Insert `field` into every configuration block under `test_dir` that
/// lacks it.
///
/// Files are processed one at a time in discovery order. A file that cannot
/// be read or written is logged and skipped; it never blocks the rest. In
/// dry-run mode the proposed changes are returned but nothing is written.
pub fn update(
    test_dir: &Path,
    struct_name: &str,
    field: &FieldSpec,
    dry_run: bool,
) -> UpdateOutcome {
    let patterns = rewriter::Patterns::new(struct_name);
    let files = discovery::find_test_files(test_dir);

    let mut changes = Vec::new();
    for file in &files {
        match rewriter::rewrite_file(file, &patterns, field, dry_run) {
            Ok(Some(change)) => changes.push(change),
            Ok(None) => {}
            Err(e) => log::warn!("skipping file: {e:#}"),
        }
    }

    UpdateOutcome {
        files_scanned: files.len(),
        changes,
    }
}

/// Verify that every configuration block under `test_dir` assigns
/// `field_name`.
///
/// All missing sites are collected before the caller decides the exit code;
/// nothing short-circuits. An unreadable file counts as a failure.
pub fn check(test_dir: &Path, struct_name: &str, field_name: &str) -> CheckOutcome {
    let patterns = rewriter::Patterns::new(struct_name);
    let files = discovery::find_test_files(test_dir);

    let mut missing = Vec::new();
    let mut unreadable = 0;
    for file in &files {
        match checker::check_file(file, &patterns, field_name) {
            Ok(sites) => missing.extend(sites),
            Err(e) => {
                log::warn!("cannot check file: {e:#}");
                unreadable += 1;
            }
        }
    }

    CheckOutcome {
        files_scanned: files.len(),
        missing,
        unreadable,
    }
}
