use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Collect all .rs files under the test directory, recursively.
///
/// Entries that cannot be read (broken symlinks, permission errors) are
/// skipped. The result is sorted so repeated runs process files in the
/// same order.
pub fn find_test_files(test_dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(test_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_type().is_file()
                && e.path().extension().is_some_and(|ext| ext == "rs")
        })
        .map(|e| e.path().to_path_buf())
        .collect();

    files.sort();
    files
}
