use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Run `cargo fmt` once in the crate root so the inserted lines pick up the
/// project's formatting. Spawn failures and non-zero exits are the caller's
/// warning to print, never fatal.
pub fn run_cargo_fmt(test_dir: &Path) -> std::io::Result<Output> {
    Command::new("cargo")
        .arg("fmt")
        .current_dir(crate_root_for(test_dir))
        .output()
}

/// The conventional test dir is `<crate>/src/tests`, so the crate root is
/// two levels up; fall back to the test dir itself when it sits higher.
fn crate_root_for(test_dir: &Path) -> PathBuf {
    test_dir
        .parent()
        .and_then(Path::parent)
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(test_dir)
        .to_path_buf()
}
