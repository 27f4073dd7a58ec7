use std::path::PathBuf;

use serde::Serialize;

/// The field assignment to insert, as given on the command line.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: String,
    /// Literal right-hand side, quoting supplied by the caller.
    pub value: String,
    /// Wrap non-`None` values as `Some(<value>)` for `Option<T>` fields.
    pub wrap_option: bool,
}

impl FieldSpec {
    pub fn new(name: &str, value: &str, wrap_option: bool) -> Self {
        FieldSpec {
            name: name.to_string(),
            value: value.to_string(),
            wrap_option,
        }
    }

    /// The right-hand side as it will appear in the inserted line.
    pub fn rendered_value(&self) -> String {
        if self.wrap_option && self.value != "None" {
            format!("Some({})", self.value)
        } else {
            self.value.clone()
        }
    }
}

/// A single synthesized assignment line added to one configuration block.
#[derive(Debug, Clone, Serialize)]
pub struct Insertion {
    /// 1-indexed line number in the rewritten buffer.
    pub line: usize,
    pub text: String,
}

/// All insertions made (or proposed, in dry-run) for one file.
#[derive(Debug, Serialize)]
pub struct FileChange {
    pub file: PathBuf,
    pub insertions: Vec<Insertion>,
}

impl std::fmt::Display for FileChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({} change(s))",
            self.file.display(),
            self.insertions.len()
        )?;
        for ins in &self.insertions {
            write!(f, "\n  line {}: + {}", ins.line, ins.text.trim_start())?;
        }
        Ok(())
    }
}

/// Result of an update pass over the test tree.
#[derive(Debug, Serialize)]
pub struct UpdateOutcome {
    pub files_scanned: usize,
    /// One entry per file with at least one insertion.
    pub changes: Vec<FileChange>,
}

impl UpdateOutcome {
    pub fn files_modified(&self) -> usize {
        self.changes.len()
    }

    pub fn insertion_count(&self) -> usize {
        self.changes.iter().map(|c| c.insertions.len()).sum()
    }
}

/// A configuration block missing the target field, found in check mode.
#[derive(Debug, Clone, Serialize)]
pub struct MissingSite {
    pub file: PathBuf,
    /// 1-indexed line of the `<Struct>::default()` declaration.
    pub line: usize,
    /// Variable the configuration object is bound to.
    pub var: String,
}

impl std::fmt::Display for MissingSite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}: block bound to `{}` lacks the field",
            self.file.display(),
            self.line,
            self.var
        )
    }
}

/// Result of a check pass over the test tree.
#[derive(Debug, Serialize)]
pub struct CheckOutcome {
    pub files_scanned: usize,
    pub missing: Vec<MissingSite>,
    /// Files that could not be read; any makes the check fail.
    pub unreadable: usize,
}

impl CheckOutcome {
    pub fn all_present(&self) -> bool {
        self.missing.is_empty() && self.unreadable == 0
    }
}
