use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use regex::Regex;

use crate::types::{FieldSpec, FileChange, Insertion};

/// Compiled line patterns for one struct name, shared by the rewriter and
/// the checker.
pub struct Patterns {
    declaration: Regex,
    hard_stop: Regex,
    assignment: Regex,
}

impl Patterns {
    pub fn new(struct_name: &str) -> Self {
        let declaration = Regex::new(&format!(
            r"let\s+(?:mut\s+)?(\w+)\s*=\s*{}::default\(\)",
            regex::escape(struct_name)
        ))
        .expect("declaration pattern built from an escaped struct name");

        // A new binding, a function item, an attribute, or a blank line
        // ends an assignment run unconditionally.
        let hard_stop = Regex::new(r"^\s*(?:let |fn |#\[|$)")
            .expect("fixed hard-stop pattern");

        // Single-line `var.field = value;`. The variable is captured and
        // compared by the caller, so one compiled pattern covers every
        // declaration site. `[^=]` keeps `==` comparisons out.
        let assignment = Regex::new(r"^\s*(\w+)\s*\.\s*(\w+)\s*=\s*[^=].*;\s*$")
            .expect("fixed assignment pattern");

        Patterns {
            declaration,
            hard_stop,
            assignment,
        }
    }

    /// The bound variable name, if this line declares a configuration
    /// object via `<Struct>::default()`.
    pub fn declaration_var<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.declaration_match(line).map(|(var, _)| var)
    }

    /// Like [`Self::declaration_var`], but also yields whatever follows the
    /// declaration on the same line (a trailing `; v.field = 1;` belongs to
    /// the block too).
    pub fn declaration_match<'a>(&self, line: &'a str) -> Option<(&'a str, &'a str)> {
        self.declaration.captures(line).map(|c| {
            let whole = c.get(0).expect("whole declaration match");
            let var = c.get(1).expect("declaration capture").as_str();
            (var, &line[whole.end()..])
        })
    }

    pub fn is_hard_stop(&self, line: &str) -> bool {
        self.hard_stop.is_match(line)
    }

    /// `(variable, field)` if this line matches the assignment shape.
    pub fn assigned_field<'a>(&self, line: &'a str) -> Option<(&'a str, &'a str)> {
        self.assignment.captures(line).map(|c| {
            (
                c.get(1).expect("assignment var capture").as_str(),
                c.get(2).expect("assignment field capture").as_str(),
            )
        })
    }
}

/// Insert `field` at the end of every assignment run that lacks it.
///
/// Returns the rewritten buffer and one [`Insertion`] per augmented site.
/// A declaration with no assignment lines is left untouched, and a site
/// that already assigns the field is skipped, so applying the same field
/// twice is a no-op.
///
/// Runs are detected line by line: any line that is not a single-line
/// `var.field = value;` (a comment, a multi-line value, an expression
/// continuation) ends the run at that point. Inputs that stray from that
/// idiom can get the insertion placed earlier than a human would put it.
pub fn rewrite(
    lines: &[String],
    patterns: &Patterns,
    field: &FieldSpec,
) -> (Vec<String>, Vec<Insertion>) {
    let value = field.rendered_value();
    let mut out = Vec::with_capacity(lines.len() + 4);
    let mut insertions = Vec::new();

    let mut i = 0;
    while i < lines.len() {
        out.push(lines[i].clone());
        let Some(var) = patterns.declaration_var(&lines[i]) else {
            i += 1;
            continue;
        };

        // Consume the assignment run belonging to this declaration.
        let mut run_end = i;
        let mut already_present = false;
        let mut j = i + 1;
        while j < lines.len() && !patterns.is_hard_stop(&lines[j]) {
            match patterns.assigned_field(&lines[j]) {
                Some((v, f)) if v == var => {
                    if f == field.name {
                        already_present = true;
                        break;
                    }
                    run_end = j;
                    j += 1;
                }
                _ => break,
            }
        }

        if already_present || run_end == i {
            // Nothing to insert; the scanned lines are copied as the outer
            // loop advances past them.
            i += 1;
            continue;
        }

        out.extend(lines[i + 1..=run_end].iter().cloned());
        let indent: String = lines[run_end]
            .chars()
            .take_while(|c| c.is_whitespace())
            .collect();
        let text = format!("{indent}{var}.{} = {};", field.name, value);
        insertions.push(Insertion {
            line: out.len() + 1,
            text: text.clone(),
        });
        out.push(text);
        i = run_end + 1;
    }

    (out, insertions)
}

/// Rewrite one file on disk, or report what would change in dry-run mode.
///
/// The buffer is split on `\n` and rejoined the same way, so the file is
/// reproduced byte for byte apart from the inserted lines (including the
/// presence or absence of a trailing newline). Returns `None` when nothing
/// was inserted.
pub fn rewrite_file(
    path: &Path,
    patterns: &Patterns,
    field: &FieldSpec,
    dry_run: bool,
) -> Result<Option<FileChange>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;

    let lines: Vec<String> = content.split('\n').map(String::from).collect();
    let (new_lines, insertions) = rewrite(&lines, patterns, field);

    if insertions.is_empty() {
        return Ok(None);
    }

    if !dry_run {
        fs::write(path, new_lines.join("\n"))
            .with_context(|| format!("writing {}", path.display()))?;
    }

    Ok(Some(FileChange {
        file: path.to_path_buf(),
        insertions,
    }))
}
