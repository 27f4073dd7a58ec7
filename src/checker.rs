use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::rewriter::Patterns;
use crate::types::MissingSite;

/// Report every declaration site in the buffer whose block does not
/// mention `<var>.<field_name>`.
///
/// The block is everything from the end of the declaration down to the
/// next hard stop, with no shape filtering: a mention inside a comment, a
/// multi-line expression, or trailing on the declaration line itself still
/// counts as present. This mirrors the update pass's run boundaries while
/// staying purely read-only.
pub fn missing_sites(
    lines: &[String],
    patterns: &Patterns,
    field_name: &str,
    file: &Path,
) -> Vec<MissingSite> {
    let mut missing = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        let Some((var, rest_of_line)) = patterns.declaration_match(line) else {
            continue;
        };

        let needle = format!("{var}.{field_name}");
        let found = rest_of_line.contains(&needle)
            || lines[i + 1..]
                .iter()
                .take_while(|l| !patterns.is_hard_stop(l))
                .any(|l| l.contains(&needle));

        if !found {
            missing.push(MissingSite {
                file: file.to_path_buf(),
                line: i + 1,
                var: var.to_string(),
            });
        }
    }

    missing
}

/// Check one file on disk for declaration sites missing the field.
pub fn check_file(
    path: &Path,
    patterns: &Patterns,
    field_name: &str,
) -> Result<Vec<MissingSite>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;

    let lines: Vec<String> = content.split('\n').map(String::from).collect();
    Ok(missing_sites(&lines, patterns, field_name, path))
}
