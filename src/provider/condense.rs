// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Extractive summaries of diffs too large to send in full.

use lazy_static::lazy_static;
use regex::Regex;

use crate::analysis::DiffSignals;
use crate::config::GatewayLimits;

use super::truncate_chars;

lazy_static! {
    /// `file: <path>`, optionally followed by an inline `(+N -M)`.
    static ref FILE_LINE: Regex =
        Regex::new(r"^file:[ \t]*(\S.*?)[ \t]*(?:\(\+\d+[ \t]*[/,]?[ \t]*-\d+\))?[ \t]*$").unwrap();
    static ref STAT_LINE: Regex = Regex::new(r"^\+\d+[ \t]*[/,]?[ \t]*-\d+[ \t]*$").unwrap();
    static ref DIFF_HEADER: Regex = Regex::new(r"^diff --git a/.+? b/(.+?)[ \t]*$").unwrap();

    /// Module names of import, require and use statements.
    static ref IMPORT_PATTERNS: Vec<Regex> = vec![
        Regex::new(r#"^import\s.*?\bfrom\s+['"]([^'"]+)['"]"#).unwrap(),
        Regex::new(r#"^import\s+['"]([^'"]+)['"]"#).unwrap(),
        Regex::new(r#"\brequire\(\s*['"]([^'"]+)['"]\s*\)"#).unwrap(),
        Regex::new(r"^from\s+([\w.]+)\s+import\b").unwrap(),
        Regex::new(r"^import\s+([\w.]+)\s*$").unwrap(),
        Regex::new(r"^(?:pub\s+)?use\s+([\w:]+)").unwrap(),
        Regex::new(r#"^#include\s+[<"]([^>"]+)[>"]"#).unwrap(),
    ];

    static ref DECLARATION: Regex = Regex::new(
        r"\b(function|class|interface|struct|enum|trait|impl|fn|def|func|type|const|export|async)\b"
    )
    .unwrap();
}

/// Changed lines of a unified diff with the `+`/`-` prefix split off.
fn changed_lines(raw: &str) -> impl Iterator<Item = (char, &str)> {
    raw.lines().filter_map(|line| {
        if line.starts_with("+++") || line.starts_with("---") || STAT_LINE.is_match(line) {
            return None;
        }
        let mut chars = line.chars();
        match chars.next() {
            Some(sign @ ('+' | '-')) => Some((sign, chars.as_str().trim())),
            _ => None,
        }
    })
}

fn file_section(raw: &str, limits: &GatewayLimits) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    let mut entries: Vec<String> = Vec::new();
    let mut lines = raw.lines().peekable();

    while let Some(line) = lines.next() {
        let (path, entry) = if let Some(caps) = FILE_LINE.captures(line) {
            let mut entry = line.trim().to_string();
            if let Some(next) = lines.peek() {
                if STAT_LINE.is_match(next) {
                    entry.push(' ');
                    entry.push_str(next.trim());
                    lines.next();
                }
            }
            (caps[1].to_string(), entry)
        } else if let Some(caps) = DIFF_HEADER.captures(line) {
            (caps[1].to_string(), format!("file: {}", &caps[1]))
        } else {
            continue;
        };

        if !seen.contains(&path) {
            seen.push(path);
            entries.push(entry);
        }
    }

    let total = entries.len();
    entries.truncate(limits.summary_max_files);
    if total > limits.summary_max_files {
        entries.push(format!(
            "... and {} more files",
            total - limits.summary_max_files
        ));
    }
    entries
}

fn import_section(raw: &str, limits: &GatewayLimits) -> Option<String> {
    let mut modules: Vec<&str> = Vec::new();
    for (_, line) in changed_lines(raw) {
        let module = IMPORT_PATTERNS
            .iter()
            .find_map(|re| re.captures(line).and_then(|c| c.get(1)))
            .map(|m| m.as_str());
        if let Some(module) = module {
            if !modules.contains(&module) {
                modules.push(module);
            }
        }
        if modules.len() == limits.summary_max_imports {
            break;
        }
    }

    if modules.is_empty() {
        None
    } else {
        Some(format!("imports: {}", modules.join(", ")))
    }
}

fn declaration_section(raw: &str, limits: &GatewayLimits) -> Vec<String> {
    changed_lines(raw)
        .filter(|(_, line)| !line.is_empty() && DECLARATION.is_match(line))
        .filter(|(_, line)| !IMPORT_PATTERNS.iter().any(|re| re.is_match(line)))
        .take(limits.summary_max_declarations)
        .map(|(sign, line)| {
            let verb = if sign == '+' { "added" } else { "removed" };
            format!("{}: {}", verb, truncate_chars(line, limits.summary_line_chars))
        })
        .collect()
}

/// Condense a large diff into a bounded summary.
///
/// Returns `None` when the summary would still exceed
/// [`GatewayLimits::summary_ceiling`].
pub fn condense_diff(raw: &str, limits: &GatewayLimits) -> Option<String> {
    let mut sections = file_section(raw, limits);
    sections.extend(import_section(raw, limits));
    sections.extend(declaration_section(raw, limits));

    let signals = DiffSignals::extract(raw);
    sections.push(format!(
        "+{}/-{} lines",
        signals.additions, signals.deletions
    ));

    let summary = sections.join("\n");
    let ceiling = limits.summary_ceiling();
    if summary.len() > ceiling {
        tracing::warn!(
            length = summary.len(),
            ceiling,
            "Condensed summary exceeds ceiling"
        );
        return None;
    }

    tracing::debug!(
        raw = raw.len(),
        condensed = summary.len(),
        "Condensed diff"
    );
    Some(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn large_diff(files: usize, lines_per_file: usize) -> String {
        let mut raw = String::new();
        for f in 0..files {
            raw.push_str(&format!("file: src/module_{}.ts\n+{} -1\n", f, lines_per_file));
        }
        raw.push('\n');
        for f in 0..files {
            raw.push_str(&format!(
                "diff --git a/src/module_{f}.ts b/src/module_{f}.ts\n--- a/src/module_{f}.ts\n+++ b/src/module_{f}.ts\n"
            ));
            raw.push_str("+import { useState } from 'react';\n");
            raw.push_str(&format!("+const helper = require('./helper_{}');\n", f));
            raw.push_str(&format!("+export function handler{}(input: string) {{\n", f));
            for i in 0..lines_per_file {
                raw.push_str(&format!("+  const value{} = input.length * {};\n", i, i));
            }
            raw.push_str("-// old comment\n");
        }
        raw
    }

    #[test]
    fn test_condensed_sections() {
        let limits = GatewayLimits::default();
        let summary = condense_diff(&large_diff(5, 400), &limits).unwrap();
        let lines: Vec<&str> = summary.lines().collect();

        assert_eq!(lines[0], "file: src/module_0.ts +400 -1");
        assert_eq!(lines[3], "... and 2 more files");
        assert!(lines[4].starts_with("imports: react, ./helper_0"));
        assert!(summary.contains("added: export function handler0(input: string) {"));
        assert!(summary.ends_with("lines"));
    }

    #[test]
    fn test_condensed_is_bounded() {
        let limits = GatewayLimits::default();
        let raw = large_diff(40, 500);
        assert!(raw.len() > limits.gemini_condense_above);

        let summary = condense_diff(&raw, &limits).unwrap();
        assert!(summary.len() <= limits.summary_ceiling());
        assert!(summary.len() < raw.len());
    }

    #[test]
    fn test_paths_with_spaces_are_distinct() {
        let limits = GatewayLimits::default();
        let raw = "\
file: docs/my notes.md
+3 -0
file: docs/my plan.md (+5 -1)

diff --git a/docs/my notes.md b/docs/my notes.md
diff --git a/docs/my plan.md b/docs/my plan.md
";
        assert_eq!(
            file_section(raw, &limits),
            vec!["file: docs/my notes.md +3 -0", "file: docs/my plan.md (+5 -1)"]
        );
    }

    #[test]
    fn test_imports_deduplicated_and_capped() {
        let limits = GatewayLimits {
            summary_max_imports: 2,
            ..GatewayLimits::default()
        };
        let raw = "+import a from 'x';\n+import b from 'x';\n+use std::fmt;\n+import c from 'y';\n";
        assert_eq!(
            import_section(raw, &limits).as_deref(),
            Some("imports: x, std::fmt")
        );
    }

    #[test]
    fn test_declarations_truncated() {
        let limits = GatewayLimits {
            summary_line_chars: 10,
            ..GatewayLimits::default()
        };
        let raw = "-    fn a_very_long_function_name() {}\n";
        assert_eq!(declaration_section(raw, &limits), vec!["removed: fn a_very_"]);
    }

    #[test]
    fn test_summary_over_ceiling_is_abandoned() {
        let limits = GatewayLimits {
            gemini_summary_target: 20,
            ..GatewayLimits::default()
        };
        assert!(condense_diff(&large_diff(3, 10), &limits).is_none());
    }
}
