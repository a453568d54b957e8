// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Signal extraction from status/diff text.

use lazy_static::lazy_static;
use regex::{Regex, RegexSet};
use serde::Serialize;
use std::collections::BTreeSet;

lazy_static! {
    /// `file: <path>` at column 0, optionally followed by `(+N -M)`.
    static ref FILE_MARKER: Regex =
        Regex::new(r"(?m)^file:[ \t]*(\S.*?)[ \t]*(?:\(\+(\d+)[ \t]*[/,]?[ \t]*-(\d+)\))?[ \t]*$").unwrap();

    static ref DIFF_HEADER: Regex = Regex::new(r"(?m)^diff --git a/.+? b/(.+?)[ \t]*$").unwrap();

    /// `+N -M` count annotation on a line of its own.
    static ref STAT_MARKER: Regex =
        Regex::new(r"(?m)^\+(\d+)[ \t]*[/,]?[ \t]*-(\d+)[ \t]*$").unwrap();

    static ref FILES_CHANGED: Regex = Regex::new(r"(\d+) files? changed").unwrap();

    /// Keyword sets per content flag, matched against lower-cased text.
    static ref FLAG_PATTERNS: Vec<(ContentFlag, RegexSet)> = vec![
        (
            ContentFlag::NewFeature,
            RegexSet::new([
                r"\bfeat(ure)?s?\b",
                r"\bnew\b",
                r"\badd(s|ed|ing)?\b",
                r"\bimplement",
                r"\bintroduc",
                r"\bsupport for\b",
                r"\bcreate[sd]?\b",
            ])
            .unwrap(),
        ),
        (
            ContentFlag::BugFix,
            RegexSet::new([
                r"\bfix(es|ed|ing)?\b",
                r"\bbug",
                r"\bhotfix",
                r"\bcrash",
                r"\bresolve[sd]?\b",
                r"\bworkaround\b",
                r"\bregression\b",
                r"\bnull ?pointer",
                r"\bissue ?#\d+",
            ])
            .unwrap(),
        ),
        (
            ContentFlag::Refactor,
            RegexSet::new([
                r"\brefactor",
                r"\brenam(e|ed|es|ing)\b",
                r"\bextract(ed|ing)?\b",
                r"\bclean ?up\b",
                r"\bsimplif",
                r"\brestructur",
                r"\breorganiz",
            ])
            .unwrap(),
        ),
        (
            ContentFlag::Tests,
            RegexSet::new([
                r"\btest(s|ing)?\b",
                r"\bspec\b",
                r"\bdescribe\(",
                r#"\bit\(['"]"#,
                r"\bexpect\(",
                r"\bassert",
                r"#\[test\]",
                r"\b(jest|mocha|vitest|pytest)\b",
            ])
            .unwrap(),
        ),
        (
            ContentFlag::Docs,
            RegexSet::new([
                r"\breadme",
                r"\bdocs?\b",
                r"\bdocumentation\b",
                r"\.mdx?\b",
                r"\bchangelog",
                r"(?m)^\+\s*///",
                r"/\*\*",
                r"\bjsdoc\b",
            ])
            .unwrap(),
        ),
        (
            ContentFlag::Styles,
            RegexSet::new([
                r"\.(css|scss|sass|less|styl)\b",
                r"\bstyles?\b",
                r"\b(margin|padding|font-size|font-family|background-color|color)\s*:",
                r"\bclassname\b",
                r"\btailwind",
            ])
            .unwrap(),
        ),
        (
            ContentFlag::Config,
            RegexSet::new([
                r"package\.json",
                r"cargo\.toml",
                r"tsconfig",
                r"\.(eslintrc|prettierrc|babelrc|editorconfig|gitignore)",
                r"\.ya?ml\b",
                r"\.env\b",
                r"\bwebpack",
                r"\bvite\.config",
                r"\bconfig(uration)?\b",
                r"\.toml\b",
                r"dockerfile",
            ])
            .unwrap(),
        ),
    ];
}

/// Keyword categories detected in diff content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ContentFlag {
    NewFeature,
    BugFix,
    Refactor,
    Tests,
    Docs,
    Styles,
    Config,
}

/// Structured signals derived from one status/diff text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffSignals {
    /// Changed paths in order of first appearance.
    pub file_paths: Vec<String>,
    pub additions: usize,
    pub deletions: usize,
    pub file_count: usize,
    pub content_flags: BTreeSet<ContentFlag>,
}

impl DiffSignals {
    /// Extract signals from raw status or diff text. Never fails.
    pub fn extract(raw: &str) -> Self {
        let mut signals = Self::default();
        if raw.trim().is_empty() {
            return signals;
        }

        // Markers only count before the patch body starts.
        let header = DIFF_HEADER
            .find(raw)
            .map_or(raw, |m| &raw[..m.start()]);

        let mut saw_marker = false;
        for caps in FILE_MARKER.captures_iter(header) {
            signals.push_path(&caps[1]);
            if let (Some(added), Some(removed)) = (caps.get(2), caps.get(3)) {
                saw_marker = true;
                signals.add_counts(added.as_str(), removed.as_str());
            }
        }
        for caps in DIFF_HEADER.captures_iter(raw) {
            signals.push_path(&caps[1]);
        }

        for caps in STAT_MARKER.captures_iter(header) {
            saw_marker = true;
            signals.add_counts(&caps[1], &caps[2]);
        }
        if !saw_marker {
            let (added, removed) = count_hunk_lines(raw);
            signals.additions = added;
            signals.deletions = removed;
        }

        let reported_files = FILES_CHANGED
            .captures(raw)
            .map(|caps| parse_count(&caps[1]))
            .unwrap_or(0);
        signals.file_count = signals.file_paths.len().max(reported_files);

        let lowered = raw.to_lowercase();
        for (flag, patterns) in FLAG_PATTERNS.iter() {
            if patterns.is_match(&lowered) {
                signals.content_flags.insert(*flag);
            }
        }

        tracing::debug!(
            files = signals.file_count,
            additions = signals.additions,
            deletions = signals.deletions,
            flags = ?signals.content_flags,
            "Extracted diff signals"
        );

        signals
    }

    /// Whether a content flag is set.
    pub fn has(&self, flag: ContentFlag) -> bool {
        self.content_flags.contains(&flag)
    }

    /// Net-new code: more than twice as many additions as deletions.
    pub fn is_net_new(&self) -> bool {
        self.additions > self.deletions.saturating_mul(2)
    }

    /// Set the file paths (and file count).
    pub fn with_paths<S: AsRef<str>>(mut self, paths: &[S]) -> Self {
        self.file_paths = paths.iter().map(|p| p.as_ref().to_string()).collect();
        self.file_count = self.file_paths.len();
        self
    }

    /// Set the line counts.
    pub fn with_counts(mut self, additions: usize, deletions: usize) -> Self {
        self.additions = additions;
        self.deletions = deletions;
        self
    }

    /// Set a content flag.
    pub fn with_flag(mut self, flag: ContentFlag) -> Self {
        self.content_flags.insert(flag);
        self
    }

    fn add_counts(&mut self, added: &str, removed: &str) {
        self.additions = self.additions.saturating_add(parse_count(added));
        self.deletions = self.deletions.saturating_add(parse_count(removed));
    }

    fn push_path(&mut self, path: &str) {
        let path = path.trim();
        if !path.is_empty() && !self.file_paths.iter().any(|p| p == path) {
            self.file_paths.push(path.to_string());
        }
    }
}

fn parse_count(digits: &str) -> usize {
    digits.parse().unwrap_or(0)
}

/// Count `+`/`-` lines of a unified diff, ignoring file headers.
fn count_hunk_lines(raw: &str) -> (usize, usize) {
    raw.lines().fold((0, 0), |(added, removed), line| {
        if line.starts_with("+++") || line.starts_with("---") {
            (added, removed)
        } else if line.starts_with('+') {
            (added + 1, removed)
        } else if line.starts_with('-') {
            (added, removed + 1)
        } else {
            (added, removed)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_empty() {
        let signals = DiffSignals::extract("");
        assert_eq!(signals, DiffSignals::default());
        assert!(DiffSignals::extract("  \n\t ").content_flags.is_empty());
    }

    #[test]
    fn test_extract_file_markers_in_order() {
        let raw = "file: src/b.ts\n+3 -1\nfile: src/a.ts\n+2 -0\nfile: src/b.ts\n+1 -1\n";
        let signals = DiffSignals::extract(raw);
        assert_eq!(signals.file_paths, vec!["src/b.ts", "src/a.ts"]);
        assert_eq!(signals.file_count, 2);
        assert_eq!(signals.additions, 6);
        assert_eq!(signals.deletions, 2);
    }

    #[test]
    fn test_extract_inline_stat() {
        let signals = DiffSignals::extract("file: src/app.ts (+12 -4)\n");
        assert_eq!(signals.file_paths, vec!["src/app.ts"]);
        assert_eq!((signals.additions, signals.deletions), (12, 4));
    }

    #[test]
    fn test_overflowing_count_defaults_to_zero() {
        let raw = "file: a.rs\n+99999999999999999999999 -2\n";
        let signals = DiffSignals::extract(raw);
        assert_eq!(signals.additions, 0);
        assert_eq!(signals.deletions, 2);
    }

    #[test]
    fn test_diff_headers_and_hunk_counting() {
        let raw = "\
diff --git a/src/lib.rs b/src/lib.rs
--- a/src/lib.rs
+++ b/src/lib.rs
@@ -1,2 +1,3 @@
 fn main() {}
+fn added() {}
+fn another() {}
-fn removed() {}
";
        let signals = DiffSignals::extract(raw);
        assert_eq!(signals.file_paths, vec!["src/lib.rs"]);
        assert_eq!((signals.additions, signals.deletions), (2, 1));
    }

    #[test]
    fn test_patch_context_is_not_a_file_marker() {
        let raw = "\
file: .github/workflows/ci.yml
+1 -0

diff --git a/.github/workflows/ci.yml b/.github/workflows/ci.yml
@@ -10,3 +10,4 @@
       file: ./Dockerfile
+      push: true
";
        let signals = DiffSignals::extract(raw);
        assert_eq!(signals.file_paths, vec![".github/workflows/ci.yml"]);
        assert_eq!(signals.file_count, 1);
        assert_eq!((signals.additions, signals.deletions), (1, 0));
    }

    #[test]
    fn test_patch_code_is_not_a_stat_marker() {
        let raw = "\
file: src/grid.rs
+40 -0

diff --git a/src/grid.rs b/src/grid.rs
@@ -0,0 +1,40 @@
+const OFFSETS: [(i32, i32); 1] = [(+1, -300)];
+fn shift(x: i32) -> i32 { step(+5 -3) }
+5 -3
";
        let signals = DiffSignals::extract(raw);
        assert_eq!(signals.file_paths, vec!["src/grid.rs"]);
        assert_eq!((signals.additions, signals.deletions), (40, 0));
        assert!(signals.is_net_new());
    }

    #[test]
    fn test_content_flags() {
        let signals = DiffSignals::extract("file: README.md\n+ Fixed a crash in the parser\n");
        assert!(signals.has(ContentFlag::Docs));
        assert!(signals.has(ContentFlag::BugFix));
        assert!(!signals.has(ContentFlag::Styles));
    }

    #[test]
    fn test_files_changed_summary() {
        let signals = DiffSignals::extract("file: a.rs\n 7 files changed, 30 insertions(+)\n");
        assert_eq!(signals.file_count, 7);
    }

    #[test]
    fn test_extract_is_idempotent() {
        let raw = "file: src/auth/login.ts\n+40 -2\n+ export function login() {}\n";
        assert_eq!(DiffSignals::extract(raw), DiffSignals::extract(raw));
    }

    #[test]
    fn test_net_new() {
        assert!(DiffSignals::default().with_counts(21, 10).is_net_new());
        assert!(!DiffSignals::default().with_counts(20, 10).is_net_new());
        assert!(!DiffSignals::default().is_net_new());
    }
}
