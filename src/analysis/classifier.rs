// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Rule-based commit type, scope and message inference.

use crate::commit::AiCommitContent;
use crate::config::CommitType;

use super::category::{
    is_config_file, is_doc_file, is_package_manifest, is_style_file, is_test_file,
    primary_category, FileCategory,
};
use super::signals::{ContentFlag, DiffSignals};

/// Upper bound for any rule-based confidence.
pub const MAX_RULE_CONFIDENCE: f64 = 0.9;

/// Directories preferred as scope when a change spans several.
const SCOPE_WHITELIST: &[&str] = &["components", "services", "utils", "api", "auth", "ui", "core"];

const FALLBACK_MESSAGE: &str = "update code";

/// Inferred commit type with its confidence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommitTypeResult {
    pub commit_type: CommitType,
    pub confidence: f64,
}

impl CommitTypeResult {
    fn new(commit_type: CommitType, confidence: f64) -> Self {
        Self {
            commit_type,
            confidence: confidence.min(MAX_RULE_CONFIDENCE),
        }
    }
}

/// Classify a change. The first matching rule wins.
pub fn classify(signals: &DiffSignals) -> CommitTypeResult {
    let paths = &signals.file_paths;
    let any = |pred: fn(&str) -> bool| paths.iter().any(|p| pred(p));

    let (rule, result) = if any(is_test_file) && signals.has(ContentFlag::Tests) {
        ("test-files", CommitTypeResult::new(CommitType::Test, 0.9))
    } else if any(is_doc_file) && signals.has(ContentFlag::Docs) {
        ("doc-files", CommitTypeResult::new(CommitType::Docs, 0.9))
    } else if signals.has(ContentFlag::BugFix) {
        ("bug-fix", CommitTypeResult::new(CommitType::Fix, 0.85))
    } else if signals.is_net_new() && signals.has(ContentFlag::NewFeature) {
        ("new-feature", CommitTypeResult::new(CommitType::Feat, 0.85))
    } else if signals.has(ContentFlag::Refactor) {
        ("refactor", CommitTypeResult::new(CommitType::Refactor, 0.8))
    } else if any(is_style_file) && signals.has(ContentFlag::Styles) {
        ("style-files", CommitTypeResult::new(CommitType::Style, 0.8))
    } else if any(is_config_file) || signals.has(ContentFlag::Config) {
        if any(is_package_manifest) {
            ("manifest", CommitTypeResult::new(CommitType::Build, 0.8))
        } else {
            ("config", CommitTypeResult::new(CommitType::Chore, 0.75))
        }
    } else if signals.deletions > 0 && signals.additions == 0 {
        ("deletions-only", CommitTypeResult::new(CommitType::Refactor, 0.7))
    } else if signals.is_net_new() {
        ("net-additions", CommitTypeResult::new(CommitType::Feat, 0.7))
    } else if signals.file_count == 1 {
        ("single-file", CommitTypeResult::new(CommitType::Fix, 0.65))
    } else {
        ("default", CommitTypeResult::new(CommitType::Chore, 0.6))
    };

    tracing::debug!(
        rule,
        commit_type = %result.commit_type,
        confidence = result.confidence,
        "Classified change"
    );
    result
}

/// First meaningful directory of a path, skipping `src` and `.`.
fn top_directory(path: &str) -> Option<&str> {
    let (parent, _) = path.rsplit_once('/')?;
    parent
        .split('/')
        .find(|segment| !segment.is_empty() && *segment != "src" && *segment != ".")
}

/// Derive a scope from the changed paths.
pub fn derive_scope<S: AsRef<str>>(paths: &[S]) -> Option<String> {
    let mut directories: Vec<&str> = Vec::new();
    for path in paths {
        if let Some(dir) = top_directory(path.as_ref()) {
            if !directories.contains(&dir) {
                directories.push(dir);
            }
        }
    }

    match directories.as_slice() {
        [] => None,
        [only] => Some(only.to_string()),
        many => SCOPE_WHITELIST
            .iter()
            .find(|candidate| many.contains(*candidate))
            .map(|s| s.to_string()),
    }
}

fn template(
    commit_type: CommitType,
    multiple: bool,
    category: FileCategory,
    signals: &DiffSignals,
) -> Option<&'static str> {
    use FileCategory::*;

    let pick = |single: &'static str, many: &'static str| Some(if multiple { many } else { single });

    match (commit_type, category) {
        (CommitType::Feat, Component) => pick("add new component", "add new components"),
        (CommitType::Feat, Api) => pick("add API endpoint", "add API endpoints"),
        (CommitType::Feat, Style) => pick("add styles", "add styles across files"),
        (CommitType::Feat, Test) => pick("add test", "add tests"),
        (CommitType::Feat, _) => pick("add new feature", "add new features"),

        (CommitType::Fix, Component) => pick("fix component issue", "fix component issues"),
        (CommitType::Fix, Api) => pick("fix API endpoint", "fix API endpoints"),
        (CommitType::Fix, Style) => pick("fix styling issue", "fix styling issues"),
        (CommitType::Fix, Config) => pick("fix configuration", "fix configuration files"),
        (CommitType::Fix, _) => pick("fix bug", "fix bugs"),

        (CommitType::Refactor, _) if signals.additions == 0 && signals.deletions > 0 => {
            pick("remove unused code", "remove unused files")
        }
        (CommitType::Refactor, Component) => pick("refactor component", "refactor components"),
        (CommitType::Refactor, Api) => pick("refactor API endpoint", "refactor API layer"),
        (CommitType::Refactor, _) => pick("refactor code", "refactor code structure"),

        (CommitType::Docs, _) => pick("update documentation", "update documentation files"),
        (CommitType::Style, Style) => pick("update styles", "update styles across files"),
        (CommitType::Style, _) => pick("format code", "format code across files"),
        (CommitType::Test, _) => pick("update tests", "update test files"),

        (CommitType::Build, _) => pick("update dependencies", "update build configuration"),
        (CommitType::Chore, Config) => pick("update configuration", "update configuration files"),
        (CommitType::Ci, _) => pick("update CI configuration", "update CI workflows"),
        (CommitType::Perf, _) => pick("improve performance", "improve performance across modules"),
        _ => None,
    }
}

/// Compose the subject text for a commit type. Never empty.
pub fn compose_message<S: AsRef<str>>(
    commit_type: CommitType,
    paths: &[S],
    signals: &DiffSignals,
) -> String {
    let multiple = paths.len().max(signals.file_count) > 1;
    primary_category(paths)
        .and_then(|category| template(commit_type, multiple, category, signals))
        .unwrap_or(FALLBACK_MESSAGE)
        .to_string()
}

/// Full rule-based inference over raw status/diff text. Never fails.
pub fn generate_rule_based(raw: &str) -> AiCommitContent {
    let signals = DiffSignals::extract(raw);
    let result = classify(&signals);
    let scope = derive_scope(&signals.file_paths);
    let message = compose_message(result.commit_type, &signals.file_paths, &signals);

    AiCommitContent {
        commit_type: result.commit_type.as_str().to_string(),
        scope,
        message,
        confidence: result.confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signals(paths: &[&str]) -> DiffSignals {
        DiffSignals::default().with_paths(paths)
    }

    #[test]
    fn test_classify_test_files() {
        let s = signals(&["tests/login.test.ts"])
            .with_counts(10, 1)
            .with_flag(ContentFlag::Tests)
            .with_flag(ContentFlag::BugFix);
        let result = classify(&s);
        assert_eq!(result.commit_type, CommitType::Test);
        assert_eq!(result.confidence, 0.9);
    }

    #[test]
    fn test_classify_docs_needs_doc_files() {
        let s = signals(&["README.md"]).with_flag(ContentFlag::Docs);
        assert_eq!(classify(&s).commit_type, CommitType::Docs);

        let s = signals(&["src/lib.rs", "src/main.rs"]).with_flag(ContentFlag::Docs);
        assert_eq!(classify(&s).commit_type, CommitType::Chore);
    }

    #[test]
    fn test_bug_fix_beats_feature() {
        let s = signals(&["src/a.ts"])
            .with_counts(50, 1)
            .with_flag(ContentFlag::NewFeature)
            .with_flag(ContentFlag::BugFix);
        let result = classify(&s);
        assert_eq!(result.commit_type, CommitType::Fix);
        assert_eq!(result.confidence, 0.85);
    }

    #[test]
    fn test_feature_requires_net_additions() {
        let s = signals(&["src/a.ts", "src/b.ts"])
            .with_counts(10, 10)
            .with_flag(ContentFlag::NewFeature);
        assert_eq!(classify(&s).commit_type, CommitType::Chore);

        let s = s.with_counts(30, 10);
        assert_eq!(classify(&s).commit_type, CommitType::Feat);
    }

    #[test]
    fn test_config_rules() {
        let s = signals(&["package.json"]);
        let result = classify(&s);
        assert_eq!(result.commit_type, CommitType::Build);
        assert_eq!(result.confidence, 0.8);

        let s = signals(&["tsconfig.json"]);
        let result = classify(&s);
        assert_eq!(result.commit_type, CommitType::Chore);
        assert_eq!(result.confidence, 0.75);
    }

    #[test]
    fn test_deletions_only() {
        let s = signals(&["src/a.ts", "src/b.ts"]).with_counts(0, 40);
        let result = classify(&s);
        assert_eq!(result.commit_type, CommitType::Refactor);
        assert_eq!(result.confidence, 0.7);
        assert_eq!(
            compose_message(result.commit_type, &s.file_paths, &s),
            "remove unused files"
        );
    }

    #[test]
    fn test_count_only_rules() {
        let s = signals(&["src/a.ts", "src/b.ts"]).with_counts(30, 2);
        assert_eq!(classify(&s).commit_type, CommitType::Feat);
        assert_eq!(classify(&s).confidence, 0.7);

        let s = signals(&["src/a.ts"]).with_counts(3, 3);
        assert_eq!(classify(&s).commit_type, CommitType::Fix);
        assert_eq!(classify(&s).confidence, 0.65);

        let s = signals(&["src/a.ts", "src/b.ts"]).with_counts(3, 3);
        assert_eq!(classify(&s).commit_type, CommitType::Chore);
        assert_eq!(classify(&s).confidence, 0.6);
    }

    #[test]
    fn test_derive_scope() {
        assert_eq!(derive_scope(&["src/auth/login.ts"]), Some("auth".to_string()));
        assert_eq!(
            derive_scope(&["src/auth/login.ts", "src/auth/logout.ts"]),
            Some("auth".to_string())
        );
        assert_eq!(
            derive_scope(&["src/ui/a.ts", "src/core/b.ts", "lib/x.ts"]),
            Some("ui".to_string())
        );
        assert_eq!(derive_scope(&["lib/a.ts", "bin/b.ts"]), None);
        assert_eq!(derive_scope(&["README.md"]), None);
        assert_eq!(derive_scope::<&str>(&[]), None);
    }

    #[test]
    fn test_whitelist_order_not_path_order() {
        let scope = derive_scope(&["src/core/a.ts", "src/components/b.tsx"]);
        assert_eq!(scope, Some("components".to_string()));
    }

    #[test]
    fn test_compose_message_fallback() {
        let s = DiffSignals::default();
        let paths: [&str; 0] = [];
        assert_eq!(compose_message(CommitType::Chore, &paths, &s), "update code");
        assert_eq!(
            compose_message(CommitType::Revert, &["src/a.rs"], &s),
            "update code"
        );
    }

    #[test]
    fn test_generate_rule_based_docs() {
        let raw = "file: README.md\n+12 -3\n+ Update the docs for install\n";
        let content = generate_rule_based(raw);
        assert_eq!(content.commit_type, "docs");
        assert_eq!(content.scope, None);
        assert_eq!(content.message, "update documentation");
        assert_eq!(content.confidence, 0.9);
    }

    #[test]
    fn test_generate_rule_based_empty() {
        let content = generate_rule_based("");
        assert_eq!(content.commit_type, "chore");
        assert_eq!(content.message, "update code");
        assert!(content.confidence <= MAX_RULE_CONFIDENCE);
    }
}
