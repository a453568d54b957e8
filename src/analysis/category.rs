// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! File classification by path.

/// Package manifests and lock files. Changes to these are build changes.
const PACKAGE_MANIFESTS: &[&str] = &[
    "package.json",
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "cargo.toml",
    "cargo.lock",
    "go.mod",
    "go.sum",
    "pyproject.toml",
    "requirements.txt",
    "setup.py",
    "pom.xml",
    "build.gradle",
    "build.gradle.kts",
    "composer.json",
    "gemfile",
    "gemfile.lock",
];

/// Label used to pick a message template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FileCategory {
    Component,
    Script,
    Style,
    Doc,
    Config,
    Test,
    Api,
}

impl FileCategory {
    /// Tie-break order of the majority vote.
    pub fn all() -> &'static [FileCategory] {
        &[
            FileCategory::Component,
            FileCategory::Script,
            FileCategory::Style,
            FileCategory::Doc,
            FileCategory::Config,
            FileCategory::Test,
            FileCategory::Api,
        ]
    }
}

fn file_name(path: &str) -> String {
    path.rsplit('/').next().unwrap_or(path).to_lowercase()
}

fn extension(path: &str) -> String {
    let name = file_name(path);
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => ext.to_string(),
        _ => String::new(),
    }
}

fn directories(path: &str) -> Vec<String> {
    let lower = path.to_lowercase();
    let mut segments: Vec<String> = lower.split('/').map(str::to_string).collect();
    segments.pop();
    segments
}

/// Test sources and test directories.
pub fn is_test_file(path: &str) -> bool {
    let name = file_name(path);
    directories(path)
        .iter()
        .any(|d| matches!(d.as_str(), "test" | "tests" | "__tests__" | "spec" | "e2e"))
        || name.contains(".test.")
        || name.contains(".spec.")
        || name.contains("_test.")
        || name.contains("_spec.")
        || name.starts_with("test_")
}

/// Markdown and prose, or anything under a docs directory.
pub fn is_doc_file(path: &str) -> bool {
    let name = file_name(path);
    matches!(extension(path).as_str(), "md" | "mdx" | "rst" | "txt" | "adoc")
        && name != "requirements.txt"
        || directories(path).iter().any(|d| d == "docs" || d == "doc")
        || ["readme", "changelog", "contributing", "license"]
            .iter()
            .any(|p| name.starts_with(p))
}

/// Stylesheets.
pub fn is_style_file(path: &str) -> bool {
    matches!(
        extension(path).as_str(),
        "css" | "scss" | "sass" | "less" | "styl"
    )
}

/// Configuration, tooling dotfiles and manifests.
pub fn is_config_file(path: &str) -> bool {
    let name = file_name(path);
    let ext = extension(path);
    is_package_manifest(path)
        || matches!(ext.as_str(), "json" | "yaml" | "yml" | "toml" | "ini" | "env" | "cfg" | "conf")
        || name.starts_with(".env")
        || (name.starts_with('.') && name.ends_with("rc"))
        || name.contains(".config.")
        || matches!(
            name.as_str(),
            "dockerfile" | "makefile" | ".gitignore" | ".editorconfig" | ".npmrc"
        )
}

/// Whether the file name is a known package manifest or lock file.
pub fn is_package_manifest(path: &str) -> bool {
    PACKAGE_MANIFESTS.contains(&file_name(path).as_str())
}

fn is_api_file(path: &str) -> bool {
    let name = file_name(path);
    directories(path).iter().any(|d| {
        matches!(
            d.as_str(),
            "api" | "apis" | "routes" | "controllers" | "endpoints" | "handlers"
        )
    }) || ["controller", "route", "endpoint"]
        .iter()
        .any(|k| name.contains(k))
}

fn is_component_file(path: &str) -> bool {
    matches!(extension(path).as_str(), "tsx" | "jsx" | "vue" | "svelte")
        || directories(path).iter().any(|d| d == "components")
}

/// Categorize a file based on its path.
pub fn categorize_file(path: &str) -> FileCategory {
    if is_test_file(path) {
        return FileCategory::Test;
    }
    if is_doc_file(path) {
        return FileCategory::Doc;
    }
    if is_style_file(path) {
        return FileCategory::Style;
    }
    if is_config_file(path) {
        return FileCategory::Config;
    }
    if is_api_file(path) {
        return FileCategory::Api;
    }
    if is_component_file(path) {
        return FileCategory::Component;
    }
    FileCategory::Script
}

/// Majority category of a change set; ties go to the earlier label.
pub fn primary_category<S: AsRef<str>>(paths: &[S]) -> Option<FileCategory> {
    if paths.is_empty() {
        return None;
    }

    let mut counts = [0usize; 7];
    for path in paths {
        let category = categorize_file(path.as_ref());
        if let Some(idx) = FileCategory::all().iter().position(|c| *c == category) {
            counts[idx] += 1;
        }
    }

    let mut best = 0;
    for (idx, count) in counts.iter().enumerate() {
        if *count > counts[best] {
            best = idx;
        }
    }
    Some(FileCategory::all()[best])
}
