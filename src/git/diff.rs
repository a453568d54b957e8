// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Staged diff text and per-file statistics.

/// Line counts of one staged file, from `git diff --cached --numstat`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStat {
    pub path: String,
    pub lines_added: usize,
    pub lines_removed: usize,
}

/// Everything the inference engine needs about the staged changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StagedChanges {
    /// Per-file counts.
    pub files: Vec<FileStat>,
    /// Unified diff of the index against HEAD.
    pub patch: String,
}

impl StagedChanges {
    /// Whether anything is staged.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.patch.trim().is_empty()
    }

    /// Total lines added.
    pub fn lines_added(&self) -> usize {
        self.files.iter().map(|f| f.lines_added).sum()
    }

    /// Total lines removed.
    pub fn lines_removed(&self) -> usize {
        self.files.iter().map(|f| f.lines_removed).sum()
    }

    /// Render as annotated text: `file:` markers with `+N -M` stat lines,
    /// followed by the patch.
    pub fn to_signal_text(&self) -> String {
        if self.is_empty() {
            return String::new();
        }

        let mut text = String::new();
        for file in &self.files {
            text.push_str(&format!(
                "file: {}\n+{} -{}\n",
                file.path, file.lines_added, file.lines_removed
            ));
        }
        if !self.patch.trim().is_empty() {
            text.push('\n');
            text.push_str(&self.patch);
        }
        text
    }
}

/// Parse `--numstat` output. Binary files (`-\t-\tpath`) count as zero lines.
pub fn parse_numstat(output: &str) -> Vec<FileStat> {
    output
        .lines()
        .filter_map(|line| {
            let mut parts = line.splitn(3, '\t');
            let added = parts.next()?;
            let removed = parts.next()?;
            let path = parts.next()?.trim();
            if path.is_empty() {
                return None;
            }
            Some(FileStat {
                path: rename_target(path),
                lines_added: added.trim().parse().unwrap_or(0),
                lines_removed: removed.trim().parse().unwrap_or(0),
            })
        })
        .collect()
}

/// numstat prints renames as `old => new` or `dir/{old => new}/file`.
fn rename_target(path: &str) -> String {
    if let (Some(open), Some(close)) = (path.find('{'), path.find('}')) {
        if open < close {
            let inner = &path[open + 1..close];
            if let Some((_, new)) = inner.split_once(" => ") {
                let joined = format!("{}{}{}", &path[..open], new, &path[close + 1..]);
                return joined.replace("//", "/");
            }
        }
    }
    match path.split_once(" => ") {
        Some((_, new)) => new.to_string(),
        None => path.to_string(),
    }
}

/// Get a summary string for the staged changes.
pub fn diff_summary(changes: &StagedChanges) -> String {
    let mut parts = Vec::new();
    let files = changes.files.len();
    let added = changes.lines_added();
    let removed = changes.lines_removed();

    if files > 0 {
        parts.push(format!(
            "{} file{} changed",
            files,
            if files == 1 { "" } else { "s" }
        ));
    }

    if added > 0 {
        parts.push(format!(
            "{} insertion{}",
            added,
            if added == 1 { "" } else { "s" }
        ));
    }

    if removed > 0 {
        parts.push(format!(
            "{} deletion{}",
            removed,
            if removed == 1 { "" } else { "s" }
        ));
    }

    if parts.is_empty() {
        "No changes".to_string()
    } else {
        parts.join(", ")
    }
}
