// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Working-tree status parsing.

use serde::{Deserialize, Serialize};

/// One path from `git status --porcelain=v1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    /// Path relative to the repository root (the new path for renames).
    pub path: String,
    /// Index status letter (`M`, `A`, `D`, `R`, `?`, ...).
    pub index: char,
    /// Worktree status letter.
    pub worktree: char,
}

impl FileEntry {
    /// Whether the index holds a change for this path.
    pub fn is_staged(&self) -> bool {
        self.index != ' ' && self.index != '?' && self.index != '!'
    }

    /// Whether the worktree holds a change not yet staged.
    pub fn is_unstaged(&self) -> bool {
        self.worktree != ' ' && self.worktree != '!'
    }

    /// Single-letter label shown in the panel.
    pub fn label(&self, staged: bool) -> char {
        let c = if staged { self.index } else { self.worktree };
        if c == '?' {
            'U'
        } else {
            c
        }
    }
}

/// Staged and unstaged views of the working tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingTreeStatus {
    pub staged: Vec<FileEntry>,
    pub unstaged: Vec<FileEntry>,
}

impl WorkingTreeStatus {
    /// Build the two lists from porcelain output.
    pub fn from_porcelain(output: &str) -> Self {
        let mut status = Self::default();
        for entry in parse_porcelain(output) {
            if entry.is_staged() {
                status.staged.push(entry.clone());
            }
            if entry.is_unstaged() {
                status.unstaged.push(entry);
            }
        }
        status
    }

    /// Whether nothing is staged.
    pub fn nothing_staged(&self) -> bool {
        self.staged.is_empty()
    }
}

/// Parse porcelain v1 output. Malformed lines are skipped.
pub fn parse_porcelain(output: &str) -> Vec<FileEntry> {
    output
        .lines()
        .filter_map(|line| {
            let mut chars = line.chars();
            let index = chars.next()?;
            let worktree = chars.next()?;
            let rest = line.get(3..)?;
            if rest.is_empty() {
                tracing::debug!(line, "Skipping malformed status line");
                return None;
            }
            let path = match rest.split_once(" -> ") {
                Some((_, new_path)) => new_path,
                None => rest,
            };
            Some(FileEntry {
                path: unquote(path),
                index,
                worktree,
            })
        })
        .collect()
}

/// Git quotes paths with unusual characters using C-style escapes.
/// Octal escapes are raw bytes, so `\344\275\277` decodes to `使`.
fn unquote(path: &str) -> String {
    let trimmed = path.trim();
    let Some(inner) = trimmed
        .strip_prefix('"')
        .and_then(|p| p.strip_suffix('"'))
    else {
        return trimmed.to_string();
    };

    let mut bytes = Vec::with_capacity(inner.len());
    let mut rest = inner.as_bytes();
    while let Some((&byte, tail)) = rest.split_first() {
        rest = tail;
        if byte != b'\\' {
            bytes.push(byte);
            continue;
        }
        let Some((&escape, tail)) = rest.split_first() else {
            bytes.push(byte);
            break;
        };
        rest = tail;
        match escape {
            b'0'..=b'7' => {
                let digits = std::iter::once(escape)
                    .chain(rest.iter().copied().take_while(|b| (b'0'..=b'7').contains(b)).take(2))
                    .collect::<Vec<_>>();
                rest = &rest[digits.len() - 1..];
                let value = digits
                    .iter()
                    .fold(0u32, |acc, d| acc * 8 + u32::from(d - b'0'));
                bytes.push(value as u8);
            }
            b'n' => bytes.push(b'\n'),
            b't' => bytes.push(b'\t'),
            b'r' => bytes.push(b'\r'),
            b'a' => bytes.push(0x07),
            b'b' => bytes.push(0x08),
            b'f' => bytes.push(0x0c),
            b'v' => bytes.push(0x0b),
            other => bytes.push(other),
        }
    }
    String::from_utf8_lossy(&bytes).into_owned()
}
