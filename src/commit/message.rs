// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Conventional commit formatting and header parsing.

use crate::config::CommitType;
use crate::error::{CommitError, CsError, Result};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref HEADER_REGEX: Regex = Regex::new(
        r"^(?P<type>[A-Za-z]+)(?:\((?P<scope>[^)]*)\))?(?P<breaking>!)?:[ \t]+(?P<subject>\S.*)$"
    ).unwrap();
}

/// Assemble `type(scope): message`. The scope is omitted when blank.
pub fn format(commit_type: &str, scope: &str, message: &str) -> String {
    let scope = scope.trim();
    if scope.is_empty() {
        format!("{}: {}", commit_type, message)
    } else {
        format!("{}({}): {}", commit_type, scope, message)
    }
}

/// A parsed conventional commit.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitMessage {
    pub commit_type: CommitType,
    pub scope: Option<String>,
    pub subject: String,
    /// Everything after the first blank line.
    pub body: Option<String>,
    pub is_breaking: bool,
}

impl CommitMessage {
    /// Create a new commit message.
    pub fn new(commit_type: CommitType, subject: impl Into<String>) -> Self {
        Self {
            commit_type,
            scope: None,
            subject: subject.into(),
            body: None,
            is_breaking: false,
        }
    }

    /// Set the scope. Blank scopes are dropped.
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        let scope = scope.into();
        self.scope = Some(scope.trim().to_string()).filter(|s| !s.is_empty());
        self
    }

    /// Parse a commit message, validating its header.
    pub fn parse(message: &str) -> Result<Self> {
        let message = message.trim();
        if message.is_empty() {
            return Err(CsError::Commit(CommitError::EmptyMessage));
        }

        let (header, rest) = match message.split_once('\n') {
            Some((header, rest)) => (header.trim_end(), Some(rest)),
            None => (message, None),
        };

        let captures = HEADER_REGEX
            .captures(header)
            .ok_or(CsError::Commit(CommitError::InvalidConventionalFormat))?;

        let type_str = &captures["type"];
        let commit_type = type_str.parse::<CommitType>().map_err(|_| {
            CsError::Commit(CommitError::ParseFailed {
                message: format!("Unknown commit type: {}", type_str),
            })
        })?;

        let body = rest
            .map(|r| r.trim().to_string())
            .filter(|b| !b.is_empty());
        let is_breaking = captures.name("breaking").is_some()
            || body.as_deref().is_some_and(|b| b.contains("BREAKING CHANGE"));

        Ok(Self {
            commit_type,
            scope: captures
                .name("scope")
                .map(|m| m.as_str().trim().to_string())
                .filter(|s| !s.is_empty()),
            subject: captures["subject"].trim_end().to_string(),
            body,
            is_breaking,
        })
    }

    /// The first line of the message.
    pub fn header(&self) -> String {
        let mut commit_type = self.commit_type.as_str().to_string();
        if self.is_breaking {
            commit_type.push('!');
        }
        format(
            &commit_type,
            self.scope.as_deref().unwrap_or_default(),
            &self.subject,
        )
    }

    /// The full message text.
    pub fn to_message(&self) -> String {
        match self.body {
            Some(ref body) => format!("{}\n\n{}", self.header(), body),
            None => self.header(),
        }
    }
}
