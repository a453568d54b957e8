// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Parsing of provider completions into commit content.
//!
//! Models do not reliably follow the requested JSON format, so parsing
//! degrades in three steps: a JSON object anywhere in the text, then a
//! `type(scope): message` line, then the first non-empty line.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use crate::commit::AiCommitContent;
use crate::config::CommitType;
use crate::error::ProviderError;

use super::ProviderKind;

/// Confidence when a model ignored the JSON format but wrote a header.
const HEADER_CONFIDENCE: f64 = 0.8;
/// Confidence when a model answered with free text.
const PLAIN_TEXT_CONFIDENCE: f64 = 0.7;
/// Confidence when the JSON omitted one.
const DEFAULT_JSON_CONFIDENCE: f64 = 0.8;

lazy_static! {
    static ref CONVENTIONAL_LINE: Regex = Regex::new(
        r"(?i)\b(feat|fix|refactor|docs|style|test|chore|perf|ci|build|revert)(?:\(([^)]*)\))?!?:[ \t]*(\S[^\r\n]*)"
    )
    .unwrap();
}

#[derive(Deserialize)]
struct RawContent {
    #[serde(rename = "type")]
    commit_type: Option<String>,
    scope: Option<String>,
    message: Option<String>,
    confidence: Option<f64>,
}

/// Parse completion text. Fails only when the text has no content at all.
pub fn parse_response(
    provider: ProviderKind,
    text: &str,
) -> Result<AiCommitContent, ProviderError> {
    if let Some(content) = from_json(text) {
        tracing::debug!(%provider, "Parsed JSON completion");
        return Ok(content);
    }
    if let Some(content) = from_header(text) {
        tracing::debug!(%provider, "Parsed conventional header from completion");
        return Ok(content);
    }

    let first_line = text
        .lines()
        .map(strip_quotes)
        .find(|line| !line.is_empty())
        .ok_or_else(|| ProviderError::ResponseUnparseable {
            provider,
            message: "completion was empty".to_string(),
        })?;

    tracing::debug!(%provider, "Using first line of completion as message");
    Ok(AiCommitContent {
        commit_type: CommitType::Chore.as_str().to_string(),
        scope: None,
        message: first_line.to_string(),
        confidence: PLAIN_TEXT_CONFIDENCE,
    })
}

fn from_json(text: &str) -> Option<AiCommitContent> {
    let json = extract_json(text)?;
    let raw: RawContent = serde_json::from_str(&json).ok()?;

    let message = strip_quotes(raw.message.as_deref()?.trim());
    if message.is_empty() {
        return None;
    }

    let commit_type = raw
        .commit_type
        .as_deref()
        .and_then(|t| t.parse::<CommitType>().ok())
        .unwrap_or(CommitType::Chore);

    Some(AiCommitContent {
        commit_type: commit_type.as_str().to_string(),
        scope: clean_scope(raw.scope.as_deref()),
        message: message.to_string(),
        confidence: clamp_confidence(raw.confidence.unwrap_or(DEFAULT_JSON_CONFIDENCE)),
    })
}

fn from_header(text: &str) -> Option<AiCommitContent> {
    let caps = CONVENTIONAL_LINE.captures(text)?;
    let commit_type = caps[1].parse::<CommitType>().ok()?;
    let message = strip_quotes(&caps[3]);
    if message.is_empty() {
        return None;
    }

    Some(AiCommitContent {
        commit_type: commit_type.as_str().to_string(),
        scope: clean_scope(caps.get(2).map(|m| m.as_str())),
        message: message.to_string(),
        confidence: HEADER_CONFIDENCE,
    })
}

fn clean_scope(scope: Option<&str>) -> Option<String> {
    scope
        .map(strip_quotes)
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("null"))
        .map(str::to_string)
}

fn clamp_confidence(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        DEFAULT_JSON_CONFIDENCE
    }
}

fn strip_quotes(text: &str) -> &str {
    text.trim()
        .trim_matches(|c| matches!(c, '"' | '\'' | '`' | '“' | '”'))
        .trim()
}

/// First JSON object in the text, with or without a markdown fence.
fn extract_json(text: &str) -> Option<String> {
    let trimmed = text.trim();

    if let Some(start) = trimmed.find("```json") {
        let body = &trimmed[start + 7..];
        if let Some(end) = body.find("```") {
            return Some(body[..end].trim().to_string());
        }
    }

    for (start, _) in trimmed.match_indices('{') {
        if let Some(candidate) = balanced_object(&trimmed[start..]) {
            if serde_json::from_str::<serde_json::Value>(candidate).is_ok() {
                return Some(candidate.to_string());
            }
        }
    }
    None
}

/// Prefix of `text` up to the brace closing its first `{`.
fn balanced_object(text: &str) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in text.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' if in_string => escaped = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(&text[..=idx]);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> AiCommitContent {
        parse_response(ProviderKind::OpenAi, text).unwrap()
    }

    #[test]
    fn test_plain_json() {
        let content = parse(
            r#"{"type":"feat","scope":"auth","message":"add login form","confidence":0.92}"#,
        );
        assert_eq!(content.commit_type, "feat");
        assert_eq!(content.scope.as_deref(), Some("auth"));
        assert_eq!(content.message, "add login form");
        assert_eq!(content.confidence, 0.92);
    }

    #[test]
    fn test_json_in_fence_and_prose() {
        let content = parse(
            "Sure! Here it is:\n```json\n{\"type\": \"fix\", \"scope\": null, \"message\": \"\\\"handle {empty} input\\\"\", \"confidence\": 3}\n```",
        );
        assert_eq!(content.commit_type, "fix");
        assert_eq!(content.scope, None);
        assert_eq!(content.message, "handle {empty} input");
        assert_eq!(content.confidence, 1.0);
    }

    #[test]
    fn test_unknown_type_maps_to_chore() {
        let content = parse(r#"Result: {"type":"wip","message":"stuff","confidence":-1}"#);
        assert_eq!(content.commit_type, "chore");
        assert_eq!(content.confidence, 0.0);
    }

    #[test]
    fn test_conventional_header() {
        let content = parse("I suggest:\n\"refactor(parser): split tokenizer\"");
        assert_eq!(content.commit_type, "refactor");
        assert_eq!(content.scope.as_deref(), Some("parser"));
        assert_eq!(content.message, "split tokenizer");
        assert_eq!(content.confidence, HEADER_CONFIDENCE);
    }

    #[test]
    fn test_first_line_fallback() {
        let content = parse("\n  'Tidy up the build scripts'\nMore text");
        assert_eq!(content.commit_type, "chore");
        assert_eq!(content.message, "Tidy up the build scripts");
        assert_eq!(content.confidence, PLAIN_TEXT_CONFIDENCE);
    }

    #[test]
    fn test_empty_completion_is_unparseable() {
        let err = parse_response(ProviderKind::Local, "  \n ").unwrap_err();
        assert!(matches!(err, ProviderError::ResponseUnparseable { .. }));
    }
}
