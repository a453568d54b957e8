// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Prompt rendering.

use handlebars::Handlebars;
use lazy_static::lazy_static;
use serde::Serialize;

use crate::error::{Result, ResultExt};

const SYSTEM_PROMPT: &str = "You write git commit messages in the Conventional Commits format. \
Reply with a single JSON object and nothing else.";

const USER_TEMPLATE: &str = r#"Describe the following staged changes as one conventional commit.

Respond with JSON of the form:
{"type": "<{{types}}>", "scope": "<optional scope or null>", "message": "<imperative summary under 72 characters>", "confidence": <number between 0 and 1>}
{{#if condensed}}
The diff was too large to send in full. Below is a condensed summary listing the changed files, imported modules, touched declarations and line totals.
{{/if}}
{{diff}}
"#;

lazy_static! {
    static ref TEMPLATES: Handlebars<'static> = {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_escape_fn(handlebars::no_escape);
        registry
            .register_template_string("user", USER_TEMPLATE)
            .unwrap();
        registry
    };
}

/// A rendered system and user prompt pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

impl Prompt {
    /// System and user text as one block, for APIs with a single message.
    pub fn combined(&self) -> String {
        format!("{}\n\n{}", self.system, self.user)
    }
}

#[derive(Serialize)]
struct PromptData<'a> {
    diff: &'a str,
    condensed: bool,
    types: String,
}

/// Render the prompt for a diff or a condensed summary.
pub fn build_prompt(diff: &str, condensed: bool) -> Result<Prompt> {
    let types = crate::config::CommitType::all()
        .iter()
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join("|");

    let user = TEMPLATES
        .render(
            "user",
            &PromptData {
                diff,
                condensed,
                types,
            },
        )
        .context("Failed to render prompt")?;

    Ok(Prompt {
        system: SYSTEM_PROMPT.to_string(),
        user,
    })
}
