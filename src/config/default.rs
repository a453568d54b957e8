// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Default configuration values.

use super::schema::CsConfig;

/// Get the default configuration.
pub fn default_config() -> CsConfig {
    CsConfig::default()
}

/// Generate an example configuration file.
pub fn example_config() -> &'static str {
    r#"# commitsense configuration
# Author: Eshan Roy
# SPDX-License-Identifier: MIT

# Text-generation provider: openai, anthropic, gemini, local or rules.
# "rules" never leaves the machine and needs no key.
[ai]
provider = "rules"
# apiKey = "..."
# model = "gpt-4o-mini"
# endpoint = "http://localhost:11434/api/generate"

# Gateway limits. Diffs above a provider's limit are described by the
# built-in rules instead of being sent. Gemini diffs are condensed first.
[limits]
request_timeout_secs = 30
key_check_timeout_secs = 10
openai_max_diff = 60000
anthropic_max_diff = 120000
local_max_diff = 30000
gemini_condense_above = 12000
gemini_summary_target = 4000
summary_max_files = 3
summary_max_imports = 5
summary_max_declarations = 8
summary_line_chars = 120

[ui]
color = true
show_confidence = true
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::loader::parse_config;

    #[test]
    fn test_example_config_matches_defaults() {
        let parsed = parse_config(example_config()).unwrap();
        assert_eq!(parsed, default_config());
    }
}
