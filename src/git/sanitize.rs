// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Input hygiene for the git command surface.

/// Characters that carry meaning in a POSIX shell.
const SHELL_METACHARACTERS: &[char] = &[';', '&', '|', '`', '$', '(', ')', '{', '}', '[', ']'];

/// Strip shell metacharacters and `../` traversal from a path.
///
/// Removal repeats until stable so that `..././` cannot reassemble into `../`.
pub fn sanitize_path(path: &str) -> String {
    let mut cleaned: String = path
        .chars()
        .filter(|c| !SHELL_METACHARACTERS.contains(c))
        .collect();

    while cleaned.contains("../") {
        cleaned = cleaned.replace("../", "");
    }

    cleaned.trim().to_string()
}

/// Escape a commit message for use inside a double-quoted shell argument.
pub fn escape_commit_message(message: &str) -> String {
    let mut escaped = String::with_capacity(message.len());
    for c in message.chars() {
        match c {
            '\\' | '"' | '`' | '$' => {
                escaped.push('\\');
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
    }
    escaped
}

/// The shell form of a commit invocation, for dry runs and logs.
pub fn commit_command_line(message: &str) -> String {
    format!("git commit -m \"{}\"", escape_commit_message(message))
}
