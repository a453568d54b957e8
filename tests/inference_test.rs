// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Rule-based inference over realistic change descriptions.

use commitsense::analysis::{classify, generate_rule_based, DiffSignals, MAX_RULE_CONFIDENCE};
use commitsense::commit::CommitMessage;
use commitsense::config::CommitType;
use proptest::prelude::*;

#[test]
fn test_new_feature_across_components() {
    let raw = "\
file: src/components/LoginForm.tsx (+40 -2)
file: src/components/LoginButton.tsx (+30 -3)
file: src/components/Avatar.tsx (+20 -2)
file: src/components/Menu.tsx (+20 -2)
file: src/components/Layout.tsx (+10 -1)
+ Add new login form with remember-me support
";
    let signals = DiffSignals::extract(raw);
    assert_eq!(signals.file_count, 5);
    assert_eq!((signals.additions, signals.deletions), (120, 10));

    let result = classify(&signals);
    assert_eq!(result.commit_type, CommitType::Feat);
    assert_eq!(result.confidence, 0.85);

    let content = generate_rule_based(raw);
    assert_eq!(
        content.to_commit_message(),
        "feat(components): add new components"
    );
}

#[test]
fn test_bug_fix_in_api() {
    let raw = "\
diff --git a/src/api/users.ts b/src/api/users.ts
--- a/src/api/users.ts
+++ b/src/api/users.ts
@@ -10,3 +10,3 @@
-  return users[id];
+  // fix crash when the id is missing
+  return users[id] ?? null;
";
    let content = generate_rule_based(raw);
    assert_eq!(content.commit_type, "fix");
    assert_eq!(content.scope.as_deref(), Some("api"));
    assert_eq!(content.message, "fix API endpoint");
    assert_eq!(content.confidence, 0.85);
}

#[test]
fn test_generated_message_parses_as_conventional() {
    let raw = "file: package.json\n+2 -2\n";
    let content = generate_rule_based(raw);
    assert_eq!(content.commit_type, "build");

    let parsed = CommitMessage::parse(&content.to_commit_message()).unwrap();
    assert_eq!(parsed.commit_type, CommitType::Build);
    assert_eq!(parsed.subject, "update dependencies");
}

proptest! {
    #[test]
    fn extraction_and_inference_are_total(raw in ".*") {
        let signals = DiffSignals::extract(&raw);
        prop_assert!(signals.file_count >= signals.file_paths.len());

        let content = generate_rule_based(&raw);
        prop_assert!(content.confidence > 0.0);
        prop_assert!(content.confidence <= MAX_RULE_CONFIDENCE);
        prop_assert!(!content.message.is_empty());
        prop_assert!(CommitType::all().iter().any(|t| t.as_str() == content.commit_type));
    }

    #[test]
    fn extraction_is_idempotent(raw in "(file: [a-z/]{1,20}\\.(ts|md|css)\n\\+[0-9]{1,3} -[0-9]{1,3}\n|[+-][ a-z]{0,30}\n){0,8}") {
        prop_assert_eq!(DiffSignals::extract(&raw), DiffSignals::extract(&raw));
    }

    #[test]
    fn marker_counts_are_summed(added in 0usize..10_000, removed in 0usize..10_000) {
        let raw = format!("file: src/a.rs\n+{} -{}\nfile: src/b.rs\n+{} -{}\n", added, removed, added, removed);
        let signals = DiffSignals::extract(&raw);
        prop_assert_eq!(signals.additions, added * 2);
        prop_assert_eq!(signals.deletions, removed * 2);
        prop_assert_eq!(signals.file_count, 2);
    }
}
