// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Diff analysis module.
//!
//! Turns raw status/diff text into [`DiffSignals`] and classifies them
//! into a conventional commit without any network access.

pub mod category;
mod classifier;
mod signals;

pub use category::{categorize_file, primary_category, FileCategory};
pub use classifier::{
    classify, compose_message, derive_scope, generate_rule_based, CommitTypeResult,
    MAX_RULE_CONFIDENCE,
};
pub use signals::{ContentFlag, DiffSignals};
