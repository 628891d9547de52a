//! File discovery
//!
//! Walks the working tree and returns the candidate files that survive the
//! built-in and user ignore rules.

pub mod ignore_rules;
pub mod scanner;

pub use ignore_rules::{load_user_rules, parse_rule_lines, IgnoreRules, BUILTIN_RULES};
pub use scanner::FileScanner;
