//! Package basename compliance rewrites
//!
//! Rules run in a fixed order: the `+` joining rule has to see the original
//! `+` characters before they are spelled out or replaced.

use std::sync::LazyLock;

use regex::Regex;

static WORD_PLUS_WORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([a-zA-Z0-9]+)\+([a-zA-Z]+)").expect("valid word plus word regex")
});
static DISALLOWED_CHAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9_\-.]").expect("valid disallowed char regex"));
static SEPARATOR_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[_\-]{2,}").expect("valid separator run regex"));

/// A single rewrite step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComplianceRule {
    /// `foo+bar` -> `foo-bar`
    JoinWordPlus,
    /// Remaining `+` -> `plus`
    SpellOutPlus,
    /// Anything outside `[a-zA-Z0-9_.-]` -> `-`
    ReplaceDisallowed,
    /// Runs of two or more `_`/`-` -> `-`
    CollapseSeparators,
}

impl ComplianceRule {
    /// Apply this rule to `name`
    #[must_use]
    pub fn apply(self, name: &str) -> String {
        match self {
            ComplianceRule::JoinWordPlus => WORD_PLUS_WORD.replace_all(name, "${1}-${2}"),
            ComplianceRule::SpellOutPlus => name.replace('+', "plus").into(),
            ComplianceRule::ReplaceDisallowed => DISALLOWED_CHAR.replace_all(name, "-"),
            ComplianceRule::CollapseSeparators => SEPARATOR_RUN.replace_all(name, "-"),
        }
        .into_owned()
    }
}

/// Rules in the order they are applied
pub const PIPELINE: [ComplianceRule; 4] = [
    ComplianceRule::JoinWordPlus,
    ComplianceRule::SpellOutPlus,
    ComplianceRule::ReplaceDisallowed,
    ComplianceRule::CollapseSeparators,
];

/// Rewrite a package basename into its compliant form
#[must_use]
pub fn apply_compliance(name: &str) -> String {
    PIPELINE
        .iter()
        .fold(name.to_string(), |acc, rule| rule.apply(&acc))
}

/// Whether `name` is already left untouched by the pipeline
#[must_use]
pub fn is_compliant(name: &str) -> bool {
    apply_compliance(name) == name
}
