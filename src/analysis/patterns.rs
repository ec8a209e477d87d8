use std::sync::OnceLock;

use regex::{Regex, RegexSet};

use crate::analysis::emoji::contains_emoji;
use crate::models::analysis::NamingPatterns;

/// Keyword and punctuation heuristics for rushed or informal messages.
/// Matched case-insensitively anywhere in the message.
pub const QUESTIONABLE_PATTERNS: &[&str] = &[
    "fix",
    "oops",
    "wtf",
    "todo",
    "hack",
    "temp",
    "wip",
    "asdf",
    "stuff",
    "idk",
    "damn",
    "ugh",
    "please work",
    r"\?{2,}",
    r"!{2,}",
];

fn questionable_set() -> &'static RegexSet {
    static SET: OnceLock<RegexSet> = OnceLock::new();
    SET.get_or_init(|| {
        RegexSet::new(QUESTIONABLE_PATTERNS.iter().map(|p| format!("(?i){}", p)))
            .expect("questionable patterns are valid")
    })
}

pub fn is_questionable(message: &str) -> bool {
    questionable_set().is_match(message)
}

/// Entries of [`QUESTIONABLE_PATTERNS`] that match `message`, in table order.
pub fn questionable_matches(message: &str) -> Vec<&'static str> {
    questionable_set()
        .matches(message)
        .into_iter()
        .map(|i| QUESTIONABLE_PATTERNS[i])
        .collect()
}

struct NamingRegexes {
    kebab: Regex,
    snake: Regex,
    camel: Regex,
    pascal: Regex,
    numbers: Regex,
    acronym: Regex,
    demo: Regex,
    tutorial: Regex,
    app: Regex,
    js: Regex,
}

fn naming_regexes() -> &'static NamingRegexes {
    static RE: OnceLock<NamingRegexes> = OnceLock::new();
    RE.get_or_init(|| {
        let re = |p: &str| Regex::new(p).expect("naming pattern is valid");
        NamingRegexes {
            kebab: re(r"^[a-z0-9]+(?:-[a-z0-9]+)+$"),
            snake: re(r"^[a-z0-9]+(?:_[a-z0-9]+)+$"),
            camel: re(r"^[a-z][a-z0-9]*(?:[A-Z][a-z0-9]*)+$"),
            pascal: re(r"^[A-Z][a-z0-9]+(?:[A-Z][a-z0-9]*)*$"),
            numbers: re(r"[0-9]"),
            acronym: re(r"[A-Z]{2,}"),
            demo: re(r"(?i)demo"),
            tutorial: re(r"(?i)tutorial"),
            app: re(r"(?i)app"),
            js: re(r"(?i)js"),
        }
    })
}

/// Test `name` against every naming category and bump each one it matches.
pub fn tally_name(patterns: &mut NamingPatterns, name: &str) {
    let re = naming_regexes();

    if re.kebab.is_match(name) {
        patterns.kebab_case += 1;
    }
    if re.snake.is_match(name) {
        patterns.snake_case += 1;
    }
    if re.camel.is_match(name) {
        patterns.camel_case += 1;
    }
    if re.pascal.is_match(name) {
        patterns.pascal_case += 1;
    }
    if re.numbers.is_match(name) {
        patterns.has_numbers += 1;
    }
    if contains_emoji(name) {
        patterns.has_emoji += 1;
    }
    if re.acronym.is_match(name) {
        patterns.has_acronym += 1;
    }
    if re.demo.is_match(name) {
        patterns.has_demo += 1;
    }
    if re.tutorial.is_match(name) {
        patterns.has_tutorial += 1;
    }
    if re.app.is_match(name) {
        patterns.has_app += 1;
    }
    if re.js.is_match(name) {
        patterns.has_js += 1;
    }
}
