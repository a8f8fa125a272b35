//! Feature flag naming rules.
//!
//! Each rule is evaluated independently and yields its own verdict. A name
//! is valid when no rule fails; warnings are advisory.

use lazy_static::lazy_static;
use regex::Regex;
use schemars::JsonSchema;
use serde::Serialize;

use super::{RuleResult, RuleStatus};
use crate::domains::analysis::{AnalysisError, AnalysisResult};

pub const DEFAULT_MAX_LENGTH: usize = 64;
pub const MIN_LENGTH: usize = 3;

const RESERVED_WORDS: &[&str] = &["test", "temp", "tmp", "todo", "foo"];

lazy_static! {
    static ref SNAKE_CASE: Regex = Regex::new(r"^[a-z][a-z0-9]*(_[a-z0-9]+)*$").unwrap();
    static ref CAMEL_CASE: Regex = Regex::new(r"^[a-z][a-z0-9]*([A-Z][a-z0-9]*)*$").unwrap();
    static ref PASCAL_CASE: Regex = Regex::new(r"^[A-Z][a-z0-9]*([A-Z][a-z0-9]*)*$").unwrap();
    static ref KEBAB_CASE: Regex = Regex::new(r"^[a-z][a-z0-9]*(-[a-z0-9]+)*$").unwrap();
    static ref SCREAMING_SNAKE_CASE: Regex = Regex::new(r"^[A-Z][A-Z0-9]*(_[A-Z0-9]+)*$").unwrap();
}

/// Supported naming conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
pub enum NamingConvention {
    #[serde(rename = "snake_case")]
    SnakeCase,
    #[serde(rename = "camelCase")]
    CamelCase,
    #[serde(rename = "PascalCase")]
    PascalCase,
    #[serde(rename = "kebab-case")]
    KebabCase,
    #[serde(rename = "SCREAMING_SNAKE_CASE")]
    ScreamingSnakeCase,
}

impl NamingConvention {
    /// Parse a convention name, accepting common aliases.
    pub fn parse(value: &str) -> AnalysisResult<Self> {
        let normalized: String = value
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "snakecase" | "snake" => Ok(Self::SnakeCase),
            "camelcase" | "camel" => Ok(Self::CamelCase),
            "pascalcase" | "pascal" => Ok(Self::PascalCase),
            "kebabcase" | "kebab" => Ok(Self::KebabCase),
            "screamingsnakecase" | "screamingsnake" | "constant" | "constantcase" => {
                Ok(Self::ScreamingSnakeCase)
            }
            _ => Err(AnalysisError::validation(
                "convention",
                format!(
                    "unknown naming convention '{}'; expected snake_case, camelCase, PascalCase, kebab-case or SCREAMING_SNAKE_CASE",
                    value
                ),
            )),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SnakeCase => "snake_case",
            Self::CamelCase => "camelCase",
            Self::PascalCase => "PascalCase",
            Self::KebabCase => "kebab-case",
            Self::ScreamingSnakeCase => "SCREAMING_SNAKE_CASE",
        }
    }

    fn pattern(&self) -> &'static Regex {
        match self {
            Self::SnakeCase => &*SNAKE_CASE,
            Self::CamelCase => &*CAMEL_CASE,
            Self::PascalCase => &*PASCAL_CASE,
            Self::KebabCase => &*KEBAB_CASE,
            Self::ScreamingSnakeCase => &*SCREAMING_SNAKE_CASE,
        }
    }

    fn separator(&self) -> Option<char> {
        match self {
            Self::SnakeCase | Self::ScreamingSnakeCase => Some('_'),
            Self::KebabCase => Some('-'),
            Self::CamelCase | Self::PascalCase => None,
        }
    }

    /// Rewrite `name` in this convention.
    pub fn convert(&self, name: &str) -> String {
        let words = split_words(name);
        match self {
            Self::SnakeCase => words.join("_"),
            Self::KebabCase => words.join("-"),
            Self::ScreamingSnakeCase => words.join("_").to_ascii_uppercase(),
            Self::PascalCase => words.iter().map(|w| capitalize(w)).collect(),
            Self::CamelCase => words
                .iter()
                .enumerate()
                .map(|(i, w)| if i == 0 { w.clone() } else { capitalize(w) })
                .collect(),
        }
    }
}

/// Verdicts for one flag name.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FlagNameReport {
    pub flag_name: String,
    pub convention: NamingConvention,
    pub valid: bool,
    pub failed_count: usize,
    pub warning_count: usize,
    pub rules: Vec<RuleResult>,
    pub suggested_name: Option<String>,
}

/// Evaluate every naming rule against `name`.
pub fn check_flag_name(
    name: &str,
    convention: NamingConvention,
    max_length: usize,
) -> AnalysisResult<FlagNameReport> {
    if max_length < MIN_LENGTH {
        return Err(AnalysisError::validation(
            "maxLength",
            format!("must be at least {}, got {}", MIN_LENGTH, max_length),
        ));
    }

    let rules = vec![
        check_not_empty(name),
        check_length(name, max_length),
        check_leading_character(name),
        check_convention(name, convention),
        check_allowed_characters(name, convention),
        check_reserved_words(name),
    ];

    let failed_count = rules.iter().filter(|r| r.status == RuleStatus::Fail).count();
    let warning_count = rules.iter().filter(|r| r.status == RuleStatus::Warning).count();

    let suggested_name = if failed_count > 0 {
        let converted = convention.convert(name);
        (!converted.is_empty() && converted != name).then_some(converted)
    } else {
        None
    };

    Ok(FlagNameReport {
        flag_name: name.to_string(),
        convention,
        valid: failed_count == 0,
        failed_count,
        warning_count,
        rules,
        suggested_name,
    })
}

fn check_not_empty(name: &str) -> RuleResult {
    if name.trim().is_empty() {
        RuleResult::fail("not_empty", "Flag name is empty")
    } else {
        RuleResult::pass("not_empty", "Flag name is present")
    }
}

fn check_length(name: &str, max_length: usize) -> RuleResult {
    let len = name.chars().count();
    if len < MIN_LENGTH {
        RuleResult::fail(
            "length",
            format!("Flag name has {} characters; at least {} are required", len, MIN_LENGTH),
        )
    } else if len > max_length {
        let truncated: String = name.chars().take(max_length).collect();
        RuleResult::fail(
            "length",
            format!("Flag name has {} characters; at most {} are allowed", len, max_length),
        )
        .with_suggestion(truncated)
    } else {
        RuleResult::pass("length", format!("Length {} is within {}..={}", len, MIN_LENGTH, max_length))
    }
}

fn check_leading_character(name: &str) -> RuleResult {
    match name.chars().next() {
        Some(c) if c.is_ascii_alphabetic() => {
            RuleResult::pass("leading_character", "Flag name starts with a letter")
        }
        Some(c) => RuleResult::fail(
            "leading_character",
            format!("Flag name starts with '{}'; it must start with a letter", c),
        ),
        None => RuleResult::fail("leading_character", "Flag name has no first character"),
    }
}

fn check_convention(name: &str, convention: NamingConvention) -> RuleResult {
    if convention.pattern().is_match(name) {
        RuleResult::pass(
            "naming_convention",
            format!("Flag name follows {}", convention.as_str()),
        )
    } else {
        let result = RuleResult::fail(
            "naming_convention",
            format!("Flag name does not follow {}", convention.as_str()),
        );
        let converted = convention.convert(name);
        if converted.is_empty() {
            result
        } else {
            result.with_suggestion(converted)
        }
    }
}

fn check_allowed_characters(name: &str, convention: NamingConvention) -> RuleResult {
    let separator = convention.separator();
    let invalid: Vec<char> = name
        .chars()
        .filter(|c| !c.is_ascii_alphanumeric() && Some(*c) != separator)
        .collect();

    if invalid.is_empty() {
        RuleResult::pass("allowed_characters", "Only allowed characters are used")
    } else {
        let listed: String = invalid.iter().map(|c| format!("'{}' ", c)).collect();
        RuleResult::fail(
            "allowed_characters",
            format!("Flag name contains disallowed characters: {}", listed.trim_end()),
        )
    }
}

fn check_reserved_words(name: &str) -> RuleResult {
    let found: Vec<String> = split_words(name)
        .into_iter()
        .filter(|w| RESERVED_WORDS.contains(&w.as_str()))
        .collect();

    if found.is_empty() {
        RuleResult::pass("reserved_words", "No placeholder words found")
    } else {
        RuleResult::warning(
            "reserved_words",
            format!(
                "Flag name contains placeholder words ({}); use a descriptive name",
                found.join(", ")
            ),
        )
    }
}

/// Split a name into lowercase words on separators and case boundaries.
fn split_words(name: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut previous: Option<char> = None;

    for c in name.chars() {
        if !c.is_ascii_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            previous = None;
            continue;
        }
        let boundary = c.is_ascii_uppercase()
            && previous.is_some_and(|p| p.is_ascii_lowercase() || p.is_ascii_digit());
        if boundary && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.push(c.to_ascii_lowercase());
        previous = Some(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}
