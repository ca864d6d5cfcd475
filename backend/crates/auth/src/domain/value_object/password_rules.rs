//! Password Rules and Strength Evaluation
//!
//! One ordered rule list drives both the password validation messages and
//! the strength meter shown while typing.

use kernel::validation::Rule;
use serde::Serialize;

pub const PASSWORD_MAX_LENGTH: usize = 64;
pub const PASSWORD_TOO_LONG: &str = "Password is too long.";

/// A composition rule: predicate, checklist label and validation message
#[derive(Debug, Clone, Copy)]
pub struct PasswordRule {
    pub label: &'static str,
    pub rule: Rule<str>,
}

impl PasswordRule {
    const fn new(check: fn(&str) -> bool, label: &'static str, message: &'static str) -> Self {
        Self {
            label,
            rule: Rule::new(check, message),
        }
    }

    #[inline]
    pub fn is_met(&self, password: &str) -> bool {
        self.rule.passes(password)
    }

    #[inline]
    pub fn message(&self) -> &'static str {
        self.rule.message
    }
}

pub const PASSWORD_RULES: [PasswordRule; 5] = [
    PasswordRule::new(
        |s: &str| s.chars().count() >= 8,
        "At least 8 characters",
        "Password must be at least 8 characters long.",
    ),
    PasswordRule::new(
        |s: &str| s.chars().any(|c| c.is_ascii_lowercase()),
        "At least 1 lowercase letter (a–z)",
        "Add at least one lowercase letter (a–z).",
    ),
    PasswordRule::new(
        |s: &str| s.chars().any(|c| c.is_ascii_uppercase()),
        "At least 1 uppercase letter (A–Z)",
        "Add at least one uppercase letter (A–Z).",
    ),
    PasswordRule::new(
        |s: &str| s.chars().any(|c| c.is_ascii_digit()),
        "At least 1 number (0–9)",
        "Include at least one number (0–9).",
    ),
    PasswordRule::new(
        |s: &str| s.chars().any(|c| !c.is_ascii_alphanumeric()),
        "At least 1 special character (e.g. ! @ # $)",
        "Include at least one special character (e.g. ! @ # $ %).",
    ),
];

/// Every password check in message order: length cap first, then composition
pub fn password_checks() -> impl Iterator<Item = Rule<str>> {
    std::iter::once(Rule::new(
        |s: &str| s.chars().count() <= PASSWORD_MAX_LENGTH,
        PASSWORD_TOO_LONG,
    ))
    .chain(PASSWORD_RULES.iter().map(|r| r.rule))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StrengthTier {
    None,
    Weak,
    Medium,
    Strong,
    VeryStrong,
}

impl StrengthTier {
    pub const fn from_score(score: usize) -> Self {
        match score {
            0 => StrengthTier::None,
            1 | 2 => StrengthTier::Weak,
            3 => StrengthTier::Medium,
            4 => StrengthTier::Strong,
            _ => StrengthTier::VeryStrong,
        }
    }

    pub const fn label(&self) -> &'static str {
        match self {
            StrengthTier::None => "Enter a password",
            StrengthTier::Weak => "Weak password",
            StrengthTier::Medium => "Medium password",
            StrengthTier::Strong => "Strong password",
            StrengthTier::VeryStrong => "Very strong password",
        }
    }
}

/// Meter color class for a score
pub const fn strength_color(score: usize) -> &'static str {
    match score {
        0 => "bg-border",
        1 => "bg-destructive",
        2 => "bg-orange-500",
        3 => "bg-amber-500",
        4 => "bg-yellow-400",
        _ => "bg-emerald-500",
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleResult {
    pub label: &'static str,
    pub met: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordStrength {
    pub results: Vec<RuleResult>,
    pub score: usize,
    pub total: usize,
    pub tier: StrengthTier,
    pub color: &'static str,
    pub label: &'static str,
}

impl PasswordStrength {
    /// Screen reader summary
    pub fn aria_summary(&self) -> String {
        format!(
            "Password strength: {} of {} requirements met",
            self.score, self.total
        )
    }
}

/// Evaluate `password` against [`PASSWORD_RULES`]
pub fn evaluate(password: &str) -> PasswordStrength {
    evaluate_with(password, &PASSWORD_RULES)
}

pub fn evaluate_with(password: &str, rules: &[PasswordRule]) -> PasswordStrength {
    let results: Vec<RuleResult> = rules
        .iter()
        .map(|rule| RuleResult {
            label: rule.label,
            met: rule.is_met(password),
        })
        .collect();
    let score = results.iter().filter(|r| r.met).count();
    let tier = StrengthTier::from_score(score);

    PasswordStrength {
        total: results.len(),
        results,
        score,
        tier,
        color: strength_color(score),
        label: tier.label(),
    }
}
