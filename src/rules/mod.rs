pub mod h2;
pub mod mysql;

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::classify::ClassifiedError;
use crate::dialect::Dialect;
use crate::error::Error;

/// The error categories, declared in the fixed priority order the chain
/// tries them in.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum ErrorCategory {
    NullField,
    DuplicateKey,
    FieldTooLong,
    ForeignKeyViolation,
    ValueOutOfRange,
    InvalidCharacter,
}

impl ErrorCategory {
    pub const PRIORITY: [ErrorCategory; 6] = [
        ErrorCategory::NullField,
        ErrorCategory::DuplicateKey,
        ErrorCategory::FieldTooLong,
        ErrorCategory::ForeignKeyViolation,
        ErrorCategory::ValueOutOfRange,
        ErrorCategory::InvalidCharacter,
    ];
}

pub(crate) type ExtractFn = fn(&Captures<'_>) -> Result<ClassifiedError, Error>;

/// One compiled dialect pattern paired with its field extractor.
/// Built once at startup and shared read-only.
pub struct PatternRule {
    name: &'static str,
    dialect: Dialect,
    pattern: Regex,
    extract: ExtractFn,
}

impl PatternRule {
    #[expect(
        clippy::unwrap_used,
        reason = "rule patterns are fixed literals exercised by tests"
    )]
    pub(crate) fn new(
        name: &'static str,
        dialect: Dialect,
        pattern: &str,
        extract: ExtractFn,
    ) -> Self {
        Self {
            name,
            dialect,
            pattern: Regex::new(pattern).unwrap(),
            extract,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn apply(&self, message: &str) -> Result<ClassifiedError, Error> {
        match self.pattern.captures(message) {
            Some(caps) => (self.extract)(&caps),
            None => Ok(ClassifiedError::Unclassified),
        }
    }
}

/// Capture group accessor that never panics; a rule's extractor only runs
/// after its own pattern matched, so the groups it names are present.
pub(crate) fn capture<'t>(caps: &Captures<'t>, index: usize) -> &'t str {
    caps.get(index).map_or("", |m| m.as_str())
}

/// The ordered dialect patterns for one error category. The first pattern
/// that matches wins; later ones in the same group are never tried.
pub struct RuleGroup {
    category: ErrorCategory,
    rules: Vec<PatternRule>,
}

impl RuleGroup {
    fn new(category: ErrorCategory, rules: Vec<PatternRule>) -> Self {
        Self { category, rules }
    }

    pub fn category(&self) -> ErrorCategory {
        self.category
    }

    pub fn rules(&self) -> &[PatternRule] {
        &self.rules
    }

    pub(crate) fn classify(&self, message: &str) -> Result<ClassifiedError, Error> {
        for rule in &self.rules {
            let result = rule.apply(message)?;
            if result != ClassifiedError::Unclassified {
                tracing::trace!(
                    rule = rule.name,
                    dialect = %rule.dialect,
                    category = %self.category,
                    "rule matched"
                );
                return Ok(result);
            }
        }
        Ok(ClassifiedError::Unclassified)
    }
}

/// The full declarative rule table: one group per category, in priority
/// order. Adding a dialect means adding rows to the dialect modules, not new
/// branching logic.
pub struct RuleSet {
    groups: Vec<RuleGroup>,
}

impl RuleSet {
    pub fn new() -> Self {
        let groups = vec![
            RuleGroup::new(
                ErrorCategory::NullField,
                mysql::null_field_rules()
                    .into_iter()
                    .chain(h2::null_field_rules())
                    .collect(),
            ),
            RuleGroup::new(
                ErrorCategory::DuplicateKey,
                mysql::duplicate_key_rules()
                    .into_iter()
                    .chain(h2::duplicate_key_rules())
                    .collect(),
            ),
            RuleGroup::new(
                ErrorCategory::FieldTooLong,
                mysql::field_too_long_rules()
                    .into_iter()
                    .chain(h2::field_too_long_rules())
                    .collect(),
            ),
            RuleGroup::new(
                ErrorCategory::ForeignKeyViolation,
                mysql::foreign_key_rules()
                    .into_iter()
                    .chain(h2::foreign_key_rules())
                    .collect(),
            ),
            // Out-of-range and invalid-character shapes have only ever been
            // observed from the MySQL-like engine; the H2 gap is deliberate.
            RuleGroup::new(ErrorCategory::ValueOutOfRange, mysql::out_of_range_rules()),
            RuleGroup::new(
                ErrorCategory::InvalidCharacter,
                mysql::invalid_character_rules(),
            ),
        ];
        Self { groups }
    }

    pub fn groups(&self) -> &[RuleGroup] {
        &self.groups
    }

    pub(crate) fn group(&self, category: ErrorCategory) -> Option<&RuleGroup> {
        self.groups.iter().find(|g| g.category == category)
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new()
    }
}

static SHARED: LazyLock<RuleSet> = LazyLock::new(RuleSet::new);

/// Process-wide rule table, compiled on first use.
pub(crate) fn shared() -> &'static RuleSet {
    &SHARED
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "test assertions")]
mod tests {
    use super::{ErrorCategory, RuleSet};
    use crate::dialect::Dialect;

    #[test]
    fn groups_follow_priority_order() {
        let set = RuleSet::new();
        let categories: Vec<ErrorCategory> = set.groups().iter().map(|g| g.category()).collect();
        assert_eq!(categories, ErrorCategory::PRIORITY);
    }

    #[test]
    fn every_category_has_a_group() {
        let set = RuleSet::new();
        for category in ErrorCategory::PRIORITY {
            assert!(set.group(category).is_some(), "missing group: {category}");
        }
    }

    #[test]
    fn mysql_only_categories_carry_no_h2_rules() {
        let set = RuleSet::new();
        for category in [
            ErrorCategory::ValueOutOfRange,
            ErrorCategory::InvalidCharacter,
        ] {
            let group = set.group(category).unwrap();
            assert!(!group.rules().is_empty());
            assert!(
                group.rules().iter().all(|r| r.dialect() == Dialect::MySql),
                "unexpected non-mysql rule in {category}"
            );
        }
    }

    #[test]
    fn dual_dialect_categories_carry_both() {
        let set = RuleSet::new();
        for category in [
            ErrorCategory::NullField,
            ErrorCategory::DuplicateKey,
            ErrorCategory::FieldTooLong,
            ErrorCategory::ForeignKeyViolation,
        ] {
            let group = set.group(category).unwrap();
            assert!(group.rules().iter().any(|r| r.dialect() == Dialect::MySql));
            assert!(group.rules().iter().any(|r| r.dialect() == Dialect::H2));
        }
    }

    #[test]
    fn category_string_round_trip() {
        assert_eq!(ErrorCategory::NullField.to_string(), "null_field");
        assert_eq!(
            "duplicate_key".parse::<ErrorCategory>().unwrap(),
            ErrorCategory::DuplicateKey
        );
    }
}
