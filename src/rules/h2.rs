//! Patterns for the embedded H2-like dialect: double-quoted, upper-cased
//! identifiers, and constraint details echoed as schema-qualified DDL.
//!
//! No out-of-range or invalid-character rules live here; that engine has not
//! been observed emitting either shape.

use regex::Captures;

use crate::classify::ClassifiedError;
use crate::dialect::{DaoOperation, Dialect};
use crate::error::Error;
use crate::rules::{PatternRule, capture};

pub(crate) fn null_field_rules() -> Vec<PatternRule> {
    vec![PatternRule::new(
        "h2_null_not_allowed",
        Dialect::H2,
        r#"(?i)NULL not allowed for column "([^"]+)""#,
        null_column,
    )]
}

fn null_column(caps: &Captures<'_>) -> Result<ClassifiedError, Error> {
    Ok(ClassifiedError::NullField {
        field: capture(caps, 1).to_lowercase(),
    })
}

pub(crate) fn duplicate_key_rules() -> Vec<PatternRule> {
    // `"UK_EMAIL ON PUBLIC.USERS(EMAIL) VALUES ('bob@example.com', 1)"` —
    // the column comes before the value here, the reverse of MySQL's
    // entry-then-key ordering.
    vec![PatternRule::new(
        "h2_unique_index_violation",
        Dialect::H2,
        r#"Unique index or primary key violation: "[^ ]+ ON [^(]+\(([A-Za-z0-9_]+)[^)]*\) VALUES \('([^']*)'"#,
        unique_index,
    )]
}

fn unique_index(caps: &Captures<'_>) -> Result<ClassifiedError, Error> {
    Ok(ClassifiedError::DuplicateKey {
        field: capture(caps, 1).to_lowercase(),
        value: capture(caps, 2).to_string(),
    })
}

pub(crate) fn field_too_long_rules() -> Vec<PatternRule> {
    // The quoted identifier carries a type suffix (`"BIO CHARACTER
    // VARYING(255)"`); only the leading column name is captured.
    vec![PatternRule::new(
        "h2_value_too_long",
        Dialect::H2,
        r#"Value too long for column "([A-Za-z0-9_]+)[^"]*""#,
        field_too_long,
    )]
}

fn field_too_long(caps: &Captures<'_>) -> Result<ClassifiedError, Error> {
    Ok(ClassifiedError::FieldTooLong {
        field: capture(caps, 1).to_lowercase(),
    })
}

pub(crate) fn foreign_key_rules() -> Vec<PatternRule> {
    // The action verb is not spelled out in prose; it is the leading keyword
    // of the SQL statement H2 appends after the constraint echo.
    vec![PatternRule::new(
        "h2_referential_integrity_violation",
        Dialect::H2,
        r#"Referential integrity constraint violation: "[^:]+: [\w.]+ FOREIGN KEY\((\w+)\) REFERENCES (?:\w+\.)?(\w+)\((\w+)\)[^"]*"; SQL statement:\s*(\w+)"#,
        referential_integrity,
    )]
}

fn referential_integrity(caps: &Captures<'_>) -> Result<ClassifiedError, Error> {
    Ok(ClassifiedError::ForeignKeyViolation {
        operation: DaoOperation::from_verb(capture(caps, 4)),
        field: capture(caps, 1).to_lowercase(),
        referenced_entity: capture(caps, 2).to_lowercase(),
        referenced_field: capture(caps, 3).to_lowercase(),
    })
}
