//! Patterns for the MySQL-like dialect: single-quoted identifiers, the
//! offending value inline, and foreign-key details buried in the CONSTRAINT
//! clause echo.

use regex::Captures;

use crate::classify::ClassifiedError;
use crate::dialect::{DaoOperation, Dialect};
use crate::error::Error;
use crate::hex;
use crate::rules::{PatternRule, capture};

pub(crate) fn null_field_rules() -> Vec<PatternRule> {
    vec![
        PatternRule::new(
            "mysql_column_cannot_be_null",
            Dialect::MySql,
            r"Column '([^']+)' cannot be null",
            null_column,
        ),
        // Strict-mode spelling when an INSERT omits a NOT NULL column.
        PatternRule::new(
            "mysql_field_without_default",
            Dialect::MySql,
            r"Field '([^']+)' doesn't have a default value",
            null_column,
        ),
    ]
}

fn null_column(caps: &Captures<'_>) -> Result<ClassifiedError, Error> {
    Ok(ClassifiedError::NullField {
        field: capture(caps, 1).to_lowercase(),
    })
}

pub(crate) fn duplicate_key_rules() -> Vec<PatternRule> {
    vec![PatternRule::new(
        "mysql_duplicate_entry",
        Dialect::MySql,
        r"Duplicate entry '(.*)' for key '([^']+)'",
        duplicate_entry,
    )]
}

fn duplicate_entry(caps: &Captures<'_>) -> Result<ClassifiedError, Error> {
    // Since 8.0 the key is reported as `table.index_name`; keep only the
    // index name.
    let key = capture(caps, 2);
    let field = key.rsplit('.').next().unwrap_or(key);
    Ok(ClassifiedError::DuplicateKey {
        field: field.to_lowercase(),
        value: capture(caps, 1).to_string(),
    })
}

pub(crate) fn field_too_long_rules() -> Vec<PatternRule> {
    vec![PatternRule::new(
        "mysql_data_too_long",
        Dialect::MySql,
        r"Data too long for column '([^']+)'",
        field_too_long,
    )]
}

fn field_too_long(caps: &Captures<'_>) -> Result<ClassifiedError, Error> {
    Ok(ClassifiedError::FieldTooLong {
        field: capture(caps, 1).to_lowercase(),
    })
}

pub(crate) fn foreign_key_rules() -> Vec<PatternRule> {
    vec![PatternRule::new(
        "mysql_foreign_key_constraint_fails",
        Dialect::MySql,
        r"Cannot (\w+) or update a (?:child|parent) row: a foreign key constraint fails \(`[^`]*`\.`[^`]*`, CONSTRAINT `[^`]*` FOREIGN KEY \(`([^`]+)`\) REFERENCES `([^`]+)` \(`([^`]+)`\)",
        foreign_key,
    )]
}

fn foreign_key(caps: &Captures<'_>) -> Result<ClassifiedError, Error> {
    Ok(ClassifiedError::ForeignKeyViolation {
        operation: DaoOperation::from_verb(capture(caps, 1)),
        field: capture(caps, 2).to_lowercase(),
        referenced_entity: capture(caps, 3).to_lowercase(),
        referenced_field: capture(caps, 4).to_lowercase(),
    })
}

pub(crate) fn out_of_range_rules() -> Vec<PatternRule> {
    vec![PatternRule::new(
        "mysql_out_of_range",
        Dialect::MySql,
        r"Out of range value for column '([^']+)'",
        out_of_range,
    )]
}

fn out_of_range(caps: &Captures<'_>) -> Result<ClassifiedError, Error> {
    Ok(ClassifiedError::ValueOutOfRange {
        field: capture(caps, 1).to_lowercase(),
    })
}

pub(crate) fn invalid_character_rules() -> Vec<PatternRule> {
    vec![PatternRule::new(
        "mysql_incorrect_string_value",
        Dialect::MySql,
        r"Incorrect string value: '((?:\\x[0-9A-Fa-f]{2})*(?:\.\.\.)?)' for column '([^']+)'",
        incorrect_string_value,
    )]
}

fn incorrect_string_value(caps: &Captures<'_>) -> Result<ClassifiedError, Error> {
    // The only extractor that can fail: a hex payload that matched the
    // pattern but does not decode means the dialect's message format broke
    // an assumption, so the error propagates instead of being swallowed.
    let decoded_value = hex::decode(capture(caps, 1))?;
    Ok(ClassifiedError::InvalidCharacter {
        field: capture(caps, 2).to_lowercase(),
        decoded_value,
    })
}
