use crate::dialect::DaoOperation;
use crate::error::Error;
use crate::rules::{self, ErrorCategory};
use crate::types::{FallbackTranslator, RawFailure, TriageOutcome};

/// Dialect-independent classification of a failed SQL operation.
///
/// Field and entity names are always lower-cased, whichever dialect reported
/// them. [`ClassifiedError::Unclassified`] is the explicit "no rule matched,
/// try the fallback" state.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub enum ClassifiedError {
    NullField {
        field: String,
    },
    DuplicateKey {
        field: String,
        value: String,
    },
    FieldTooLong {
        field: String,
    },
    ForeignKeyViolation {
        operation: DaoOperation,
        field: String,
        referenced_entity: String,
        referenced_field: String,
    },
    ValueOutOfRange {
        field: String,
    },
    InvalidCharacter {
        field: String,
        decoded_value: String,
    },
    Unclassified,
}

impl ClassifiedError {
    pub fn is_unclassified(&self) -> bool {
        matches!(self, Self::Unclassified)
    }
}

/// Run the message through every rule group in priority order and return the
/// first match.
///
/// `Ok(Unclassified)` means no rule matched and the caller should hand the
/// failure to its fallback translator. The only `Err` is a malformed hex
/// payload inside an otherwise-matched invalid-character message.
pub fn classify(message: &str) -> Result<ClassifiedError, Error> {
    for group in rules::shared().groups() {
        let result = group.classify(message)?;
        if !result.is_unclassified() {
            return Ok(result);
        }
    }
    Ok(ClassifiedError::Unclassified)
}

fn classify_category(category: ErrorCategory, message: &str) -> Result<ClassifiedError, Error> {
    rules::shared()
        .group(category)
        .map_or(Ok(ClassifiedError::Unclassified), |group| {
            group.classify(message)
        })
}

pub fn classify_null_field(message: &str) -> Result<ClassifiedError, Error> {
    classify_category(ErrorCategory::NullField, message)
}

pub fn classify_duplicate_key(message: &str) -> Result<ClassifiedError, Error> {
    classify_category(ErrorCategory::DuplicateKey, message)
}

pub fn classify_field_too_long(message: &str) -> Result<ClassifiedError, Error> {
    classify_category(ErrorCategory::FieldTooLong, message)
}

pub fn classify_foreign_key_violation(message: &str) -> Result<ClassifiedError, Error> {
    classify_category(ErrorCategory::ForeignKeyViolation, message)
}

pub fn classify_out_of_range(message: &str) -> Result<ClassifiedError, Error> {
    classify_category(ErrorCategory::ValueOutOfRange, message)
}

pub fn classify_invalid_character(message: &str) -> Result<ClassifiedError, Error> {
    classify_category(ErrorCategory::InvalidCharacter, message)
}

/// Full triage of a raw failure: the rule chain first, then the nested cause
/// message when the top-level one does not match (the H2-like driver wraps
/// the engine error), then the injected fallback translator, called at most
/// once.
///
/// [`TriageOutcome::Unhandled`] tells the caller to rethrow the original
/// failure, wrapped.
pub fn triage<F>(failure: &RawFailure, fallback: &F) -> Result<TriageOutcome, Error>
where
    F: FallbackTranslator + ?Sized,
{
    let mut classified = classify(&failure.message)?;
    if classified.is_unclassified()
        && let Some(cause) = failure.cause.as_deref()
    {
        classified = classify(cause)?;
    }

    if !classified.is_unclassified() {
        tracing::debug!(?classified, "specialized rule matched");
        return Ok(TriageOutcome::Classified(classified));
    }

    tracing::debug!("no rule matched, delegating to fallback translator");
    match fallback.translate(failure) {
        Some(generic) => Ok(TriageOutcome::Generic(generic)),
        None => Ok(TriageOutcome::Unhandled),
    }
}

#[cfg(test)]
#[expect(
    clippy::unwrap_used,
    clippy::panic,
    reason = "test code uses unwrap/panic for concise assertions"
)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::types::GenericDbError;

    struct CountingFallback {
        calls: AtomicUsize,
        answer: Option<GenericDbError>,
    }

    impl CountingFallback {
        fn new(answer: Option<GenericDbError>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                answer,
            }
        }
    }

    impl FallbackTranslator for CountingFallback {
        fn translate(&self, _failure: &RawFailure) -> Option<GenericDbError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answer.clone()
        }
    }

    #[test]
    fn mysql_null_column() {
        assert_eq!(
            classify("Column 'email' cannot be null").unwrap(),
            ClassifiedError::NullField {
                field: "email".to_string()
            }
        );
    }

    #[test]
    fn mysql_field_without_default() {
        assert_eq!(
            classify("Field 'name' doesn't have a default value").unwrap(),
            ClassifiedError::NullField {
                field: "name".to_string()
            }
        );
    }

    #[test]
    fn h2_null_not_allowed_lower_cases_the_column() {
        assert_eq!(
            classify("NULL not allowed for column \"EMAIL\"").unwrap(),
            ClassifiedError::NullField {
                field: "email".to_string()
            }
        );
    }

    #[test]
    fn mysql_duplicate_entry_keeps_last_key_segment() {
        assert_eq!(
            classify("Duplicate entry 'bob@example.com' for key 'users.uk_email'").unwrap(),
            ClassifiedError::DuplicateKey {
                field: "uk_email".to_string(),
                value: "bob@example.com".to_string(),
            }
        );
    }

    #[test]
    fn mysql_duplicate_entry_without_table_prefix() {
        assert_eq!(
            classify("Duplicate entry '42' for key 'PRIMARY'").unwrap(),
            ClassifiedError::DuplicateKey {
                field: "primary".to_string(),
                value: "42".to_string(),
            }
        );
    }

    #[test]
    fn h2_unique_index_violation() {
        let message = "Unique index or primary key violation: \"UK_EMAIL ON PUBLIC.USERS(EMAIL) VALUES ('bob@example.com', 1)\"";
        assert_eq!(
            classify(message).unwrap(),
            ClassifiedError::DuplicateKey {
                field: "email".to_string(),
                value: "bob@example.com".to_string(),
            }
        );
    }

    #[test]
    fn mysql_data_too_long() {
        assert_eq!(
            classify("Data too long for column 'bio' at row 1").unwrap(),
            ClassifiedError::FieldTooLong {
                field: "bio".to_string()
            }
        );
    }

    #[test]
    fn h2_value_too_long_excludes_type_suffix() {
        assert_eq!(
            classify("Value too long for column \"BIO CHARACTER VARYING(255)\"").unwrap(),
            ClassifiedError::FieldTooLong {
                field: "bio".to_string()
            }
        );
    }

    #[test]
    fn mysql_foreign_key_on_add() {
        let message = "Cannot add or update a child row: a foreign key constraint fails (`db`.`orders`, CONSTRAINT `fk_user` FOREIGN KEY (`user_id`) REFERENCES `users` (`id`))";
        assert_eq!(
            classify(message).unwrap(),
            ClassifiedError::ForeignKeyViolation {
                operation: DaoOperation::AddOrUpdate,
                field: "user_id".to_string(),
                referenced_entity: "users".to_string(),
                referenced_field: "id".to_string(),
            }
        );
    }

    #[test]
    fn mysql_foreign_key_on_delete() {
        let message = "Cannot delete or update a parent row: a foreign key constraint fails (`db`.`orders`, CONSTRAINT `fk_user` FOREIGN KEY (`user_id`) REFERENCES `users` (`id`))";
        assert_eq!(
            classify(message).unwrap(),
            ClassifiedError::ForeignKeyViolation {
                operation: DaoOperation::Delete,
                field: "user_id".to_string(),
                referenced_entity: "users".to_string(),
                referenced_field: "id".to_string(),
            }
        );
    }

    #[test]
    fn h2_referential_integrity_takes_verb_from_sql_statement() {
        let message = "Referential integrity constraint violation: \"FK_USER: PUBLIC.ORDERS FOREIGN KEY(USER_ID) REFERENCES PUBLIC.USERS(ID) ('42')\"; SQL statement:\ndelete from users where id=? [23503-214]";
        assert_eq!(
            classify(message).unwrap(),
            ClassifiedError::ForeignKeyViolation {
                operation: DaoOperation::Delete,
                field: "user_id".to_string(),
                referenced_entity: "users".to_string(),
                referenced_field: "id".to_string(),
            }
        );
    }

    #[test]
    fn h2_referential_integrity_insert_maps_to_add_or_update() {
        let message = "Referential integrity constraint violation: \"FK_USER: PUBLIC.ORDERS FOREIGN KEY(USER_ID) REFERENCES PUBLIC.USERS(ID) ('42')\"; SQL statement:\ninsert into orders values (?, ?) [23506-214]";
        let ClassifiedError::ForeignKeyViolation { operation, .. } = classify(message).unwrap()
        else {
            panic!("expected ForeignKeyViolation");
        };
        assert_eq!(operation, DaoOperation::AddOrUpdate);
    }

    #[test]
    fn mysql_out_of_range() {
        assert_eq!(
            classify("Out of range value for column 'age' at row 1").unwrap(),
            ClassifiedError::ValueOutOfRange {
                field: "age".to_string()
            }
        );
    }

    #[test]
    fn mysql_incorrect_string_value_decodes_hex() {
        let message = "Incorrect string value: '\\xF0\\x9F\\x98\\x80...' for column 'nickname'";
        assert_eq!(
            classify(message).unwrap(),
            ClassifiedError::InvalidCharacter {
                field: "nickname".to_string(),
                decoded_value: "😀...".to_string(),
            }
        );
    }

    #[test]
    fn non_matching_input_is_unclassified_everywhere() {
        let message = "connection timed out";
        assert_eq!(classify(message).unwrap(), ClassifiedError::Unclassified);
        for result in [
            classify_null_field(message),
            classify_duplicate_key(message),
            classify_field_too_long(message),
            classify_foreign_key_violation(message),
            classify_out_of_range(message),
            classify_invalid_character(message),
        ] {
            assert_eq!(result.unwrap(), ClassifiedError::Unclassified);
        }
    }

    #[test]
    fn ambiguous_message_resolves_to_earlier_category() {
        // Both groups would match in isolation; null-field has priority.
        let message =
            "Column 'a' cannot be null; Duplicate entry 'v' for key 'k'";
        assert_eq!(
            classify(message).unwrap(),
            ClassifiedError::NullField {
                field: "a".to_string()
            }
        );
        assert_eq!(
            classify_duplicate_key(message).unwrap(),
            ClassifiedError::DuplicateKey {
                field: "k".to_string(),
                value: "v".to_string(),
            }
        );
    }

    #[test]
    fn sub_functions_classify_their_own_category_only() {
        let message = "Column 'email' cannot be null";
        assert!(!classify_null_field(message).unwrap().is_unclassified());
        assert!(classify_duplicate_key(message).unwrap().is_unclassified());
    }

    #[test]
    fn triage_prefers_specialized_rules() {
        let fallback = CountingFallback::new(None);
        let failure = RawFailure::new("Column 'email' cannot be null");
        assert_eq!(
            triage(&failure, &fallback).unwrap(),
            TriageOutcome::Classified(ClassifiedError::NullField {
                field: "email".to_string()
            })
        );
        assert_eq!(fallback.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn triage_classifies_from_the_nested_cause() {
        let fallback = CountingFallback::new(None);
        let failure = RawFailure::with_cause(
            "could not execute statement",
            "NULL not allowed for column \"EMAIL\"",
        );
        assert_eq!(
            triage(&failure, &fallback).unwrap(),
            TriageOutcome::Classified(ClassifiedError::NullField {
                field: "email".to_string()
            })
        );
    }

    #[test]
    fn triage_falls_back_exactly_once() {
        let generic = GenericDbError {
            category: "constraint".to_string(),
            message: "vendor code 3819".to_string(),
        };
        let fallback = CountingFallback::new(Some(generic.clone()));
        let failure = RawFailure::new("Check constraint 'age_positive' is violated.");
        assert_eq!(
            triage(&failure, &fallback).unwrap(),
            TriageOutcome::Generic(generic)
        );
        assert_eq!(fallback.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn triage_reports_unhandled_when_fallback_declines() {
        let fallback = CountingFallback::new(None);
        let failure = RawFailure::new("connection timed out");
        assert_eq!(
            triage(&failure, &fallback).unwrap(),
            TriageOutcome::Unhandled
        );
        assert_eq!(fallback.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn malformed_hex_in_matched_pattern_propagates() {
        // Lone continuation byte: the pattern matches, the decode cannot.
        let message = "Incorrect string value: '\\x80' for column 'nickname'";
        assert!(classify(message).is_err());
        assert!(classify_invalid_character(message).is_err());
    }

    #[test]
    fn classify_never_panics_on_hostile_input() {
        let mut seed = 0xBAD_5EED_u64;
        for _ in 0..2_000 {
            seed = seed
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1);
            let junk: String = (0..(seed % 64))
                .filter_map(|i| char::from_u32(((seed >> (i % 24)) % 0xFFFF) as u32))
                .collect();
            // Err is only legal for the invalid-character hex path, which
            // this junk cannot reach.
            assert!(classify(&junk).is_ok());
        }
    }
}
