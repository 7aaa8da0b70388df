#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::dbg_macro,
        clippy::print_stdout,
        clippy::print_stderr,
        clippy::panic,
    )
)]

pub mod classify;
pub mod dialect;
pub mod error;
pub mod hex;
pub mod rules;
pub mod types;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use classify::{
    ClassifiedError, classify, classify_duplicate_key, classify_field_too_long,
    classify_foreign_key_violation, classify_invalid_character, classify_null_field,
    classify_out_of_range, triage,
};
pub use dialect::{DaoOperation, Dialect};
pub use error::Error;
pub use rules::{ErrorCategory, PatternRule, RuleGroup, RuleSet};
pub use types::{FallbackTranslator, GenericDbError, RawFailure, TriageOutcome};
