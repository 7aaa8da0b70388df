use serde::Serialize;

/// One of the two observed error-message formats.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::AsRefStr,
)]
#[strum(serialize_all = "lowercase")]
pub enum Dialect {
    /// MySQL-like engine: single-quoted identifiers, lower-case column names.
    MySql,
    /// Embedded H2-like engine: double-quoted, upper-cased identifiers,
    /// interesting text often on the nested cause.
    H2,
}

/// Normalized write verb that triggered a foreign-key violation.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum DaoOperation {
    AddOrUpdate,
    Delete,
    Unknown,
}

impl DaoOperation {
    /// Normalize a dialect-specific verb spelling. MySQL reports "add" or
    /// "delete" in prose; H2 leaks the leading keyword of the SQL statement,
    /// so "insert" and "update" show up too.
    pub fn from_verb(verb: &str) -> Self {
        match verb.to_ascii_lowercase().as_str() {
            "add" | "insert" | "update" => Self::AddOrUpdate,
            "delete" => Self::Delete,
            _ => Self::Unknown,
        }
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "test assertions")]
mod tests {
    use super::{DaoOperation, Dialect};

    #[test]
    fn verbs_normalize_to_operations() {
        assert_eq!(DaoOperation::from_verb("add"), DaoOperation::AddOrUpdate);
        assert_eq!(DaoOperation::from_verb("insert"), DaoOperation::AddOrUpdate);
        assert_eq!(DaoOperation::from_verb("update"), DaoOperation::AddOrUpdate);
        assert_eq!(DaoOperation::from_verb("delete"), DaoOperation::Delete);
        assert_eq!(DaoOperation::from_verb("merge"), DaoOperation::Unknown);
        assert_eq!(DaoOperation::from_verb(""), DaoOperation::Unknown);
    }

    #[test]
    fn verb_normalization_is_case_insensitive() {
        assert_eq!(DaoOperation::from_verb("DELETE"), DaoOperation::Delete);
        assert_eq!(DaoOperation::from_verb("Insert"), DaoOperation::AddOrUpdate);
    }

    #[test]
    fn operation_string_round_trip() {
        assert_eq!(DaoOperation::AddOrUpdate.to_string(), "add_or_update");
        assert_eq!(
            "delete".parse::<DaoOperation>().unwrap(),
            DaoOperation::Delete
        );
        assert_eq!("merge".parse::<DaoOperation>().ok(), None);
    }

    #[test]
    fn dialect_display_names() {
        assert_eq!(Dialect::MySql.to_string(), "mysql");
        assert_eq!(Dialect::H2.to_string(), "h2");
    }
}
