use crate::classify::ClassifiedError;

/// A failed low-level SQL operation as surfaced by the persistence layer.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct RawFailure {
    /// Vendor-specific message text of the failure.
    pub message: String,
    /// Nested cause message, when the driver wraps the engine error.
    /// H2 reports the interesting text on the cause; MySQL puts it on the
    /// top-level message and leaves this `None`.
    #[serde(default)]
    pub cause: Option<String>,
}

impl RawFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
        }
    }

    pub fn with_cause(message: impl Into<String>, cause: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: Some(cause.into()),
        }
    }
}

/// Broader, less specific classification produced by the vendor-table-driven
/// fallback translator when no specialized rule matched.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct GenericDbError {
    pub category: String,
    pub message: String,
}

/// Capability boundary to the generic vendor-code translator supplied by the
/// persistence layer. Called at most once per failed operation, and only after
/// every rule group declined to match.
pub trait FallbackTranslator: Sync {
    /// Best-effort generic classification, or `None` when the failure is not
    /// recognized at all and the caller must rethrow the original.
    fn translate(&self, failure: &RawFailure) -> Option<GenericDbError>;
}

/// Final outcome of running a failure through the rule chain plus fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriageOutcome {
    /// A specialized rule matched.
    Classified(ClassifiedError),
    /// No rule matched; the fallback translator produced a generic category.
    Generic(GenericDbError),
    /// Neither matched. The caller rethrows the original failure, wrapped.
    Unhandled,
}
