use std::fmt::{Display, Formatter};

/// Raised while turning command-line selection criteria into a predicate.
///
/// Always fatal: the run aborts before any query is executed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidFilterError {
    #[error("invalid time interval '{value}': expected yyyy-mm-ddThh:mm_yyyy-mm-ddThh:mm")]
    IntervalFormat { value: String },

    #[error("invalid time interval '{value}': {reason}")]
    IntervalDate { value: String, reason: String },

    #[error("invalid {dimension} id '{value}': expected an integer")]
    IdList { dimension: &'static str, value: String },
}

#[derive(Debug)]
pub struct ConfigError(pub String);

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "ConfigError: {}", self.0)
    }
}
impl std::error::Error for ConfigError {}
