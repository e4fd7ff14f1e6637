//! Visible-subset selector for the task list.

use crate::model::task::Task;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Filter selecting which tasks are visible.
///
/// Transient UI state; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

/// Host string value for the `all` filter.
pub const FILTER_ALL: &str = "all";
/// Host string value for the `active` filter.
pub const FILTER_ACTIVE: &str = "active";
/// Host string value for the `completed` filter.
pub const FILTER_COMPLETED: &str = "completed";

impl Filter {
    /// Stable string id used by host filter buttons.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => FILTER_ALL,
            Self::Active => FILTER_ACTIVE,
            Self::Completed => FILTER_COMPLETED,
        }
    }

    /// Returns whether `task` belongs to this filter's subset.
    pub fn matches(self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Active => !task.completed,
            Self::Completed => task.completed,
        }
    }

    pub fn all() -> [Filter; 3] {
        [Self::All, Self::Active, Self::Completed]
    }
}

/// Parses one filter from its host string value.
pub fn parse_filter(value: &str) -> Result<Filter, FilterParseError> {
    match value.trim() {
        "" => Err(FilterParseError::Empty),
        FILTER_ALL => Ok(Filter::All),
        FILTER_ACTIVE => Ok(Filter::Active),
        FILTER_COMPLETED => Ok(Filter::Completed),
        other => Err(FilterParseError::Unsupported(other.to_string())),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterParseError {
    Empty,
    Unsupported(String),
}

impl Display for FilterParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "filter value must not be empty"),
            Self::Unsupported(value) => {
                write!(f, "unsupported filter `{value}`; expected all|active|completed")
            }
        }
    }
}

impl Error for FilterParseError {}

#[cfg(test)]
mod tests {
    use super::{parse_filter, Filter, FilterParseError};

    #[test]
    fn parses_all_supported_filters() {
        for filter in Filter::all() {
            assert_eq!(parse_filter(filter.as_str()).expect("parse"), filter);
        }
        assert_eq!(parse_filter(" active ").expect("trimmed"), Filter::Active);
    }

    #[test]
    fn rejects_empty_and_unknown_values() {
        assert_eq!(parse_filter("  "), Err(FilterParseError::Empty));
        assert!(matches!(
            parse_filter("done"),
            Err(FilterParseError::Unsupported(value)) if value == "done"
        ));
    }

    #[test]
    fn default_filter_is_all() {
        assert_eq!(Filter::default(), Filter::All);
    }
}
