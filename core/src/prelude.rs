use crate::geo::Position;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Distance below which a report counts as having reached the destination.
pub const ARRIVAL_THRESHOLD_KM: f64 = 1.0;

/// Fixed finish coordinate every entity is ranked against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub name: String,
    pub position: Position,
}

impl Destination {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            position: Position::new(latitude, longitude),
        }
    }
}

impl Default for Destination {
    fn default() -> Self {
        Self::new("Finish", 51.4468853, 5.4848275)
    }
}

/// Whether entities are aggregated per team or per individual reporter.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    #[default]
    Team,
    Individual,
}

impl GroupBy {
    pub fn toggled(self) -> Self {
        match self {
            GroupBy::Team => GroupBy::Individual,
            GroupBy::Individual => GroupBy::Team,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GroupBy::Team => "team",
            GroupBy::Individual => "individual",
        }
    }
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupBy {
    type Err = ReportError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "team" | "teams" => Ok(GroupBy::Team),
            "individual" | "user" | "users" => Ok(GroupBy::Individual),
            other => Err(ReportError::UnknownGrouping(other.to_string())),
        }
    }
}

/// Rejection reasons raised at the poll-source boundary.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ReportError {
    #[error("missing field: {0}")]
    MissingField(&'static str),
    #[error("non-finite coordinate ({latitude}, {longitude})")]
    NonFiniteCoordinate { latitude: f64, longitude: f64 },
    #[error("coordinate out of range ({latitude}, {longitude})")]
    CoordinateOutOfRange { latitude: f64, longitude: f64 },
    #[error("timestamp {0} is not a valid instant")]
    InvalidTimestamp(i64),
    #[error("malformed report: {0}")]
    Malformed(String),
    #[error("unknown grouping mode: {0}")]
    UnknownGrouping(String),
}

pub type CoreResult<T> = Result<T, ReportError>;
