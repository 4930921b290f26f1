use crate::geo::Position;
use crate::prelude::{CoreResult, GroupBy, ReportError};
use crate::report::wire::WireReport;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Validated positional report. Immutable once accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawReport {
    pub entity_id: String,
    pub team_id: String,
    pub position: Position,
    pub battery_level: Option<f64>,
    pub velocity_kmh: Option<f64>,
    pub reported_at: DateTime<Utc>,
}

impl RawReport {
    pub fn new(
        entity_id: impl Into<String>,
        team_id: impl Into<String>,
        position: Position,
        reported_at: DateTime<Utc>,
    ) -> Self {
        Self {
            entity_id: entity_id.into(),
            team_id: team_id.into(),
            position,
            battery_level: None,
            velocity_kmh: None,
            reported_at,
        }
    }

    /// Key under which this report is grouped for the given mode.
    pub fn group_key(&self, group_by: GroupBy) -> &str {
        match group_by {
            GroupBy::Team => &self.team_id,
            GroupBy::Individual => &self.entity_id,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl TryFrom<WireReport> for RawReport {
    type Error = ReportError;

    fn try_from(wire: WireReport) -> CoreResult<Self> {
        let entity_id = non_empty(wire.user).ok_or(ReportError::MissingField("user"))?;
        let latitude = wire.latitude.ok_or(ReportError::MissingField("latitude"))?;
        let longitude = wire
            .longitude
            .ok_or(ReportError::MissingField("longitude"))?;
        let timestamp = wire
            .timestamp
            .ok_or(ReportError::MissingField("timestamp"))?;

        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(ReportError::NonFiniteCoordinate {
                latitude,
                longitude,
            });
        }
        if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
            return Err(ReportError::CoordinateOutOfRange {
                latitude,
                longitude,
            });
        }

        let reported_at = timestamp
            .checked_mul(1000)
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .ok_or(ReportError::InvalidTimestamp(timestamp))?;

        // Reporters without a team form a team of one.
        let team_id = non_empty(wire.team).unwrap_or_else(|| entity_id.clone());

        Ok(Self {
            entity_id,
            team_id,
            position: Position::new(latitude, longitude),
            battery_level: wire.battery,
            velocity_kmh: wire.velocity,
            reported_at,
        })
    }
}
