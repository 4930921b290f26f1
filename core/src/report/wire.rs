use crate::report::record::RawReport;
use serde::{Deserialize, Serialize};

/// One element of the JSON array returned by the poll source.
///
/// Every field is optional so a single malformed element can be rejected
/// without discarding the rest of the batch. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WireReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub battery: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub velocity: Option<f64>,
    /// Epoch seconds.
    #[serde(default)]
    pub timestamp: Option<i64>,
}

impl From<&RawReport> for WireReport {
    fn from(report: &RawReport) -> Self {
        Self {
            team: Some(report.team_id.clone()),
            user: Some(report.entity_id.clone()),
            latitude: Some(report.position.latitude),
            longitude: Some(report.position.longitude),
            battery: report.battery_level,
            velocity: report.velocity_kmh,
            timestamp: Some(report.reported_at.timestamp()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relay_bookkeeping_fields_are_ignored() {
        let json = r#"{
            "id": 7, "pid": 31, "user": "u1", "team": "t1",
            "latitude": 52.0, "longitude": 7.0, "battery": 81,
            "velocity": 12, "timestamp": 100
        }"#;
        let wire: WireReport = serde_json::from_str(json).unwrap();
        assert_eq!(wire.user.as_deref(), Some("u1"));
        assert_eq!(wire.battery, Some(81.0));
        assert_eq!(wire.timestamp, Some(100));
    }

    #[test]
    fn absent_fields_deserialize_as_none() {
        let wire: WireReport = serde_json::from_str(r#"{"user": "u1"}"#).unwrap();
        assert!(wire.team.is_none());
        assert!(wire.latitude.is_none());
        assert!(wire.timestamp.is_none());
    }
}
