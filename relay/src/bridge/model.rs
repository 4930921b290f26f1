use serde::{Deserialize, Serialize};
use trackcore::report::WireReport;

/// Body posted by an OwnTracks client in HTTP mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OwnTracksMessage {
    #[serde(rename = "_type")]
    pub kind: String,
    #[serde(default)]
    pub batt: Option<i64>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lon: Option<f64>,
    #[serde(default)]
    pub tst: Option<i64>,
    #[serde(default)]
    pub vel: Option<i64>,
}

impl OwnTracksMessage {
    pub fn location(lat: f64, lon: f64, tst: i64) -> Self {
        Self {
            kind: "location".into(),
            batt: None,
            lat: Some(lat),
            lon: Some(lon),
            tst: Some(tst),
            vel: None,
        }
    }

    pub fn is_location(&self) -> bool {
        self.kind == "location"
    }

    /// Poll-source view of this message as it will be served from `/tracks`.
    pub fn to_wire(&self, user: &str, team: &str) -> WireReport {
        WireReport {
            team: Some(team.to_string()),
            user: Some(user.to_string()),
            latitude: self.lat,
            longitude: self.lon,
            battery: self.batt.map(|b| b as f64),
            velocity: self.vel.map(|v| v as f64),
            timestamp: self.tst,
        }
    }
}

/// A stored location, served verbatim as one element of `GET /tracks`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationPoint {
    pub id: u64,
    pub team: String,
    pub user: String,
    pub latitude: f64,
    pub longitude: f64,
    pub battery: Option<i64>,
    pub velocity: Option<i64>,
    pub timestamp: i64,
}

impl From<&LocationPoint> for WireReport {
    fn from(point: &LocationPoint) -> Self {
        WireReport {
            team: Some(point.team.clone()),
            user: Some(point.user.clone()),
            latitude: Some(point.latitude),
            longitude: Some(point.longitude),
            battery: point.battery.map(|b| b as f64),
            velocity: point.velocity.map(|v| v as f64),
            timestamp: Some(point.timestamp),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owntracks_payload_parses() {
        let msg: OwnTracksMessage = serde_json::from_str(
            r#"{"_type":"location","batt":77,"lat":51.44,"lon":5.48,"tst":1700000000,"vel":4,"acc":12}"#,
        )
        .unwrap();
        assert!(msg.is_location());
        assert_eq!(msg.batt, Some(77));
        assert_eq!(msg.tst, Some(1_700_000_000));
    }

    #[test]
    fn non_location_messages_are_recognised() {
        let msg: OwnTracksMessage =
            serde_json::from_str(r#"{"_type":"transition","event":"enter"}"#).unwrap();
        assert!(!msg.is_location());
        assert!(msg.lat.is_none());
    }

    #[test]
    fn message_wire_view_matches_stored_point() {
        let mut msg = OwnTracksMessage::location(52.0, 7.0, 100);
        msg.batt = Some(50);
        let point = LocationPoint {
            id: 1,
            team: "t1".into(),
            user: "u1".into(),
            latitude: 52.0,
            longitude: 7.0,
            battery: Some(50),
            velocity: None,
            timestamp: 100,
        };
        assert_eq!(msg.to_wire("u1", "t1"), WireReport::from(&point));
    }

    #[test]
    fn location_point_serializes_in_poll_shape() {
        let point = LocationPoint {
            id: 1,
            team: "t1".into(),
            user: "u1".into(),
            latitude: 52.0,
            longitude: 7.0,
            battery: Some(50),
            velocity: None,
            timestamp: 100,
        };
        let wire: WireReport = serde_json::from_value(serde_json::to_value(&point).unwrap()).unwrap();
        assert_eq!(wire, WireReport::from(&point));
    }
}
