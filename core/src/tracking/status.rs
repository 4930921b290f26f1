use crate::geo::distance_km;
use crate::prelude::{Destination, ARRIVAL_THRESHOLD_KM};
use crate::tracking::track::Track;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Current travel state of one entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Status {
    Travelling { distance_remaining_km: f64 },
    Arrived { arrived_at: DateTime<Utc> },
}

impl Status {
    pub fn is_arrived(&self) -> bool {
        matches!(self, Status::Arrived { .. })
    }

    pub fn distance_remaining_km(&self) -> Option<f64> {
        match self {
            Status::Travelling {
                distance_remaining_km,
            } => Some(*distance_remaining_km),
            Status::Arrived { .. } => None,
        }
    }

    pub fn arrived_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Status::Arrived { arrived_at } => Some(*arrived_at),
            Status::Travelling { .. } => None,
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Travelling {
                distance_remaining_km,
            } => write!(f, "{:.1} km to go", distance_remaining_km),
            Status::Arrived { arrived_at } => {
                write!(f, "arrived {}", arrived_at.format("%Y-%m-%d %H:%M:%S"))
            }
        }
    }
}

/// Derives the status of a track against the destination.
///
/// Arrival is a one-way milestone: the earliest report strictly inside the
/// threshold wins, even if later reports drift away again. Otherwise the
/// remaining distance is taken from the latest report, never the minimum.
pub fn project_status(track: &Track, destination: &Destination) -> Status {
    let arrival = track
        .reports()
        .iter()
        .find(|report| distance_km(&report.position, &destination.position) < ARRIVAL_THRESHOLD_KM);

    match arrival {
        Some(report) => Status::Arrived {
            arrived_at: report.reported_at,
        },
        None => Status::Travelling {
            distance_remaining_km: distance_km(&track.latest().position, &destination.position),
        },
    }
}
