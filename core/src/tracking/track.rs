use crate::geo::Position;
use crate::prelude::GroupBy;
use crate::report::RawReport;
use serde::Serialize;
use std::collections::BTreeMap;

/// Time-ordered reports sharing one grouping key. Never empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Track {
    key: String,
    reports: Vec<RawReport>,
}

impl Track {
    /// Builds a track, ordering reports by `reported_at`. Equal timestamps
    /// keep their input order. Returns `None` for an empty list.
    pub fn new(key: impl Into<String>, mut reports: Vec<RawReport>) -> Option<Self> {
        if reports.is_empty() {
            return None;
        }
        reports.sort_by_key(|report| report.reported_at);
        Some(Self {
            key: key.into(),
            reports,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn reports(&self) -> &[RawReport] {
        &self.reports
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn first(&self) -> &RawReport {
        &self.reports[0]
    }

    /// Most recent known position.
    pub fn latest(&self) -> &RawReport {
        &self.reports[self.reports.len() - 1]
    }

    /// Positions in chronological order, for path drawing.
    pub fn path(&self) -> Vec<Position> {
        self.reports.iter().map(|report| report.position).collect()
    }
}

/// Partitions reports by grouping key and orders each partition in time.
pub fn build_tracks(reports: &[RawReport], group_by: GroupBy) -> BTreeMap<String, Track> {
    let mut partitions: BTreeMap<String, Vec<RawReport>> = BTreeMap::new();
    for report in reports {
        partitions
            .entry(report.group_key(group_by).to_string())
            .or_default()
            .push(report.clone());
    }

    partitions
        .into_iter()
        .filter_map(|(key, reports)| Track::new(key.clone(), reports).map(|track| (key, track)))
        .collect()
}
