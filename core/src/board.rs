//! One full refresh cycle: build, project, rank, reconcile.

use crate::directory::TeamDirectory;
use crate::geo::Position;
use crate::prelude::{Destination, GroupBy};
use crate::report::RawReport;
use crate::selection::SelectionStore;
use crate::telemetry::log::LogManager;
use crate::tracking::{build_tracks, project_status, rank, Status};
use serde::Serialize;
use std::collections::BTreeMap;

/// Everything the rendering side needs for one entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoardEntry {
    /// 1-based display position.
    pub rank: usize,
    pub key: String,
    pub display_label: String,
    pub color_seed: String,
    pub status: Status,
    pub path: Vec<Position>,
    pub latest: RawReport,
    pub visible: bool,
}

/// Ranked output of a refresh cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Board {
    pub group_by: GroupBy,
    pub destination: Destination,
    pub entries: Vec<BoardEntry>,
    pub travelling: usize,
    pub arrived: usize,
}

impl Board {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn visible(&self) -> impl Iterator<Item = &BoardEntry> {
        self.entries.iter().filter(|entry| entry.visible)
    }

    pub fn entry(&self, key: &str) -> Option<&BoardEntry> {
        self.entries.iter().find(|entry| entry.key == key)
    }

    /// Reapplies the store's flags without recomputing the cycle, for
    /// toggles between polls.
    pub fn apply_selection(&mut self, selection: &SelectionStore) {
        for entry in &mut self.entries {
            entry.visible = selection.is_visible(self.group_by, &entry.key);
        }
    }
}

/// Recomputes the board from scratch for the current poll result.
pub fn refresh(
    reports: &[RawReport],
    group_by: GroupBy,
    destination: &Destination,
    directory: &TeamDirectory,
    selection: &mut SelectionStore,
) -> Board {
    let logger = LogManager::new();

    let mut tracks = build_tracks(reports, group_by);
    let mut statuses: BTreeMap<String, Status> = tracks
        .iter()
        .map(|(key, track)| (key.clone(), project_status(track, destination)))
        .collect();
    let ranked = rank(statuses.iter().map(|(key, status)| (key.clone(), *status)));
    let flags = selection.reconcile(group_by, ranked.iter());

    let mut entries = Vec::with_capacity(ranked.len());
    for (index, key) in ranked.into_iter().enumerate() {
        let Some(track) = tracks.remove(&key) else {
            continue;
        };
        let Some(status) = statuses.remove(&key) else {
            continue;
        };
        logger.record_detail(&format!("{}. {} {}", index + 1, key, status));
        entries.push(BoardEntry {
            rank: index + 1,
            display_label: directory.display_label(&key, group_by),
            color_seed: key.clone(),
            status,
            path: track.path(),
            latest: track.latest().clone(),
            visible: flags.get(&key).copied().unwrap_or(true),
            key,
        });
    }

    let arrived = entries.iter().filter(|entry| entry.status.is_arrived()).count();
    let travelling = entries.len() - arrived;
    logger.record_cycle(group_by, travelling, arrived);

    Board {
        group_by,
        destination: destination.clone(),
        entries,
        travelling,
        arrived,
    }
}
