use crate::workflow::config::RelayConfig;
use anyhow::Context;
use std::fs;
use std::path::Path;
use trackcore::directory::TeamDirectory;
use trackcore::report::{ingest_json, IngestOutcome, RawReport};
use trackcore::selection::SelectionStore;
use trackcore::{refresh, Board, GroupBy};

/// Board plus what was dropped on the way in.
pub struct RunResult {
    pub board: Board,
    pub rejected: usize,
}

/// Runs refresh cycles against the configured destination and team labels.
#[derive(Clone)]
pub struct Runner {
    config: RelayConfig,
    directory: TeamDirectory,
}

impl Runner {
    pub fn new(config: RelayConfig) -> Self {
        let directory = config.directory();
        Self { config, directory }
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    pub fn directory(&self) -> &TeamDirectory {
        &self.directory
    }

    /// A stateless cycle: no session, so every entity is visible.
    pub fn execute(&self, reports: &[RawReport], group_by: GroupBy) -> Board {
        let mut selection = SelectionStore::new();
        refresh(
            reports,
            group_by,
            &self.config.destination,
            &self.directory,
            &mut selection,
        )
    }

    pub fn execute_outcome(&self, outcome: &IngestOutcome, group_by: GroupBy) -> RunResult {
        RunResult {
            board: self.execute(&outcome.reports, group_by),
            rejected: outcome.rejected.len(),
        }
    }

    /// Ranks a saved poll-source body.
    pub fn execute_file<P: AsRef<Path>>(&self, path: P, group_by: GroupBy) -> anyhow::Result<RunResult> {
        let path_ref = path.as_ref();
        let body = fs::read_to_string(path_ref)
            .with_context(|| format!("reading reports {}", path_ref.display()))?;
        let outcome = ingest_json(&body)
            .with_context(|| format!("parsing reports {}", path_ref.display()))?;
        Ok(self.execute_outcome(&outcome, group_by))
    }
}

/// Renders a board as a plain-text table.
pub fn format_board(board: &Board) -> String {
    let mut out = format!(
        "{} ({}): {} travelling, {} arrived\n",
        board.destination.name, board.group_by, board.travelling, board.arrived
    );
    for entry in &board.entries {
        let battery = entry
            .latest
            .battery_level
            .map(|level| format!("{:.0}%", level))
            .unwrap_or_else(|| "n/a".into());
        out.push_str(&format!(
            "{:>3}. {:<24} {:<36} battery {}\n",
            entry.rank, entry.display_label, entry.status, battery
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BODY: &str = r#"[
        {"user": "u1", "team": "t1", "latitude": 52.0, "longitude": 7.0, "battery": 80, "timestamp": 100},
        {"user": "u1", "team": "t1", "latitude": 51.4468853, "longitude": 5.4848275, "battery": 79, "timestamp": 200},
        {"user": "u2", "team": "t2", "latitude": 51.50, "longitude": 5.4848275, "battery": 55, "timestamp": 210},
        {"user": "u3", "latitude": 200.0, "longitude": 5.0, "timestamp": 210}
    ]"#;

    fn runner() -> Runner {
        let mut config = RelayConfig::default();
        config.teams.insert(
            "t1".into(),
            crate::workflow::config::TeamConfig {
                name: "Red Rovers".into(),
                members: vec!["u1".into()],
            },
        );
        Runner::new(config)
    }

    #[test]
    fn runner_ranks_saved_poll_body() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(BODY.as_bytes()).unwrap();
        let path = temp.into_temp_path();

        let result = runner().execute_file(&path, GroupBy::Team).unwrap();
        assert_eq!(result.rejected, 1);
        let keys: Vec<_> = result.board.entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["t2", "t1"]);
        assert_eq!(result.board.entries[1].display_label, "Red Rovers");
    }

    #[test]
    fn format_board_lists_every_entry() {
        let outcome = ingest_json(BODY).unwrap();
        let result = runner().execute_outcome(&outcome, GroupBy::Individual);
        let text = format_board(&result.board);
        assert!(text.starts_with("Finish (individual): 1 travelling, 1 arrived"));
        assert!(text.contains("  1. u2"));
        assert!(text.contains("  2. u1"));
        assert!(text.contains("battery 79%"));
    }

    #[test]
    fn missing_file_reports_context() {
        let err = runner()
            .execute_file("/nonexistent/reports.json", GroupBy::Team)
            .err()
            .unwrap();
        assert!(err.to_string().contains("reading reports"));
    }
}
