use chrono::Local;
use iced::{
    time,
    widget::{button, column, row, scrollable, text, Canvas, Column, Container},
    Alignment, Element, Length, Subscription, Task, Theme,
};
use log::{info, warn};
use map::TrackMap;
use palette::color_for;
use std::time::Duration;
use trackcore::directory::TeamDirectory;
use trackcore::report::{ingest_json, IngestOutcome, RawReport};
use trackcore::selection::SelectionStore;
use trackcore::telemetry::MetricsRecorder;
use trackcore::{refresh, Board, Destination, GroupBy};

mod map;
mod palette;

const DEFAULT_RELAY_URL: &str = "http://127.0.0.1:1323";
const POLL_INTERVAL: Duration = Duration::from_secs(10);

fn main() -> iced::Result {
    env_logger::init();
    iced::application(Dashboard::boot, Dashboard::update, Dashboard::view)
        .title(application_title)
        .subscription(application_subscription)
        .theme(application_theme)
        .run()
}

fn application_title(state: &Dashboard) -> String {
    format!("Trackboard - {}", state.destination.name)
}

fn application_subscription(_: &Dashboard) -> Subscription<Message> {
    time::every(POLL_INTERVAL).map(|_| Message::Tick)
}

fn application_theme(_: &Dashboard) -> Theme {
    Theme::Dark
}

/// Parses `lat,lon` or `name,lat,lon`.
fn parse_destination(value: &str) -> Option<Destination> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    match parts.as_slice() {
        [lat, lon] => Some(Destination::new(
            Destination::default().name,
            lat.parse().ok()?,
            lon.parse().ok()?,
        )),
        [name, lat, lon] => Some(Destination::new(*name, lat.parse().ok()?, lon.parse().ok()?)),
        _ => None,
    }
}

fn relay_url() -> String {
    std::env::var("TRACKBOARD_URL")
        .map(|url| url.trim_end_matches('/').to_string())
        .unwrap_or_else(|_| DEFAULT_RELAY_URL.into())
}

fn destination_from_env() -> Destination {
    match std::env::var("TRACKBOARD_DESTINATION") {
        Ok(value) => parse_destination(&value).unwrap_or_else(|| {
            warn!("ignoring malformed TRACKBOARD_DESTINATION {:?}", value);
            Destination::default()
        }),
        Err(_) => Destination::default(),
    }
}

struct Dashboard {
    relay_url: String,
    destination: Destination,
    group_by: GroupBy,
    reports: Vec<RawReport>,
    directory: TeamDirectory,
    teams_loaded: bool,
    selection: SelectionStore,
    board: Board,
    metrics: MetricsRecorder,
    status: String,
    history: Vec<String>,
}

#[derive(Debug, Clone)]
enum Message {
    Tick,
    TracksFetched(Result<IngestOutcome, String>),
    TeamsFetched(Result<TeamDirectory, String>),
    ToggleGrouping,
    ToggleEntity(String),
    ShowAll,
    HideAll,
}

impl Dashboard {
    fn new(relay_url: String, destination: Destination) -> Self {
        Dashboard {
            relay_url,
            board: Board {
                destination: destination.clone(),
                ..Board::default()
            },
            destination,
            group_by: GroupBy::Team,
            reports: Vec::new(),
            directory: TeamDirectory::new(),
            teams_loaded: false,
            selection: SelectionStore::new(),
            metrics: MetricsRecorder::new(),
            status: "Waiting for first poll...".into(),
            history: Vec::new(),
        }
    }

    fn boot() -> (Self, Task<Message>) {
        let state = Dashboard::new(relay_url(), destination_from_env());
        info!("polling {} every {:?}", state.relay_url, POLL_INTERVAL);
        let tasks = Task::batch([
            Task::perform(fetch_tracks(state.relay_url.clone()), Message::TracksFetched),
            Task::perform(fetch_teams(state.relay_url.clone()), Message::TeamsFetched),
        ]);
        (state, tasks)
    }

    fn update(state: &mut Self, message: Message) -> Task<Message> {
        match message {
            Message::Tick => {
                let poll = Task::perform(fetch_tracks(state.relay_url.clone()), Message::TracksFetched);
                if state.teams_loaded {
                    poll
                } else {
                    Task::batch([
                        poll,
                        Task::perform(fetch_teams(state.relay_url.clone()), Message::TeamsFetched),
                    ])
                }
            }
            Message::TracksFetched(Ok(outcome)) => {
                // Every poll returns the full history, so these are gauges.
                state
                    .metrics
                    .record_batch(outcome.reports.len(), outcome.rejected.len());
                state.reports = outcome.reports;
                state.recompute();
                state.status = format!(
                    "Updated {}: {} reports, {} travelling, {} arrived",
                    Local::now().format("%H:%M:%S"),
                    state.reports.len(),
                    state.board.travelling,
                    state.board.arrived
                );
                if !outcome.rejected.is_empty() {
                    state.push_history(format!(
                        "Dropped {} malformed reports",
                        outcome.rejected.len()
                    ));
                }
                Task::none()
            }
            Message::TracksFetched(Err(err)) => {
                // Keep the previous board on screen until a poll succeeds.
                warn!("poll failed: {}", err);
                state.status = format!("Poll failed, showing last data: {err}");
                Task::none()
            }
            Message::TeamsFetched(Ok(directory)) => {
                state.push_history(format!("Loaded {} team names", directory.len()));
                state.directory = directory;
                state.teams_loaded = true;
                state.recompute();
                Task::none()
            }
            Message::TeamsFetched(Err(err)) => {
                warn!("team lookup failed: {}", err);
                Task::none()
            }
            Message::ToggleGrouping => {
                state.group_by = state.group_by.toggled();
                state.push_history(format!("Grouping by {}", state.group_by));
                state.recompute();
                Task::none()
            }
            Message::ToggleEntity(key) => {
                state.selection.toggle(state.group_by, &key);
                state.board.apply_selection(&state.selection);
                Task::none()
            }
            Message::ShowAll => {
                state.selection.set_all(state.group_by, true);
                state.board.apply_selection(&state.selection);
                Task::none()
            }
            Message::HideAll => {
                state.selection.set_all(state.group_by, false);
                state.board.apply_selection(&state.selection);
                Task::none()
            }
        }
    }

    fn view(state: &Self) -> Element<'_, Message> {
        let grouping_label = match state.group_by {
            GroupBy::Team => "Show individuals",
            GroupBy::Individual => "Show teams",
        };

        let controls = row![
            button(grouping_label)
                .on_press(Message::ToggleGrouping)
                .padding(8),
            button("All").on_press(Message::ShowAll).padding(8),
            button("None").on_press(Message::HideAll).padding(8),
        ]
        .spacing(8);

        let entries = if state.board.is_empty() {
            Column::new().push(text("No positions yet").size(14))
        } else {
            state
                .board
                .entries
                .iter()
                .fold(Column::new().spacing(6), |col, entry| {
                    let marker = if entry.visible { "[x]" } else { "[ ]" };
                    let battery = entry
                        .latest
                        .battery_level
                        .map(|level| format!("{:.0}%", level))
                        .unwrap_or_else(|| "n/a".into());
                    col.push(
                        row![
                            button(text(marker).size(12))
                                .on_press(Message::ToggleEntity(entry.key.clone()))
                                .padding(4),
                            column![
                                text(format!("{}. {}", entry.rank, entry.display_label))
                                    .size(16)
                                    .color(color_for(&entry.color_seed)),
                                text(format!("{} | battery {}", entry.status, battery)).size(12),
                            ]
                            .spacing(2),
                        ]
                        .spacing(8)
                        .align_y(Alignment::Center),
                    )
                })
        };

        let history_list = if state.history.is_empty() {
            Column::new().push(text("No activity yet").size(12))
        } else {
            state
                .history
                .iter()
                .rev()
                .fold(Column::new().spacing(4), |col, entry| {
                    col.push(text(entry.clone()).size(12))
                })
        };

        let (cycles, accepted, rejected) = {
            let snapshot = state.metrics.snapshot();
            (snapshot.cycles, snapshot.last_accepted, snapshot.last_rejected)
        };

        let list_column = column![
            text("Leaderboard").size(26),
            text(format!(
                "{} | grouped by {}",
                state.destination.name, state.group_by
            ))
            .size(14),
            controls,
            text(&state.status).size(12),
            Container::new(scrollable(entries).height(Length::Fill)).padding(6),
            text(format!(
                "polls {} | last poll: accepted {} | rejected {}",
                cycles, accepted, rejected
            ))
            .size(11),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fixed(380.0));

        let map_canvas = Canvas::new(TrackMap::new(state.board.visible(), &state.destination))
            .width(Length::Fill)
            .height(Length::Fill);

        let map_column = column![
            map_canvas,
            text("Activity log").size(16),
            Container::new(scrollable(history_list).height(Length::Fixed(90.0))).padding(6),
        ]
        .spacing(10)
        .padding(16)
        .width(Length::Fill);

        let layout = row![list_column, map_column]
            .spacing(20)
            .align_y(Alignment::Start)
            .padding(20);

        Container::new(layout)
            .width(Length::Fill)
            .height(Length::Fill)
            .into()
    }

    /// Runs the full cycle over the cached reports for the current mode.
    fn recompute(&mut self) {
        self.board = refresh(
            &self.reports,
            self.group_by,
            &self.destination,
            &self.directory,
            &mut self.selection,
        );
    }

    fn push_history(&mut self, entry: String) {
        self.history.push(entry);
        if self.history.len() > 20 {
            self.history.remove(0);
        }
    }
}

async fn fetch_tracks(base: String) -> Result<IngestOutcome, String> {
    let response = reqwest::get(format!("{}/tracks", base))
        .await
        .map_err(|e| e.to_string())?;
    if !response.status().is_success() {
        return Err(format!("HTTP {}", response.status()));
    }
    let body = response.text().await.map_err(|e| e.to_string())?;
    ingest_json(&body).map_err(|e| e.to_string())
}

async fn fetch_teams(base: String) -> Result<TeamDirectory, String> {
    let response = reqwest::get(format!("{}/teams", base))
        .await
        .map_err(|e| e.to_string())?;
    if !response.status().is_success() {
        return Err(format!("HTTP {}", response.status()));
    }
    response
        .json::<TeamDirectory>()
        .await
        .map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use trackcore::geo::Position;
    use trackcore::ReportError;

    const DEST_LAT: f64 = 51.4468853;
    const DEST_LON: f64 = 5.4848275;

    fn report(user: &str, team: &str, lat: f64, seconds: i64) -> RawReport {
        let at = chrono::DateTime::<chrono::Utc>::from_timestamp(seconds, 0).unwrap();
        RawReport::new(user, team, Position::new(lat, DEST_LON), at)
    }

    fn poll(reports: Vec<RawReport>) -> Message {
        Message::TracksFetched(Ok(IngestOutcome {
            reports,
            rejected: Vec::new(),
        }))
    }

    fn first_poll() -> Vec<RawReport> {
        vec![
            report("alice", "t1", DEST_LAT + 0.05, 100),
            report("bob", "t1", DEST_LAT + 0.2, 110),
            report("carol", "t2", DEST_LAT, 120),
        ]
    }

    fn dashboard() -> Dashboard {
        Dashboard::new(DEFAULT_RELAY_URL.into(), Destination::default())
    }

    fn keys(state: &Dashboard) -> Vec<String> {
        state.board.entries.iter().map(|e| e.key.clone()).collect()
    }

    #[test]
    fn failed_poll_keeps_previous_board_and_reports() {
        let mut state = dashboard();
        let _ = Dashboard::update(&mut state, poll(first_poll()));
        let board = state.board.clone();
        let reports = state.reports.clone();
        assert_eq!(keys(&state), vec!["t1", "t2"]);

        let _ = Dashboard::update(
            &mut state,
            Message::TracksFetched(Err("connection refused".into())),
        );
        assert_eq!(state.board, board);
        assert_eq!(state.reports, reports);
        assert!(state.status.contains("connection refused"));
    }

    #[test]
    fn hidden_entity_stays_hidden_after_next_poll() {
        let mut state = dashboard();
        let _ = Dashboard::update(&mut state, poll(first_poll()));
        let _ = Dashboard::update(&mut state, Message::ToggleEntity("t1".into()));
        assert!(!state.board.entry("t1").unwrap().visible);

        let mut next = first_poll();
        next.push(report("dave", "t3", DEST_LAT + 0.3, 130));
        let _ = Dashboard::update(&mut state, poll(next));
        assert!(!state.board.entry("t1").unwrap().visible);
        assert!(state.board.entry("t2").unwrap().visible);
        assert!(state.board.entry("t3").unwrap().visible);
    }

    #[test]
    fn grouping_toggle_recomputes_from_cached_reports() {
        let mut state = dashboard();
        let _ = Dashboard::update(&mut state, poll(first_poll()));
        assert_eq!(keys(&state), vec!["t1", "t2"]);

        let _ = Dashboard::update(&mut state, Message::ToggleGrouping);
        assert_eq!(state.group_by, GroupBy::Individual);
        assert_eq!(keys(&state), vec!["alice", "bob", "carol"]);

        let _ = Dashboard::update(&mut state, Message::ToggleGrouping);
        assert_eq!(keys(&state), vec!["t1", "t2"]);
    }

    #[test]
    fn hide_all_then_show_all() {
        let mut state = dashboard();
        let _ = Dashboard::update(&mut state, poll(first_poll()));
        let _ = Dashboard::update(&mut state, Message::HideAll);
        assert_eq!(state.board.visible().count(), 0);
        let _ = Dashboard::update(&mut state, Message::ShowAll);
        assert_eq!(state.board.visible().count(), 2);
    }

    #[test]
    fn poll_gauges_reflect_only_the_latest_batch() {
        let mut state = dashboard();
        let rejected = Message::TracksFetched(Ok(IngestOutcome {
            reports: first_poll(),
            rejected: vec![(3, ReportError::MissingField("user"))],
        }));
        let _ = Dashboard::update(&mut state, rejected);
        let _ = Dashboard::update(&mut state, poll(first_poll()));
        let snapshot = state.metrics.snapshot();
        assert_eq!(snapshot.cycles, 2);
        assert_eq!(snapshot.last_accepted, 3);
        assert_eq!(snapshot.last_rejected, 0);
    }

    #[test]
    fn destination_parses_pair_and_triple() {
        let pair = parse_destination("51.5, 5.5").unwrap();
        assert_eq!(pair.position.latitude, 51.5);
        assert_eq!(pair.name, Destination::default().name);

        let triple = parse_destination("Campus,51.4,5.4").unwrap();
        assert_eq!(triple.name, "Campus");
        assert_eq!(triple.position.longitude, 5.4);
    }

    #[test]
    fn malformed_destination_is_rejected() {
        assert!(parse_destination("north").is_none());
        assert!(parse_destination("a,b").is_none());
    }
}
