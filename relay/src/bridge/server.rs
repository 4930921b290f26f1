use crate::bridge::model::{LocationPoint, OwnTracksMessage};
use crate::bridge::store::{InsertOutcome, LocationStore};
use crate::workflow::runner::Runner;
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::{net::SocketAddr, sync::Arc, thread};
use tokio::runtime::Builder;
use trackcore::telemetry::{MetricsRecorder, MetricsSnapshot};
use trackcore::report::RawReport;
use trackcore::GroupBy;
use warp::{http::StatusCode, Filter, Rejection, Reply};

/// Shared state behind every route.
pub struct RelayState {
    pub runner: Runner,
    pub store: LocationStore,
    pub metrics: MetricsRecorder,
}

impl RelayState {
    pub fn new(runner: Runner) -> Self {
        Self {
            runner,
            store: LocationStore::new(),
            metrics: MetricsRecorder::new(),
        }
    }

    /// Accepts one device message, resolving the user's team from config.
    pub fn accept(&self, user: &str, message: &OwnTracksMessage) -> InsertOutcome {
        let team = self.runner.config().team_of(user).to_string();
        self.accept_as(user, &team, message)
    }

    /// Stores a message under an explicit team. Each stored point is
    /// validated and counted exactly once, here.
    pub fn accept_as(&self, user: &str, team: &str, message: &OwnTracksMessage) -> InsertOutcome {
        let outcome = self.store.insert(user, team, message);
        match outcome {
            InsertOutcome::Stored(id) => match RawReport::try_from(message.to_wire(user, team)) {
                Ok(_) => {
                    self.metrics.record_accepted(1);
                    debug!("stored #{} for {} ({})", id, user, team);
                }
                Err(err) => {
                    self.metrics.record_rejected(1);
                    warn!("stored #{} for {} will be dropped by pollers: {}", id, user, err);
                }
            },
            InsertOutcome::Duplicate => self.metrics.record_duplicate(),
            InsertOutcome::Ignored => debug!("ignored {} message from {}", message.kind, user),
        }
        outcome
    }
}

#[derive(Debug, Deserialize)]
struct BoardQuery {
    group: Option<String>,
}

#[derive(Debug, Serialize)]
struct StatusReply {
    points: usize,
    metrics: MetricsSnapshot,
}

fn with_state(
    state: Arc<RelayState>,
) -> impl Filter<Extract = (Arc<RelayState>,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || state.clone())
}

/// Every relay route, mounted at the root.
pub fn routes(
    state: Arc<RelayState>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let ingest_route = warp::path!("owntracks" / String / String)
        .and(warp::post())
        .and(warp::body::json())
        .and(with_state(state.clone()))
        .map(
            |user: String, device: String, message: OwnTracksMessage, state: Arc<RelayState>| {
                let outcome = state.accept(&user, &message);
                if let InsertOutcome::Stored(_) = outcome {
                    info!(
                        "{}/{}: lat {:?} lon {:?} batt {:?}",
                        user, device, message.lat, message.lon, message.batt
                    );
                }
                // OwnTracks expects a JSON array of commands in reply.
                warp::reply::json(&json!([]))
            },
        );

    let tracks_route = warp::path("tracks")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state(state.clone()))
        .map(|state: Arc<RelayState>| {
            let points: Vec<LocationPoint> = state.store.snapshot();
            warp::reply::json(&points)
        });

    let teams_route = warp::path("teams")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state(state.clone()))
        .map(|state: Arc<RelayState>| warp::reply::json(state.runner.directory()));

    let board_route = warp::path("board")
        .and(warp::path::end())
        .and(warp::get())
        .and(warp::query::<BoardQuery>())
        .and(with_state(state.clone()))
        .map(|query: BoardQuery, state: Arc<RelayState>| {
            let group_by = match query.group.as_deref().map(str::parse::<GroupBy>) {
                None => state.runner.config().group_by,
                Some(Ok(group_by)) => group_by,
                Some(Err(err)) => {
                    return warp::reply::with_status(
                        warp::reply::json(&json!({ "error": err.to_string() })),
                        StatusCode::BAD_REQUEST,
                    );
                }
            };
            let outcome = state.store.reports();
            state
                .metrics
                .record_batch(outcome.reports.len(), outcome.rejected.len());
            let result = state.runner.execute_outcome(&outcome, group_by);
            warp::reply::with_status(warp::reply::json(&result.board), StatusCode::OK)
        });

    let status_route = warp::path("status")
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state(state))
        .map(|state: Arc<RelayState>| {
            warp::reply::json(&StatusReply {
                points: state.store.len(),
                metrics: state.metrics.snapshot(),
            })
        });

    ingest_route
        .or(tracks_route)
        .or(teams_route)
        .or(board_route)
        .or(status_route)
}

/// Hosts the relay routes on a background thread with its own runtime.
pub struct RelayBridge {
    state: Arc<RelayState>,
}

impl RelayBridge {
    pub fn new(state: Arc<RelayState>) -> Self {
        Self { state }
    }

    pub fn spawn(&self, bind: SocketAddr) -> thread::JoinHandle<()> {
        let filter = routes(self.state.clone());
        thread::spawn(move || {
            let runtime = match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime,
                Err(err) => {
                    error!("failed to build relay runtime: {}", err);
                    return;
                }
            };
            runtime.block_on(async move {
                match warp::serve(filter).try_bind_ephemeral(bind) {
                    Ok((addr, server)) => {
                        info!("relay listening on http://{}", addr);
                        server.await;
                    }
                    Err(err) => warn!("relay could not bind {}: {}", bind, err),
                }
            });
        })
    }
}
