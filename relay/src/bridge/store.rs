use crate::bridge::model::{LocationPoint, OwnTracksMessage};
use std::collections::HashSet;
use std::sync::RwLock;
use trackcore::report::{ingest, IngestOutcome, WireReport};

/// Outcome of offering one message to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Stored(u64),
    Duplicate,
    Ignored,
}

#[derive(Default)]
struct StoreInner {
    points: Vec<LocationPoint>,
    seen: HashSet<(String, i64)>,
    next_id: u64,
}

/// In-memory, insertion-ordered location log. Lives for the process only.
#[derive(Default)]
pub struct LocationStore {
    inner: RwLock<StoreInner>,
}

impl LocationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a location message unless its `(user, tst)` pair is already known.
    /// Messages that are not locations, or that lack coordinates or a time, are ignored.
    pub fn insert(&self, user: &str, team: &str, message: &OwnTracksMessage) -> InsertOutcome {
        let (Some(latitude), Some(longitude), Some(timestamp)) =
            (message.lat, message.lon, message.tst)
        else {
            return InsertOutcome::Ignored;
        };
        if !message.is_location() {
            return InsertOutcome::Ignored;
        }

        let mut inner = match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if !inner.seen.insert((user.to_string(), timestamp)) {
            return InsertOutcome::Duplicate;
        }
        inner.next_id += 1;
        let id = inner.next_id;
        inner.points.push(LocationPoint {
            id,
            team: team.to_string(),
            user: user.to_string(),
            latitude,
            longitude,
            battery: message.batt,
            velocity: message.vel,
            timestamp,
        });
        InsertOutcome::Stored(id)
    }

    pub fn snapshot(&self) -> Vec<LocationPoint> {
        match self.inner.read() {
            Ok(guard) => guard.points.clone(),
            Err(poisoned) => poisoned.into_inner().points.clone(),
        }
    }

    pub fn len(&self) -> usize {
        match self.inner.read() {
            Ok(guard) => guard.points.len(),
            Err(poisoned) => poisoned.into_inner().points.len(),
        }
    }

    /// Validated reports for the current contents, in insertion order.
    pub fn reports(&self) -> IngestOutcome {
        ingest(self.snapshot().iter().map(WireReport::from).collect())
    }
}
