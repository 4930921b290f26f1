use crate::bridge::model::OwnTracksMessage;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use trackcore::geo::{Position, EARTH_RADIUS_KM};
use trackcore::Destination;

/// Configuration for seeding synthetic participants walking to the finish.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub participants: usize,
    pub teams: usize,
    pub start_radius_km: f64,
    pub speed_kmh: f64,
    pub jitter_km: f64,
    pub steps: usize,
    pub step_seconds: i64,
    pub start_timestamp: i64,
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            participants: 6,
            teams: 3,
            start_radius_km: 40.0,
            speed_kmh: 60.0,
            jitter_km: 0.05,
            steps: 30,
            step_seconds: 60,
            start_timestamp: 1_700_000_000,
            seed: 0,
        }
    }
}

/// One generated location, addressed the way a device would post it.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticFix {
    pub user: String,
    pub team: String,
    pub message: OwnTracksMessage,
}

fn km_to_lat_degrees(km: f64) -> f64 {
    (km / EARTH_RADIUS_KM).to_degrees()
}

fn km_to_lon_degrees(km: f64, latitude: f64) -> f64 {
    let scale = latitude.to_radians().cos().max(1e-6);
    (km / (EARTH_RADIUS_KM * scale)).to_degrees()
}

/// Offsets a position by north/east kilometres on a local flat approximation.
fn offset(position: Position, north_km: f64, east_km: f64) -> Position {
    Position::new(
        position.latitude + km_to_lat_degrees(north_km),
        position.longitude + km_to_lon_degrees(east_km, position.latitude),
    )
}

/// Produces fixes for every participant, step by step, in time order.
pub fn generate(config: &GeneratorConfig, destination: &Destination) -> Vec<SyntheticFix> {
    let mut rng = StdRng::seed_from_u64(config.seed);
    let teams = config.teams.max(1);
    let step_km = config.speed_kmh * config.step_seconds as f64 / 3600.0;

    let mut walkers: Vec<(String, String, f64, f64, i64)> = (0..config.participants)
        .map(|index| {
            let bearing = rng.gen_range(0.0..std::f64::consts::TAU);
            let radius = rng.gen_range(0.5..=1.0) * config.start_radius_km;
            let pace = rng.gen_range(0.6..=1.2);
            let battery = rng.gen_range(40..=100);
            (
                format!("runner-{:02}", index + 1),
                format!("team-{}", index % teams + 1),
                radius * bearing.cos(),
                radius * bearing.sin() * pace,
                battery,
            )
        })
        .collect();

    let mut fixes = Vec::with_capacity(config.participants * config.steps);
    for step in 0..config.steps {
        let timestamp = config.start_timestamp + step as i64 * config.step_seconds;
        for (user, team, north, east, battery) in walkers.iter_mut() {
            let remaining = (*north * *north + *east * *east).sqrt();
            if remaining > step_km {
                let scale = (remaining - step_km) / remaining;
                *north *= scale;
                *east *= scale;
            } else {
                *north = 0.0;
                *east = 0.0;
            }
            let jitter = config.jitter_km.max(0.0);
            let (jn, je) = if jitter > 0.0 {
                (rng.gen_range(-jitter..=jitter), rng.gen_range(-jitter..=jitter))
            } else {
                (0.0, 0.0)
            };
            let position = offset(destination.position, *north + jn, *east + je);
            if step % 10 == 9 {
                *battery = (*battery - 1).max(1);
            }

            let mut message = OwnTracksMessage::location(position.latitude, position.longitude, timestamp);
            message.batt = Some(*battery);
            message.vel = Some(config.speed_kmh.round() as i64);
            fixes.push(SyntheticFix {
                user: user.clone(),
                team: team.clone(),
                message,
            });
        }
    }
    fixes
}
