use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use trackcore::directory::TeamDirectory;
use trackcore::{Destination, GroupBy};

use crate::generator::profile::GeneratorConfig;

/// A team as declared in the relay config.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamConfig {
    pub name: String,
    #[serde(default)]
    pub members: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    pub bind: SocketAddr,
    pub destination: Destination,
    pub group_by: GroupBy,
    pub teams: BTreeMap<String, TeamConfig>,
    pub demo: GeneratorConfig,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 1323)),
            destination: Destination::default(),
            group_by: GroupBy::Team,
            teams: BTreeMap::new(),
            demo: GeneratorConfig::default(),
        }
    }
}

impl RelayConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading relay config {}", path_ref.display()))?;
        let config: RelayConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing relay config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(bind: SocketAddr, group_by: GroupBy) -> Self {
        Self {
            bind,
            group_by,
            ..Default::default()
        }
    }

    pub fn with_destination(mut self, latitude: Option<f64>, longitude: Option<f64>) -> Self {
        if let Some(latitude) = latitude {
            self.destination.position.latitude = latitude;
        }
        if let Some(longitude) = longitude {
            self.destination.position.longitude = longitude;
        }
        self
    }

    /// Team a user reports under. Users outside every team report alone.
    pub fn team_of<'a>(&'a self, user: &'a str) -> &'a str {
        self.teams
            .iter()
            .find(|(_, team)| team.members.iter().any(|member| member == user))
            .map(|(key, _)| key.as_str())
            .unwrap_or(user)
    }

    pub fn directory(&self) -> TeamDirectory {
        self.teams
            .iter()
            .map(|(key, team)| (key.clone(), team.name.clone()))
            .collect()
    }
}
