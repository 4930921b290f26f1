use crate::prelude::GroupBy;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamLabel {
    pub name: String,
}

/// Static team key to label lookup, used only for display substitution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamDirectory {
    labels: BTreeMap<String, TeamLabel>,
}

impl TeamDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(body: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(body)
    }

    pub fn insert(&mut self, key: impl Into<String>, name: impl Into<String>) {
        self.labels
            .insert(key.into(), TeamLabel { name: name.into() });
    }

    pub fn get(&self, key: &str) -> Option<&TeamLabel> {
        self.labels.get(key)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Team names are substituted only in team mode; otherwise the key is shown.
    pub fn display_label(&self, key: &str, group_by: GroupBy) -> String {
        match group_by {
            GroupBy::Team => self
                .labels
                .get(key)
                .map(|label| label.name.clone())
                .unwrap_or_else(|| key.to_string()),
            GroupBy::Individual => key.to_string(),
        }
    }
}

impl FromIterator<(String, String)> for TeamDirectory {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        let mut directory = TeamDirectory::new();
        for (key, name) in iter {
            directory.insert(key, name);
        }
        directory
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lookup_object() {
        let directory =
            TeamDirectory::from_json(r#"{"t1": {"name": "Red Rovers"}, "t2": {"name": "Blue"}}"#)
                .unwrap();
        assert_eq!(directory.len(), 2);
        assert_eq!(directory.get("t1").unwrap().name, "Red Rovers");
    }

    #[test]
    fn label_substitution_depends_on_mode() {
        let directory: TeamDirectory = [("t1".to_string(), "Red Rovers".to_string())]
            .into_iter()
            .collect();
        assert_eq!(directory.display_label("t1", GroupBy::Team), "Red Rovers");
        assert_eq!(directory.display_label("t9", GroupBy::Team), "t9");
        assert_eq!(directory.display_label("t1", GroupBy::Individual), "t1");
    }
}
