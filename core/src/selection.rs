//! Session-scoped visibility flags, reconciled against each cycle's keys.

use crate::prelude::GroupBy;
use std::collections::{BTreeMap, HashMap};

/// Logical view: grouping key to visibility.
pub type SelectionState = BTreeMap<String, bool>;

/// Carries prior flags over to the current key set. New keys start visible;
/// keys absent from `current_keys` are left out of the result.
pub fn reconcile<I, S>(previous: &SelectionState, current_keys: I) -> SelectionState
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    current_keys
        .into_iter()
        .map(|key| {
            let key = key.as_ref();
            let visible = previous.get(key).copied().unwrap_or(true);
            (key.to_string(), visible)
        })
        .collect()
}

/// Process-wide flag storage owned by the UI session.
///
/// Each grouping mode has its own table, so a team and a reporter that share
/// an identifier never share a flag. Flags of keys that stop reporting are
/// kept, which restores them if the key comes back later in the session.
#[derive(Debug, Clone, Default)]
pub struct SelectionStore {
    flags: HashMap<GroupBy, SelectionState>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the current key set and returns the flags for exactly those keys.
    pub fn reconcile<I, S>(&mut self, group_by: GroupBy, current_keys: I) -> SelectionState
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let table = self.flags.entry(group_by).or_default();
        let view = reconcile(table, current_keys);
        for (key, visible) in &view {
            table.insert(key.clone(), *visible);
        }
        view
    }

    /// Unknown keys are visible.
    pub fn is_visible(&self, group_by: GroupBy, key: &str) -> bool {
        self.flags
            .get(&group_by)
            .and_then(|table| table.get(key))
            .copied()
            .unwrap_or(true)
    }

    pub fn set_visible(&mut self, group_by: GroupBy, key: &str, visible: bool) {
        self.flags
            .entry(group_by)
            .or_default()
            .insert(key.to_string(), visible);
    }

    /// Flips a key's flag and returns the new value.
    pub fn toggle(&mut self, group_by: GroupBy, key: &str) -> bool {
        let visible = !self.is_visible(group_by, key);
        self.set_visible(group_by, key, visible);
        visible
    }

    /// Makes every stored key in the mode visible (or hidden) at once.
    pub fn set_all(&mut self, group_by: GroupBy, visible: bool) {
        if let Some(table) = self.flags.get_mut(&group_by) {
            table.values_mut().for_each(|flag| *flag = visible);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reconcile_preserves_prior_flags() {
        let previous = SelectionState::from([("A".to_string(), false)]);
        let result = reconcile(&previous, ["A", "B"]);
        assert_eq!(
            result,
            SelectionState::from([("A".to_string(), false), ("B".to_string(), true)])
        );
    }

    #[test]
    fn reconcile_drops_inactive_keys_from_view() {
        let previous =
            SelectionState::from([("A".to_string(), false), ("gone".to_string(), false)]);
        let result = reconcile(&previous, ["A"]);
        assert_eq!(result.len(), 1);
        assert!(!result.contains_key("gone"));
    }

    #[test]
    fn store_keeps_toggle_across_polls() {
        let mut store = SelectionStore::new();
        store.reconcile(GroupBy::Team, ["t1", "t2"]);
        assert!(!store.toggle(GroupBy::Team, "t1"));

        let view = store.reconcile(GroupBy::Team, ["t1", "t2", "t3"]);
        assert!(!view["t1"]);
        assert!(view["t2"]);
        assert!(view["t3"]);
    }

    #[test]
    fn store_restores_flag_when_key_returns() {
        let mut store = SelectionStore::new();
        store.reconcile(GroupBy::Individual, ["u1"]);
        store.set_visible(GroupBy::Individual, "u1", false);

        let view = store.reconcile(GroupBy::Individual, ["u2"]);
        assert!(!view.contains_key("u1"));

        let view = store.reconcile(GroupBy::Individual, ["u1", "u2"]);
        assert!(!view["u1"]);
    }

    #[test]
    fn modes_do_not_share_flags() {
        let mut store = SelectionStore::new();
        store.reconcile(GroupBy::Team, ["alice"]);
        store.set_visible(GroupBy::Team, "alice", false);

        let view = store.reconcile(GroupBy::Individual, ["alice"]);
        assert!(view["alice"]);
        assert!(!store.is_visible(GroupBy::Team, "alice"));
    }

    #[test]
    fn set_all_overrides_every_flag() {
        let mut store = SelectionStore::new();
        store.reconcile(GroupBy::Team, ["t1", "t2"]);
        store.set_all(GroupBy::Team, false);
        assert!(!store.is_visible(GroupBy::Team, "t1"));
        assert!(!store.is_visible(GroupBy::Team, "t2"));
        store.set_all(GroupBy::Team, true);
        assert!(store.is_visible(GroupBy::Team, "t2"));
    }
}
