//! Expand/collapse state for rendered text blocks and accordion rows

use std::collections::HashMap;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

/// Per-instance disclosure state. Starts collapsed and is never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpansionState {
    #[default]
    Collapsed,
    Expanded,
}

/// Accordion rows open and close with the same two-state machine
pub type AccordionState = ExpansionState;

impl ExpansionState {
    pub fn toggle(&mut self) {
        *self = self.toggled();
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Collapsed => Self::Expanded,
            Self::Expanded => Self::Collapsed,
        }
    }

    pub fn is_expanded(self) -> bool {
        self == Self::Expanded
    }

    /// Marker used by text renderers for accordion rows
    pub fn marker(self) -> &'static str {
        match self {
            Self::Collapsed => "▶",
            Self::Expanded => "▼",
        }
    }
}

/// Expansion state for many rendered instances, keyed by instance.
///
/// Two instances showing the same content still have separate keys and
/// separate state. `clear` models a remount.
#[derive(Debug, Clone)]
pub struct ExpansionSet<K> {
    states: HashMap<K, ExpansionState>,
}

impl<K> Default for ExpansionSet<K> {
    fn default() -> Self {
        Self {
            states: HashMap::new(),
        }
    }
}

impl<K: Eq + Hash> ExpansionSet<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, key: &K) -> ExpansionState {
        self.states.get(key).copied().unwrap_or_default()
    }

    pub fn is_expanded(&self, key: &K) -> bool {
        self.state(key).is_expanded()
    }

    /// Flip the state for `key` and return the new state
    pub fn toggle(&mut self, key: K) -> ExpansionState {
        let state = self.states.entry(key).or_default();
        state.toggle();
        *state
    }

    pub fn expanded_count(&self) -> usize {
        self.states.values().filter(|s| s.is_expanded()).count()
    }

    pub fn clear(&mut self) {
        self.states.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_collapsed() {
        assert_eq!(ExpansionState::default(), ExpansionState::Collapsed);
        assert!(!ExpansionState::default().is_expanded());
    }

    #[test]
    fn test_toggle_round_trip() {
        let mut state = ExpansionState::default();
        state.toggle();
        assert!(state.is_expanded());
        state.toggle();
        assert_eq!(state, ExpansionState::Collapsed);
    }

    #[test]
    fn test_markers() {
        assert_eq!(ExpansionState::Collapsed.marker(), "▶");
        assert_eq!(ExpansionState::Expanded.marker(), "▼");
    }

    #[test]
    fn test_set_instances_are_independent() {
        let mut set = ExpansionSet::new();
        assert_eq!(set.toggle(("row-a", 0)), ExpansionState::Expanded);

        assert!(set.is_expanded(&("row-a", 0)));
        assert!(!set.is_expanded(&("row-a", 1)));
        assert_eq!(set.expanded_count(), 1);
    }

    #[test]
    fn test_set_toggle_back_and_clear() {
        let mut set = ExpansionSet::new();
        set.toggle(1u32);
        set.toggle(2u32);
        assert_eq!(set.toggle(2u32), ExpansionState::Collapsed);
        assert_eq!(set.expanded_count(), 1);

        set.clear();
        assert_eq!(set.state(&1), ExpansionState::Collapsed);
        assert_eq!(set.expanded_count(), 0);
    }
}
