//! Which project the user is looking at.
//!
//! Two input channels (the project menu and the map) feed the same state and
//! neither has priority: events are applied strictly in the order they were
//! received, so the last one wins. Unknown names are rejected and leave the
//! current selection alone.
use crate::error::SelectionError;
use crate::store::ProjectStore;
use crate::types::ProjectRecord;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionSource {
    Menu,
    Map,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionEvent {
    pub source: SelectionSource,
    pub name: String,
}

impl SelectionEvent {
    pub fn menu(name: impl Into<String>) -> Self {
        Self {
            source: SelectionSource::Menu,
            name: name.into(),
        }
    }

    pub fn map(name: impl Into<String>) -> Self {
        Self {
            source: SelectionSource::Map,
            name: name.into(),
        }
    }
}

/// `None` is the unselected state. Starts unselected and only returns there
/// through [`SelectionState::clear`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected: Option<String>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_name(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn is_selected(&self) -> bool {
        self.selected.is_some()
    }

    pub fn apply(
        &mut self,
        store: &ProjectStore,
        event: &SelectionEvent,
    ) -> Result<(), SelectionError> {
        if !store.contains(&event.name) {
            warn!(source = ?event.source, name = %event.name, "selection rejected: unknown project");
            return Err(SelectionError::NoSuchProject {
                name: event.name.clone(),
            });
        }
        debug!(
            source = ?event.source,
            from = ?self.selected,
            to = %event.name,
            "selection changed"
        );
        self.selected = Some(event.name.clone());
        Ok(())
    }

    /// Apply one update cycle's events in arrival order. Each event gets its
    /// own result; a rejected event does not stop later ones.
    pub fn apply_cycle(
        &mut self,
        store: &ProjectStore,
        events: &[SelectionEvent],
    ) -> Vec<Result<(), SelectionError>> {
        events.iter().map(|e| self.apply(store, e)).collect()
    }

    pub fn clear(&mut self) {
        if let Some(prev) = self.selected.take() {
            debug!(from = %prev, "selection cleared");
        }
    }

    /// The selected record, or `None` when unselected or when the name is no
    /// longer in `store`.
    pub fn current<'a>(&self, store: &'a ProjectStore) -> Option<&'a ProjectRecord> {
        self.selected.as_deref().and_then(|n| store.get(n))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> ProjectStore {
        ProjectStore::new(vec![
            ProjectRecord::new("A", 10.0, 8.0, 1.0, 0.5),
            ProjectRecord::new("B", 10.0, 8.0, 1.0, 0.5),
        ])
        .unwrap()
    }

    #[test]
    fn starts_unselected() {
        let s = SelectionState::new();
        assert!(!s.is_selected());
        assert!(s.current(&store()).is_none());
    }

    #[test]
    fn either_channel_selects() {
        let store = store();
        let mut s = SelectionState::new();
        s.apply(&store, &SelectionEvent::map("A")).unwrap();
        assert_eq!(s.selected_name(), Some("A"));
        s.apply(&store, &SelectionEvent::menu("B")).unwrap();
        assert_eq!(s.current(&store).unwrap().name, "B");
    }

    #[test]
    fn last_event_in_cycle_wins() {
        let store = store();
        let mut s = SelectionState::new();
        s.apply_cycle(
            &store,
            &[SelectionEvent::menu("A"), SelectionEvent::map("B")],
        );
        assert_eq!(s.selected_name(), Some("B"));
        s.apply_cycle(
            &store,
            &[SelectionEvent::map("B"), SelectionEvent::menu("A")],
        );
        assert_eq!(s.selected_name(), Some("A"));
    }

    #[test]
    fn unknown_name_keeps_previous_selection() {
        let store = store();
        let mut s = SelectionState::new();
        s.apply(&store, &SelectionEvent::menu("A")).unwrap();
        let err = s.apply(&store, &SelectionEvent::map("Z")).unwrap_err();
        assert_eq!(
            err,
            SelectionError::NoSuchProject {
                name: "Z".to_string()
            }
        );
        assert_eq!(s.selected_name(), Some("A"));
    }

    #[test]
    fn rejected_event_does_not_stop_the_cycle() {
        let store = store();
        let mut s = SelectionState::new();
        let results = s.apply_cycle(
            &store,
            &[SelectionEvent::map("Z"), SelectionEvent::menu("B")],
        );
        assert!(results[0].is_err());
        assert!(results[1].is_ok());
        assert_eq!(s.selected_name(), Some("B"));
    }

    #[test]
    fn clear_returns_to_unselected() {
        let store = store();
        let mut s = SelectionState::new();
        s.apply(&store, &SelectionEvent::menu("A")).unwrap();
        s.clear();
        assert_eq!(s, SelectionState::new());
        s.clear();
        assert!(!s.is_selected());
    }

    #[test]
    fn event_json_shape() {
        let e: SelectionEvent = serde_json::from_str(r#"{"source":"map","name":"A"}"#).unwrap();
        assert_eq!(e, SelectionEvent::map("A"));
    }
}
