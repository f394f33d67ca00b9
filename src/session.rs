//! One user's dashboard session.
//!
//! A session pairs a shared, read-only portfolio snapshot with its own
//! selection and what-if slider value. Rendering is a pure function of those
//! three things; nothing is cached between renders.
use crate::error::{MetricsError, SelectionError};
use crate::metrics::MetricsEngine;
use crate::selection::{SelectionEvent, SelectionState};
use crate::store::ProjectStore;
use crate::types::{DerivedMetrics, ProjectRecord};
use std::sync::Arc;
use tracing::{debug, warn};

/// Everything the renderer needs for the selected project.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectView<'a> {
    pub record: &'a ProjectRecord,
    pub baseline: DerivedMetrics,
    pub what_if: Option<DerivedMetrics>,
}

#[derive(Debug, Clone)]
pub struct Session {
    store: Arc<ProjectStore>,
    selection: SelectionState,
    engine: MetricsEngine,
    what_if: Option<f64>,
}

impl Session {
    pub fn new(store: Arc<ProjectStore>, engine: MetricsEngine) -> Self {
        Self {
            store,
            selection: SelectionState::new(),
            engine,
            what_if: None,
        }
    }

    pub fn store(&self) -> &ProjectStore {
        &self.store
    }

    pub fn engine(&self) -> &MetricsEngine {
        &self.engine
    }

    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    pub fn what_if(&self) -> Option<f64> {
        self.what_if
    }

    pub fn get_current_selection(&self) -> Option<&ProjectRecord> {
        self.selection.current(&self.store)
    }

    pub fn get_metrics(
        &self,
        record: &ProjectRecord,
        poc_override: Option<f64>,
    ) -> Result<DerivedMetrics, MetricsError> {
        self.engine.metrics(record, poc_override)
    }

    /// Select a project from either channel. A changed selection resets the
    /// what-if slider; re-selecting the same project keeps it.
    pub fn apply_selection(&mut self, event: &SelectionEvent) -> Result<(), SelectionError> {
        let before = self.selection.selected_name().map(str::to_owned);
        self.selection.apply(&self.store, event)?;
        if before.as_deref() != self.selection.selected_name() {
            self.what_if = None;
        }
        Ok(())
    }

    /// Events from one update cycle, in the order they arrived.
    pub fn apply_cycle(&mut self, events: &[SelectionEvent]) -> Vec<Result<(), SelectionError>> {
        events.iter().map(|e| self.apply_selection(e)).collect()
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
        self.what_if = None;
    }

    /// Set or clear the simulated percent complete. Values are clamped to 0..=1;
    /// a non-finite value clears the slider.
    pub fn set_what_if(&mut self, poc: Option<f64>) {
        self.what_if = poc.filter(|p| p.is_finite()).map(|p| p.clamp(0.0, 1.0));
        debug!(what_if = ?self.what_if, "what-if updated");
    }

    /// Swap in a refreshed snapshot. A selection that no longer exists is dropped.
    pub fn replace_store(&mut self, store: Arc<ProjectStore>) {
        self.store = store;
        let missing = self
            .selection
            .selected_name()
            .filter(|n| !self.store.contains(n))
            .map(str::to_owned);
        if let Some(name) = missing {
            warn!(name = %name, "selected project missing from refreshed portfolio");
            self.clear_selection();
        }
    }

    pub fn render(&self) -> Result<Option<ProjectView<'_>>, MetricsError> {
        let Some(record) = self.get_current_selection() else {
            return Ok(None);
        };
        let baseline = self.engine.metrics(record, None)?;
        let what_if = self
            .what_if
            .map(|p| self.engine.simulate_what_if(record, p))
            .transpose()?;
        Ok(Some(ProjectView {
            record,
            baseline,
            what_if,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        let store = ProjectStore::new(vec![
            ProjectRecord::new("Nairobi Grid", 100_000_000.0, 85_000_000.0, 20_000_000.0, 0.25),
            ProjectRecord::new("Free Works", 0.0, 10.0, 1.0, 0.5),
        ])
        .unwrap();
        Session::new(Arc::new(store), MetricsEngine::default())
    }

    #[test]
    fn render_without_selection_is_empty() {
        assert!(session().render().unwrap().is_none());
    }

    #[test]
    fn render_with_what_if() {
        let mut s = session();
        s.apply_selection(&SelectionEvent::menu("Nairobi Grid")).unwrap();
        s.set_what_if(Some(0.5));
        let view = s.render().unwrap().unwrap();
        assert_eq!(view.baseline.eac, 340_000_000.0);
        let w = view.what_if.unwrap();
        assert_eq!(w.eac, 170_000_000.0);
        assert_eq!(w.etc, 150_000_000.0);
        assert_eq!(view.record.percent_complete, 0.25);
    }

    #[test]
    fn what_if_is_clamped_and_reset_on_new_selection() {
        let mut s = session();
        s.apply_selection(&SelectionEvent::map("Nairobi Grid")).unwrap();
        s.set_what_if(Some(1.7));
        assert_eq!(s.what_if(), Some(1.0));
        s.set_what_if(Some(f64::NAN));
        assert_eq!(s.what_if(), None);

        s.set_what_if(Some(0.4));
        s.apply_selection(&SelectionEvent::menu("Nairobi Grid")).unwrap();
        assert_eq!(s.what_if(), Some(0.4));
        s.apply_selection(&SelectionEvent::menu("Free Works")).unwrap();
        assert_eq!(s.what_if(), None);
    }

    #[test]
    fn rejected_selection_keeps_what_if() {
        let mut s = session();
        s.apply_selection(&SelectionEvent::menu("Nairobi Grid")).unwrap();
        s.set_what_if(Some(0.4));
        assert!(s.apply_selection(&SelectionEvent::map("Atlantis")).is_err());
        assert_eq!(s.what_if(), Some(0.4));
        assert_eq!(s.get_current_selection().unwrap().name, "Nairobi Grid");
    }

    #[test]
    fn zero_revenue_surfaces_per_render() {
        let mut s = session();
        s.apply_selection(&SelectionEvent::menu("Free Works")).unwrap();
        assert!(matches!(
            s.render(),
            Err(MetricsError::DivisionByZero { .. })
        ));
    }

    #[test]
    fn sessions_are_independent() {
        let store = Arc::new(crate::store::sample_portfolio().unwrap());
        let mut a = Session::new(store.clone(), MetricsEngine::default());
        let b = Session::new(store, MetricsEngine::default());
        a.apply_selection(&SelectionEvent::menu("Lagos Substation")).unwrap();
        assert!(a.get_current_selection().is_some());
        assert!(b.get_current_selection().is_none());
    }

    #[test]
    fn refresh_drops_missing_selection() {
        let mut s = session();
        s.apply_selection(&SelectionEvent::menu("Free Works")).unwrap();
        s.set_what_if(Some(0.9));
        let refreshed = ProjectStore::new(vec![ProjectRecord::new(
            "Nairobi Grid",
            1.0,
            1.0,
            0.0,
            0.1,
        )])
        .unwrap();
        s.replace_store(Arc::new(refreshed));
        assert!(!s.selection().is_selected());
        assert_eq!(s.what_if(), None);

        s.apply_selection(&SelectionEvent::menu("Nairobi Grid")).unwrap();
        s.replace_store(Arc::new(crate::store::sample_portfolio().unwrap()));
        assert_eq!(s.get_current_selection().unwrap().name, "Nairobi Grid");
    }
}
