//! Derived project financials: gross profit, EAC, ETC and variance.
//!
//! Everything here is a pure function of a record (plus an optional
//! percent-complete override). Nothing is cached and records are never
//! modified, so the renderer can call in on every refresh.
use crate::config::MetricsConfig;
use crate::error::MetricsError;
use crate::types::{DerivedMetrics, ProjectRecord};

/// Which EAC figure a variance is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EacSource {
    /// `budget_cost / poc`, as computed by this engine.
    Derived,
    /// The data source's own EAC, falling back to the derived one when absent.
    Reported,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsEngine {
    config: MetricsConfig,
}

impl MetricsEngine {
    pub fn new(config: MetricsConfig) -> Self {
        Self { config }
    }

    pub fn poc_floor(&self) -> f64 {
        self.config.poc_floor
    }

    /// `(revenue - budget) / revenue * 100`.
    ///
    /// Zero revenue is an error rather than 0 or NaN: a 0% margin would read as
    /// break-even.
    pub fn gross_profit_percent(&self, record: &ProjectRecord) -> Result<f64, MetricsError> {
        if record.contract_revenue == 0.0 {
            return Err(MetricsError::DivisionByZero {
                project: record.name.clone(),
            });
        }
        Ok((record.contract_revenue - record.budget_cost) / record.contract_revenue * 100.0)
    }

    /// Percent complete actually used for forecasting: floored at `poc_floor`,
    /// capped at 1. NaN collapses to the floor.
    pub fn effective_poc(&self, poc: f64) -> f64 {
        poc.max(self.config.poc_floor).min(1.0)
    }

    pub fn eac(&self, record: &ProjectRecord, poc_override: Option<f64>) -> f64 {
        let p = poc_override.unwrap_or(record.percent_complete);
        record.budget_cost / self.effective_poc(p)
    }

    /// Remaining cost. Negative when spend already exceeds the forecast; not clamped.
    pub fn etc(&self, record: &ProjectRecord, eac: f64) -> f64 {
        eac - record.actual_cost
    }

    /// `budget - eac`: positive is a forecast underrun, negative an overrun.
    pub fn variance(&self, record: &ProjectRecord, source: EacSource) -> f64 {
        let eac = match (source, record.reported_eac) {
            (EacSource::Reported, Some(reported)) => reported,
            _ => self.eac(record, None),
        };
        variance_against(record, eac)
    }

    /// Full metrics bundle, optionally with a simulated percent complete.
    pub fn metrics(
        &self,
        record: &ProjectRecord,
        poc_override: Option<f64>,
    ) -> Result<DerivedMetrics, MetricsError> {
        let gross_profit_pct = self.gross_profit_percent(record)?;
        let poc_used = self.effective_poc(poc_override.unwrap_or(record.percent_complete));
        let eac = self.eac(record, poc_override);
        Ok(DerivedMetrics {
            gross_profit_pct,
            eac,
            etc: self.etc(record, eac),
            variance: variance_against(record, eac),
            poc_used,
            progress_gap: record.actual_progress - record.planned_progress,
        })
    }

    /// Live preview for a what-if slider. The record is borrowed immutably, so
    /// the stored percent complete is never touched.
    pub fn simulate_what_if(
        &self,
        record: &ProjectRecord,
        simulated_poc: f64,
    ) -> Result<DerivedMetrics, MetricsError> {
        self.metrics(record, Some(simulated_poc))
    }
}

pub fn variance_against(record: &ProjectRecord, eac: f64) -> f64 {
    record.budget_cost - eac
}
