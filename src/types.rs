use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// One CSV row as it comes off disk. Everything is a string so the loader can
/// report exactly which field was missing or malformed.
#[derive(Debug, Default, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Project")]
    pub project: Option<String>,
    #[serde(rename = "Country")]
    pub country: Option<String>,
    #[serde(rename = "Latitude")]
    pub latitude: Option<String>,
    #[serde(rename = "Longitude")]
    pub longitude: Option<String>,
    #[serde(rename = "ContractRevenue")]
    pub contract_revenue: Option<String>,
    #[serde(rename = "BudgetCost")]
    pub budget_cost: Option<String>,
    #[serde(rename = "ActualCost")]
    pub actual_cost: Option<String>,
    #[serde(rename = "AchievedRevenue")]
    pub achieved_revenue: Option<String>,
    #[serde(rename = "PercentComplete")]
    pub percent_complete: Option<String>,
    #[serde(rename = "PlannedProgress")]
    pub planned_progress: Option<String>,
    #[serde(rename = "ActualProgress")]
    pub actual_progress: Option<String>,
    #[serde(rename = "TotalFloat")]
    pub total_float: Option<String>,
    #[serde(rename = "ReportedEAC")]
    pub reported_eac: Option<String>,
}

/// A validated project. Fractions (`percent_complete`, progress) are 0..=1,
/// never pre-multiplied by 100.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectRecord {
    pub name: String,
    pub country: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub contract_revenue: f64,
    pub budget_cost: f64,
    pub actual_cost: f64,
    pub achieved_revenue: Option<f64>,
    pub percent_complete: f64,
    pub planned_progress: f64,
    pub actual_progress: f64,
    /// Schedule buffer in days; negative means the schedule is already in deficit.
    pub total_float: i64,
    /// EAC as reported by the data source, when it supplies one.
    pub reported_eac: Option<f64>,
}

impl ProjectRecord {
    /// Record with the required financials set and every optional field empty.
    pub fn new(
        name: impl Into<String>,
        contract_revenue: f64,
        budget_cost: f64,
        actual_cost: f64,
        percent_complete: f64,
    ) -> Self {
        Self {
            name: name.into(),
            country: String::new(),
            lat: None,
            lon: None,
            contract_revenue,
            budget_cost,
            actual_cost,
            achieved_revenue: None,
            percent_complete,
            planned_progress: 0.0,
            actual_progress: 0.0,
            total_float: 0,
            reported_eac: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedMetrics {
    pub gross_profit_pct: f64,
    pub eac: f64,
    pub etc: f64,
    pub variance: f64,
    /// The percent-complete fraction EAC was actually divided by, after clamping.
    pub poc_used: f64,
    pub progress_gap: f64,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct PortfolioRow {
    #[serde(rename = "Project")]
    #[tabled(rename = "Project")]
    pub project: String,
    #[serde(rename = "Country")]
    #[tabled(rename = "Country")]
    pub country: String,
    #[serde(rename = "BudgetCost")]
    #[tabled(rename = "BudgetCost")]
    pub budget_cost: String,
    #[serde(rename = "ActualCost")]
    #[tabled(rename = "ActualCost")]
    pub actual_cost: String,
    #[serde(rename = "EAC")]
    #[tabled(rename = "EAC")]
    pub eac: String,
    #[serde(rename = "ETC")]
    #[tabled(rename = "ETC")]
    pub etc: String,
    #[serde(rename = "Variance")]
    #[tabled(rename = "Variance")]
    pub variance: String,
    #[serde(rename = "GrossProfitPct")]
    #[tabled(rename = "GP%")]
    pub gross_profit_pct: String,
    #[serde(rename = "POC")]
    #[tabled(rename = "POC")]
    pub poc: String,
    #[serde(rename = "TotalFloat")]
    #[tabled(rename = "Float")]
    pub total_float: i64,
}

/// One label/value line of the selected project's detail card.
#[derive(Debug, Serialize, Tabled, Clone)]
pub struct CardRow {
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[tabled(rename = "Baseline")]
    pub baseline: String,
    #[tabled(rename = "What-if")]
    pub what_if: String,
}

/// Point fed to the external map: sized by budget, coloured by completion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    pub name: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
    pub size: f64,
    pub color: f64,
}

#[derive(Debug, Serialize)]
pub struct PortfolioSummary {
    pub generated_at: NaiveDateTime,
    pub total_projects: usize,
    pub total_budget: f64,
    pub total_actual_cost: f64,
    pub total_eac: f64,
    pub weighted_poc: f64,
    pub forecast_overruns: usize,
    pub undefined_gross_profit: usize,
}
