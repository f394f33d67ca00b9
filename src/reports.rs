use crate::metrics::{variance_against, MetricsEngine};
use crate::session::ProjectView;
use crate::store::ProjectStore;
use crate::types::{CardRow, DerivedMetrics, MapMarker, PortfolioRow, PortfolioSummary};
use crate::util::{format_millions, format_number, format_percent, weighted_average};
use chrono::Local;

/// Full inventory table, one row per project in store order.
///
/// A project whose gross profit is undefined still gets a row; only its GP%
/// cell shows `n/a`.
pub fn portfolio_rows(store: &ProjectStore, engine: &MetricsEngine) -> Vec<PortfolioRow> {
    store
        .iter()
        .map(|r| {
            let eac = engine.eac(r, None);
            let gp = engine
                .gross_profit_percent(r)
                .map(|v| format!("{}%", format_number(v, 1)))
                .unwrap_or_else(|_| "n/a".to_string());
            PortfolioRow {
                project: r.name.clone(),
                country: r.country.clone(),
                budget_cost: format_millions(r.budget_cost),
                actual_cost: format_millions(r.actual_cost),
                eac: format_millions(eac),
                etc: format_millions(engine.etc(r, eac)),
                variance: format_millions(variance_against(r, eac)),
                gross_profit_pct: gp,
                poc: format_percent(r.percent_complete),
                total_float: r.total_float,
            }
        })
        .collect()
}

/// Detail card for the selected project. The what-if column is blank unless a
/// simulated percent complete is active.
pub fn project_card(view: &ProjectView<'_>) -> Vec<CardRow> {
    let r = view.record;
    let b = &view.baseline;
    let w = view.what_if.as_ref();
    let what_if = |f: fn(&DerivedMetrics) -> String| w.map(f).unwrap_or_default();
    let row = |metric: &str, baseline: String, what_if: String| CardRow {
        metric: metric.to_string(),
        baseline,
        what_if,
    };

    let mut rows = vec![
        row("Budget Cost", format_millions(r.budget_cost), String::new()),
        row("Actual Cost", format_millions(r.actual_cost), String::new()),
        row(
            "POC Completion",
            format_percent(r.percent_complete),
            what_if(|m| format_percent(m.poc_used)),
        ),
        row(
            "EAC Forecast",
            format_millions(b.eac),
            what_if(|m| format_millions(m.eac)),
        ),
        row(
            "Estimate to Complete",
            format_millions(b.etc),
            what_if(|m| format_millions(m.etc)),
        ),
        row(
            "Variance",
            format_millions(b.variance),
            what_if(|m| format_millions(m.variance)),
        ),
        row(
            "Gross Profit",
            format!("{}%", format_number(b.gross_profit_pct, 1)),
            String::new(),
        ),
        row(
            "Progress (actual vs planned)",
            format!(
                "{} vs {}",
                format_percent(r.actual_progress),
                format_percent(r.planned_progress)
            ),
            String::new(),
        ),
        row("Total Float", format!("{} days", r.total_float), String::new()),
    ];
    if let Some(reported) = r.reported_eac {
        rows.push(row("Reported EAC", format_millions(reported), String::new()));
    }
    rows
}

pub fn generate_summary(store: &ProjectStore, engine: &MetricsEngine) -> PortfolioSummary {
    let eacs: Vec<f64> = store.iter().map(|r| engine.eac(r, None)).collect();
    let budgets: Vec<f64> = store.iter().map(|r| r.budget_cost).collect();
    let pocs: Vec<f64> = store.iter().map(|r| r.percent_complete).collect();
    PortfolioSummary {
        generated_at: Local::now().naive_local(),
        total_projects: store.len(),
        total_budget: budgets.iter().sum(),
        total_actual_cost: store.iter().map(|r| r.actual_cost).sum(),
        total_eac: eacs.iter().sum(),
        weighted_poc: weighted_average(&pocs, &budgets),
        forecast_overruns: budgets.iter().zip(&eacs).filter(|(b, e)| e > b).count(),
        undefined_gross_profit: store
            .iter()
            .filter(|r| engine.gross_profit_percent(r).is_err())
            .count(),
    }
}

/// Points for the map collaborator. Projects without coordinates are left off.
pub fn map_markers(store: &ProjectStore) -> Vec<MapMarker> {
    store
        .iter()
        .filter_map(|r| {
            Some(MapMarker {
                name: r.name.clone(),
                country: r.country.clone(),
                lat: r.lat?,
                lon: r.lon?,
                size: r.budget_cost,
                color: r.percent_complete,
            })
        })
        .collect()
}
