//! Immutable, ordered snapshot of the project portfolio.
//!
//! Every record is validated on the way in, so metrics code can assume finite
//! numbers and unique, non-empty names.
use crate::error::ValidationError;
use crate::types::ProjectRecord;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct ProjectStore {
    records: Vec<ProjectRecord>,
    index: HashMap<String, usize>,
}

impl ProjectStore {
    /// Build a store, failing on the first bad record. No partial stores.
    pub fn new(records: Vec<ProjectRecord>) -> Result<Self, ValidationError> {
        let mut index = HashMap::with_capacity(records.len());
        for (i, r) in records.iter().enumerate() {
            validate_record(i + 1, r)?;
            if index.insert(r.name.clone(), i).is_some() {
                return Err(ValidationError::DuplicateName {
                    name: r.name.clone(),
                });
            }
        }
        Ok(Self { records, index })
    }

    pub fn get(&self, name: &str) -> Option<&ProjectRecord> {
        self.index.get(name).map(|&i| &self.records[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.name.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProjectRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Closest project to a map click, by squared distance in degrees.
    /// Projects without coordinates are skipped; ties go to the earlier record.
    pub fn nearest(&self, lat: f64, lon: f64) -> Option<&ProjectRecord> {
        let mut best: Option<(f64, &ProjectRecord)> = None;
        for r in &self.records {
            let (Some(rlat), Some(rlon)) = (r.lat, r.lon) else {
                continue;
            };
            let d = (rlat - lat).powi(2) + (rlon - lon).powi(2);
            match best {
                Some((bd, _)) if bd <= d => {}
                _ => best = Some((d, r)),
            }
        }
        best.map(|(_, r)| r)
    }
}

fn validate_record(row: usize, r: &ProjectRecord) -> Result<(), ValidationError> {
    if r.name.trim().is_empty() {
        return Err(ValidationError::EmptyName { row });
    }
    let required = [
        ("ContractRevenue", r.contract_revenue),
        ("BudgetCost", r.budget_cost),
        ("ActualCost", r.actual_cost),
        ("PercentComplete", r.percent_complete),
        ("PlannedProgress", r.planned_progress),
        ("ActualProgress", r.actual_progress),
    ];
    for (field, value) in required {
        if !value.is_finite() {
            return Err(ValidationError::NonFinite { row, field });
        }
    }
    let optional = [
        ("Latitude", r.lat),
        ("Longitude", r.lon),
        ("AchievedRevenue", r.achieved_revenue),
        ("ReportedEAC", r.reported_eac),
    ];
    for (field, value) in optional {
        if matches!(value, Some(v) if !v.is_finite()) {
            return Err(ValidationError::NonFinite { row, field });
        }
    }
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn sample(
    name: &str,
    country: &str,
    (lat, lon): (f64, f64),
    contract_revenue: f64,
    budget_cost: f64,
    actual_cost: f64,
    percent_complete: f64,
    (planned_progress, actual_progress): (f64, f64),
    total_float: i64,
    reported_eac: f64,
) -> ProjectRecord {
    ProjectRecord {
        name: name.to_string(),
        country: country.to_string(),
        lat: Some(lat),
        lon: Some(lon),
        contract_revenue,
        budget_cost,
        actual_cost,
        achieved_revenue: Some(contract_revenue * percent_complete),
        percent_complete,
        planned_progress,
        actual_progress,
        total_float,
        reported_eac: Some(reported_eac),
    }
}

/// Built-in portfolio used when the dashboard is started without a CSV.
pub fn sample_portfolio() -> Result<ProjectStore, ValidationError> {
    ProjectStore::new(vec![
        sample(
            "Nile Power 1",
            "Egypt",
            (30.04, 31.23),
            580_000_000.0,
            500_000_000.0,
            350_000_000.0,
            0.72,
            (0.75, 0.72),
            14,
            480_000_000.0,
        ),
        sample(
            "Lagos Substation",
            "Nigeria",
            (6.52, 3.37),
            135_000_000.0,
            120_000_000.0,
            95_000_000.0,
            0.80,
            (0.85, 0.80),
            -6,
            125_000_000.0,
        ),
        sample(
            "Nairobi Grid",
            "Kenya",
            (-1.29, 36.82),
            100_000_000.0,
            85_000_000.0,
            20_000_000.0,
            0.25,
            (0.20, 0.25),
            30,
            82_000_000.0,
        ),
        sample(
            "Tanzania Dam",
            "Tanzania",
            (-6.36, 34.88),
            1_050_000_000.0,
            900_000_000.0,
            400_000_000.0,
            0.45,
            (0.50, 0.45),
            -21,
            890_000_000.0,
        ),
        sample(
            "Algeria Solar",
            "Algeria",
            (36.75, 3.05),
            52_000_000.0,
            45_000_000.0,
            10_000_000.0,
            0.15,
            (0.15, 0.15),
            45,
            42_000_000.0,
        ),
    ])
}
