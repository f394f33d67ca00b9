use crate::error::{LoadError, ValidationError};
use crate::store::ProjectStore;
use crate::types::{ProjectRecord, RawRow};
use crate::util::{parse_f64_safe, parse_fraction_safe, parse_i64_safe};
use csv::ReaderBuilder;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub with_coordinates: usize,
    pub with_reported_eac: usize,
}

pub fn load_portfolio(path: &Path) -> Result<(ProjectStore, LoadReport), LoadError> {
    let file = std::fs::File::open(path)?;
    let loaded = load_from_reader(file)?;
    info!(
        path = %path.display(),
        rows = loaded.1.total_rows,
        "portfolio loaded"
    );
    Ok(loaded)
}

/// Read and validate every row. The first bad row aborts the whole load.
pub fn load_from_reader<R: Read>(reader: R) -> Result<(ProjectStore, LoadReport), LoadError> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    let mut records = Vec::new();
    for (i, result) in rdr.deserialize::<RawRow>().enumerate() {
        let row = result?;
        records.push(clean_row(i + 1, row)?);
    }

    let report = LoadReport {
        total_rows: records.len(),
        with_coordinates: records
            .iter()
            .filter(|r| r.lat.is_some() && r.lon.is_some())
            .count(),
        with_reported_eac: records.iter().filter(|r| r.reported_eac.is_some()).count(),
    };
    let store = ProjectStore::new(records)?;
    debug!(?report, "portfolio validated");
    Ok((store, report))
}

fn is_blank(raw: Option<&str>) -> bool {
    raw.map_or(true, |s| s.trim().is_empty())
}

/// Blank cells are `None`; anything else must parse to a finite number.
fn optional(
    row: usize,
    field: &'static str,
    raw: Option<&str>,
    parse: fn(Option<&str>) -> Option<f64>,
) -> Result<Option<f64>, ValidationError> {
    if is_blank(raw) {
        return Ok(None);
    }
    match parse(raw) {
        Some(v) if v.is_finite() => Ok(Some(v)),
        Some(_) => Err(ValidationError::NonFinite { row, field }),
        None => Err(ValidationError::Malformed { row, field }),
    }
}

fn required(
    row: usize,
    field: &'static str,
    raw: Option<&str>,
    parse: fn(Option<&str>) -> Option<f64>,
) -> Result<f64, ValidationError> {
    optional(row, field, raw, parse)?.ok_or(ValidationError::MissingField { row, field })
}

/// Fractions must already be on the 0..=1 scale; `72` is rejected, `72%` is not.
fn fraction(
    row: usize,
    field: &'static str,
    value: Option<f64>,
) -> Result<Option<f64>, ValidationError> {
    match value {
        Some(v) if !(0.0..=1.0).contains(&v) => Err(ValidationError::OutOfRange { row, field }),
        other => Ok(other),
    }
}

pub fn clean_row(row: usize, raw: RawRow) -> Result<ProjectRecord, ValidationError> {
    let name = raw.project.as_deref().map(str::trim).unwrap_or_default();
    if name.is_empty() {
        return Err(ValidationError::MissingField {
            row,
            field: "Project",
        });
    }
    let country = raw
        .country
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or("Unknown")
        .to_string();

    let contract_revenue = required(
        row,
        "ContractRevenue",
        raw.contract_revenue.as_deref(),
        parse_f64_safe,
    )?;
    let budget_cost = required(row, "BudgetCost", raw.budget_cost.as_deref(), parse_f64_safe)?;
    let actual_cost = required(row, "ActualCost", raw.actual_cost.as_deref(), parse_f64_safe)?;
    let percent_complete = required(
        row,
        "PercentComplete",
        raw.percent_complete.as_deref(),
        parse_fraction_safe,
    )?;
    fraction(row, "PercentComplete", Some(percent_complete))?;

    let lat = optional(row, "Latitude", raw.latitude.as_deref(), parse_f64_safe)?;
    let lon = optional(row, "Longitude", raw.longitude.as_deref(), parse_f64_safe)?;
    let achieved_revenue = optional(
        row,
        "AchievedRevenue",
        raw.achieved_revenue.as_deref(),
        parse_f64_safe,
    )?;
    let planned_progress = fraction(
        row,
        "PlannedProgress",
        optional(
            row,
            "PlannedProgress",
            raw.planned_progress.as_deref(),
            parse_fraction_safe,
        )?,
    )?
    .unwrap_or(0.0);
    let actual_progress = fraction(
        row,
        "ActualProgress",
        optional(
            row,
            "ActualProgress",
            raw.actual_progress.as_deref(),
            parse_fraction_safe,
        )?,
    )?
    .unwrap_or(0.0);
    let reported_eac = optional(row, "ReportedEAC", raw.reported_eac.as_deref(), parse_f64_safe)?;
    let total_float = if is_blank(raw.total_float.as_deref()) {
        0
    } else {
        parse_i64_safe(raw.total_float.as_deref()).ok_or(ValidationError::Malformed {
            row,
            field: "TotalFloat",
        })?
    };

    Ok(ProjectRecord {
        name: name.to_string(),
        country,
        lat,
        lon,
        contract_revenue,
        budget_cost,
        actual_cost,
        achieved_revenue,
        percent_complete,
        planned_progress,
        actual_progress,
        total_float,
        reported_eac,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Project,Country,Latitude,Longitude,ContractRevenue,BudgetCost,ActualCost,PercentComplete,PlannedProgress,ActualProgress,TotalFloat,ReportedEAC\n";

    fn load(body: &str) -> Result<(ProjectStore, LoadReport), LoadError> {
        load_from_reader(format!("{}{}", HEADER, body).as_bytes())
    }

    #[test]
    fn loads_clean_rows() {
        let (store, report) = load(
            "Nairobi Grid,Kenya,-1.29,36.82,\"100,000,000\",85000000,20000000,25%,0.2,0.25,30,82000000\n\
             Algeria Solar,Algeria,,,52000000,45000000,10000000,0.15,,,-4,\n",
        )
        .unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(
            report,
            LoadReport {
                total_rows: 2,
                with_coordinates: 1,
                with_reported_eac: 1,
            }
        );
        let n = store.get("Nairobi Grid").unwrap();
        assert_eq!(n.contract_revenue, 100_000_000.0);
        assert_eq!(n.percent_complete, 0.25);
        assert_eq!(n.lat, Some(-1.29));
        let a = store.get("Algeria Solar").unwrap();
        assert_eq!(a.total_float, -4);
        assert_eq!(a.planned_progress, 0.0);
        assert_eq!(a.lat, None);
    }

    #[test]
    fn missing_required_field_fails_the_load() {
        let err = load(
            "A,X,,,100,80,10,0.5,,,,\n\
             B,X,,,100,,10,0.5,,,,\n",
        )
        .unwrap_err();
        assert!(matches!(
            err,
            LoadError::Validation(ValidationError::MissingField {
                row: 2,
                field: "BudgetCost"
            })
        ));
    }

    #[test]
    fn overflowing_number_is_non_finite() {
        let err = load("A,X,,,1e999,80,10,0.5,,,,\n").unwrap_err();
        assert!(matches!(
            err,
            LoadError::Validation(ValidationError::NonFinite {
                row: 1,
                field: "ContractRevenue"
            })
        ));
    }

    #[test]
    fn duplicate_names_fail_the_load() {
        let err = load("A,X,,,100,80,10,0.5,,,,\nA,Y,,,100,80,10,0.5,,,,\n").unwrap_err();
        assert!(matches!(
            err,
            LoadError::Validation(ValidationError::DuplicateName { .. })
        ));
    }

    #[test]
    fn blank_project_name_is_missing() {
        let err = load(" ,X,,,100,80,10,0.5,,,,\n").unwrap_err();
        assert!(matches!(
            err,
            LoadError::Validation(ValidationError::MissingField {
                row: 1,
                field: "Project"
            })
        ));
    }

    #[test]
    fn percent_complete_on_hundred_scale_is_rejected() {
        let err = load("Nile Power 1,Egypt,,,580000000,500000000,350000000,72,,,,\n").unwrap_err();
        assert!(matches!(
            err,
            LoadError::Validation(ValidationError::OutOfRange {
                row: 1,
                field: "PercentComplete"
            })
        ));

        let (store, _) = load("Nile Power 1,Egypt,,,580000000,500000000,350000000,72%,,,,\n").unwrap();
        assert_eq!(store.get("Nile Power 1").unwrap().percent_complete, 0.72);
    }

    #[test]
    fn progress_outside_unit_range_is_rejected() {
        let err = load("A,X,,,100,80,10,0.5,1.2,,,\n").unwrap_err();
        assert!(matches!(
            err,
            LoadError::Validation(ValidationError::OutOfRange {
                row: 1,
                field: "PlannedProgress"
            })
        ));
        let err = load("A,X,,,100,80,10,0.5,,-0.1,,\n").unwrap_err();
        assert!(matches!(
            err,
            LoadError::Validation(ValidationError::OutOfRange {
                row: 1,
                field: "ActualProgress"
            })
        ));
    }

    #[test]
    fn malformed_optional_values_are_rejected() {
        let err = load("A,X,,,100,80,10,0.5,half,,,\n").unwrap_err();
        assert!(matches!(
            err,
            LoadError::Validation(ValidationError::Malformed {
                row: 1,
                field: "PlannedProgress"
            })
        ));
        let err = load("A,X,,,100,80,10,0.5,,,-12 days,\n").unwrap_err();
        assert!(matches!(
            err,
            LoadError::Validation(ValidationError::Malformed {
                row: 1,
                field: "TotalFloat"
            })
        ));
        let err = load("A,X,abc,,100,80,10,0.5,,,,\n").unwrap_err();
        assert!(matches!(
            err,
            LoadError::Validation(ValidationError::Malformed {
                row: 1,
                field: "Latitude"
            })
        ));
    }

    #[test]
    fn malformed_required_value_is_not_missing() {
        let err = load("A,X,,,100,n/a,10,0.5,,,,\n").unwrap_err();
        assert!(matches!(
            err,
            LoadError::Validation(ValidationError::Malformed {
                row: 1,
                field: "BudgetCost"
            })
        ));
        let (store, _) = load("A,X,,,100,-$5,10,0.5,,,,\n").unwrap();
        assert_eq!(store.get("A").unwrap().budget_cost, -5.0);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_portfolio(Path::new("/nonexistent/portfolio.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }
}
