use thiserror::Error;

/// Problems with a single project row, raised while the store is being built.
///
/// Row numbers are 1-based and count data rows only (the CSV header is not a row).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("row {row}: missing required field '{field}'")]
    MissingField { row: usize, field: &'static str },
    #[error("row {row}: field '{field}' is not a number")]
    Malformed { row: usize, field: &'static str },
    #[error("row {row}: field '{field}' must be a fraction between 0 and 1")]
    OutOfRange { row: usize, field: &'static str },
    #[error("row {row}: field '{field}' is not a finite number")]
    NonFinite { row: usize, field: &'static str },
    #[error("row {row}: project name is empty")]
    EmptyName { row: usize },
    #[error("duplicate project name '{name}'")]
    DuplicateName { name: String },
}

/// Per-project metrics failures. The dashboard renders a placeholder for the
/// affected project and keeps going.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MetricsError {
    #[error("gross profit undefined for '{project}': contract revenue is zero")]
    DivisionByZero { project: String },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SelectionError {
    #[error("no project named '{name}' in the current portfolio")]
    NoSuchProject { name: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("poc_floor must be finite and in (0, 1], got {0}")]
    InvalidPocFloor(f64),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Validation(#[from] ValidationError),
}
