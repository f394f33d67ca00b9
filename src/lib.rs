//! Project portfolio performance engine.
//!
//! Loads a validated snapshot of construction/infrastructure projects, derives
//! their cost KPIs (gross profit %, EAC, ETC, variance), tracks which project a
//! dashboard session has selected, and previews "what-if" completion values.
//! Map drawing and layout belong to whatever front end links this crate; it
//! gets plain data from [`reports`] and [`session::Session::render`].
pub mod config;
pub mod error;
pub mod loader;
pub mod metrics;
pub mod output;
pub mod reports;
pub mod selection;
pub mod session;
pub mod store;
pub mod types;
pub mod util;

pub use config::MetricsConfig;
pub use error::{ConfigError, LoadError, MetricsError, SelectionError, ValidationError};
pub use metrics::{EacSource, MetricsEngine};
pub use selection::{SelectionEvent, SelectionSource, SelectionState};
pub use session::{ProjectView, Session};
pub use store::ProjectStore;
pub use types::{DerivedMetrics, ProjectRecord};
