pub mod aggregate;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod forecast;
pub mod load;
pub mod region;
pub mod render;
pub mod stats;

pub use config::DashboardConfig;
pub use dashboard::{Dashboard, DashboardOutcome};
pub use error::{PopError, Result};
pub use load::{load_population, load_population_bytes, load_population_path, PopulationRecord, PopulationTable};
