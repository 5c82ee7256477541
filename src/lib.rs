//! storepulse: attendance & sales analytics engine.
//!
//! A pure, stateless transformation from raw event streams (attendance
//! check-in/out, point-of-sale transactions) plus master-data mappings
//! into two derived views: a live dashboard aggregate (windowed KPIs,
//! daily timeline, weekday×hour heatmaps, top-N rollups, check-in/revenue
//! correlation, threshold alerts) and a unit-normalized multi-month sales
//! comparison report per employee.
//!
//! The engine performs no I/O and holds no process-wide state: callers
//! fetch raw records and master data themselves, pass a reference
//! instant, and get back plain serializable structs. Malformed records
//! are absorbed at the normalization boundary; only construction-time
//! configuration problems are errors.

pub mod alerts;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod heatmap;
pub mod kpi;
pub mod normalize;
pub mod rollup;
pub mod sales_report;
pub mod stats;
pub mod timezone;
pub mod types;
pub mod units;

pub use config::{AlertThresholds, EngineConfig};
pub use dashboard::{build_dashboard, DashboardAggregate, DashboardInput};
pub use error::EngineError;
pub use sales_report::{build_sales_comparison, SalesComparisonReport, SalesReportInput};
pub use types::{EventScope, MasterData, ProductInfo, RawEvent};
