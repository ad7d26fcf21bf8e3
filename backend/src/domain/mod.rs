//! # Domain Module
//!
//! Business logic for BizTracker: validated records, the figures derived from
//! them and the documents generated from them. Nothing here touches storage
//! or a UI; callers pass in record snapshots and get values back.
//!
//! ## Module Organization
//!
//! - **models**: Validated expenses, invoices and inventory items
//! - **tax_service**: GST calculation and quarterly GST returns
//! - **metrics_service**: Dashboard metrics, expense and inventory summaries
//! - **series_service**: Monthly trend, category breakdown and chart series
//! - **calendar**: Month grids with the expenses and invoices on each day
//! - **document**: Page layout and encoding of invoices and expense reports
//! - **export_service**: Naming, encoding and writing exported documents
//!
//! ## Business Rules
//!
//! - Money is exact decimal; sums keep full precision and are rounded to
//!   cents (half away from zero) only for presentation
//! - Revenue counts paid invoices only, dated by their issue date
//! - A record that fails validation fails the whole computation it is part of,
//!   as does a total too large to represent

pub mod calendar;
pub mod document;
pub mod errors;
pub mod export_service;
pub mod metrics_service;
pub mod models;
pub mod series_service;
pub mod tax_service;

pub use calendar::*;
pub use errors::{EngineError, EngineResult};
pub use export_service::*;
pub use metrics_service::*;
pub use series_service::*;
pub use tax_service::*;
