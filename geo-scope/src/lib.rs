//! Geo-scoped filtering for utility meter audit field operations
//!
//! This crate is the filtering core behind the field UI. It takes a flat,
//! denormalized warehouse of entities and a selection context, and returns
//! consistently scoped subsets of every entity collection:
//!
//! - **Ward**: administrative subdivision, top of the hierarchy
//! - **Erf**: cadastral land parcel inside a ward
//! - **Premise**: property located on an erf
//! - **Meter**: measurement device tied to a premise
//! - **Transaction**: field event tied to a premise, erf and ward
//!
//! # Key Components
//!
//! - [`GeoSelection`]: the caller-owned focus (ward, erf, premise or meter)
//! - [`Timestamp`] and [`to_millis`]: heterogeneous timestamp normalization
//! - [`build_geo_library`]: merged ward / erf-geometry lookup
//! - [`filters`]: one pure projection per entity kind
//! - [`Warehouse`]: lenient ingestion of the upstream JSON document
//! - [`scope()`]: runs every filter against one selection
//!
//! # Example
//!
//! ```ignore
//! use geo_scope::{scope, GeoSelection, Warehouse};
//!
//! let warehouse = Warehouse::from_json_str(&document)?;
//! let geo = GeoSelection::default().with_ward("ZA1048001");
//!
//! let view = scope(&warehouse, &geo);
//! println!("{} erfs in ward", view.summary.erfs);
//! ```

pub mod config;
pub mod error;
pub mod filters;
pub mod library;
pub mod scope;
pub mod selection;
pub mod timestamp;
pub mod types;
pub mod warehouse;

mod lenient;

// Re-export main types
pub use config::{GeneralConfig, GeoScopeConfig, WarehouseConfig};
pub use error::GeoScopeError;
pub use filters::{
    erf_in_ward, index_erfs_by_id, select_filtered_erfs, select_filtered_meters,
    select_filtered_premises, select_filtered_transactions, select_filtered_wards,
    select_transactions_by_actor, ErfIndex,
};
pub use library::{build_geo_library, GeoLibrary, GeoLibraryEntry};
pub use scope::{scope, ScopeSummary, ScopedView};
pub use selection::{Focus, GeoSelection, Selected};
pub use timestamp::{to_millis, Timestamp};
pub use types::*;
pub use warehouse::{IngestIssue, IngestReport, Warehouse};
