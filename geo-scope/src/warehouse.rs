//! Warehouse ingestion.
//!
//! The upstream store hands over one JSON document holding every entity
//! collection. Reading it never fails on shape: missing or non-array
//! collections become empty and non-object records are dropped. Each such
//! coercion is recorded in an [`IngestReport`] so tooling can inspect data
//! quality, and strict mode turns a non-empty report into an error.

use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::WarehouseConfig;
use crate::error::GeoScopeError;
use crate::filters::{index_erfs_by_id, ErfIndex};
use crate::library::{build_geo_library, GeoLibrary};
use crate::types::{Erf, GeoEntry, Meter, Premise, Transaction, Ward};

/// Flat, denormalized entity collections.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Warehouse {
    pub wards: Vec<Ward>,
    pub erfs: Vec<Erf>,
    pub prems: Vec<Premise>,
    pub meters: Vec<Meter>,
    pub trns: Vec<Transaction>,
    /// Precomputed erf geometry index keyed by id
    pub erf_geo_entries: BTreeMap<String, GeoEntry>,
}

/// One coercion applied while reading a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestIssue {
    /// Collection name as it appears in the document
    pub collection: String,
    /// Array index or map key of the offending record; `None` for the
    /// collection itself
    pub location: Option<String>,
    pub reason: String,
}

impl fmt::Display for IngestIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{}[{}]: {}", self.collection, location, self.reason),
            None => write!(f, "{}: {}", self.collection, self.reason),
        }
    }
}

/// Everything coerced while reading a document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub issues: Vec<IngestIssue>,
}

impl IngestReport {
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    fn push(&mut self, collection: &str, location: Option<String>, reason: impl Into<String>) {
        let issue = IngestIssue {
            collection: collection.to_string(),
            location,
            reason: reason.into(),
        };
        tracing::warn!(issue = %issue, "Coerced malformed warehouse input");
        self.issues.push(issue);
    }
}

impl Warehouse {
    /// Read a warehouse document, repairing whatever is malformed.
    pub fn from_value(value: &Value) -> Self {
        let mut report = IngestReport::default();
        Self::read(value, &mut report)
    }

    /// Parse warehouse JSON text.
    ///
    /// Only invalid JSON syntax is an error; shape problems are repaired.
    pub fn from_json_str(json: &str) -> Result<Self, GeoScopeError> {
        let value: Value = serde_json::from_str(json)?;
        Ok(Self::from_value(&value))
    }

    /// Read a warehouse document and report every coercion applied.
    ///
    /// With `config.strict` set, any coercion fails the whole read.
    pub fn ingest(
        value: &Value,
        config: &WarehouseConfig,
    ) -> Result<(Self, IngestReport), GeoScopeError> {
        let mut report = IngestReport::default();
        let warehouse = Self::read(value, &mut report);

        if config.strict {
            if let Some(first) = report.issues.first() {
                return Err(GeoScopeError::Malformed(format!(
                    "{} issue(s), first: {}",
                    report.len(),
                    first
                )));
            }
        }

        tracing::info!(
            wards = warehouse.wards.len(),
            erfs = warehouse.erfs.len(),
            prems = warehouse.prems.len(),
            meters = warehouse.meters.len(),
            trns = warehouse.trns.len(),
            geo_entries = warehouse.erf_geo_entries.len(),
            issues = report.len(),
            "Ingested warehouse"
        );
        Ok((warehouse, report))
    }

    /// Erf lookup for premise ward resolution.
    pub fn erf_by_id(&self) -> ErfIndex<'_> {
        index_erfs_by_id(&self.erfs)
    }

    /// Merged ward / geometry lookup.
    pub fn geo_library(&self) -> GeoLibrary {
        build_geo_library(&self.wards, &self.erf_geo_entries)
    }

    fn read(value: &Value, report: &mut IngestReport) -> Self {
        let root = match value {
            Value::Object(map) => Some(map),
            Value::Null => None,
            other => {
                report.push("$", None, format!("expected an object, found {}", kind(other)));
                None
            }
        };
        let field = |name: &str| root.and_then(|map| map.get(name));

        Self {
            wards: collection(field("wards"), "wards", report),
            erfs: collection(field("erfs"), "erfs", report),
            prems: collection(field("prems"), "prems", report),
            meters: collection(field("meters"), "meters", report),
            trns: collection(field("trns"), "trns", report),
            erf_geo_entries: geo_entries(field("erfGeoEntries"), report),
        }
    }
}

fn collection<T: DeserializeOwned>(
    value: Option<&Value>,
    name: &str,
    report: &mut IngestReport,
) -> Vec<T> {
    match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| record(item, name, index.to_string(), report))
            .collect(),
        Some(other) => {
            report.push(name, None, format!("expected an array, found {}", kind(other)));
            Vec::new()
        }
    }
}

fn geo_entries(value: Option<&Value>, report: &mut IngestReport) -> BTreeMap<String, GeoEntry> {
    const NAME: &str = "erfGeoEntries";
    match value {
        None | Some(Value::Null) => BTreeMap::new(),
        Some(Value::Object(entries)) => entries_by_key(entries, NAME, report),
        Some(other) => {
            report.push(NAME, None, format!("expected an object, found {}", kind(other)));
            BTreeMap::new()
        }
    }
}

fn entries_by_key(
    entries: &Map<String, Value>,
    name: &str,
    report: &mut IngestReport,
) -> BTreeMap<String, GeoEntry> {
    entries
        .iter()
        .filter_map(|(key, item)| {
            record(item, name, key.clone(), report).map(|entry| (key.clone(), entry))
        })
        .collect()
}

fn record<T: DeserializeOwned>(
    item: &Value,
    name: &str,
    location: String,
    report: &mut IngestReport,
) -> Option<T> {
    if !item.is_object() {
        report.push(name, Some(location), format!("expected an object, found {}", kind(item)));
        return None;
    }
    match serde_json::from_value(item.clone()) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            report.push(name, Some(location), err.to_string());
            None
        }
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
