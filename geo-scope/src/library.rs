//! Geo library: one lookup over wards and the erf geometry index.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::types::{GeoEntry, Ward};

/// An entry in the merged geo library.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GeoLibraryEntry {
    Ward(Ward),
    Geo(GeoEntry),
}

impl GeoLibraryEntry {
    pub fn as_ward(&self) -> Option<&Ward> {
        match self {
            Self::Ward(ward) => Some(ward),
            Self::Geo(_) => None,
        }
    }
}

/// Identifier → ward or geometry stub, in key order.
pub type GeoLibrary = BTreeMap<String, GeoLibraryEntry>;

/// Merge the erf geometry index and the ward list into one lookup.
///
/// Geometry entries go in first and wards second, so a ward overrides a stub
/// sharing its id. Wards without an id cannot be keyed and are skipped.
pub fn build_geo_library(
    wards: &[Ward],
    erf_geo_entries: &BTreeMap<String, GeoEntry>,
) -> GeoLibrary {
    let mut library: GeoLibrary = erf_geo_entries
        .iter()
        .map(|(id, entry)| (id.clone(), GeoLibraryEntry::Geo(entry.clone())))
        .collect();

    let mut skipped = 0usize;
    for ward in wards {
        match ward.id.as_deref() {
            Some(id) => {
                library.insert(id.to_string(), GeoLibraryEntry::Ward(ward.clone()));
            }
            None => skipped += 1,
        }
    }

    tracing::debug!(
        entries = library.len(),
        geo_entries = erf_geo_entries.len(),
        wards = wards.len(),
        skipped,
        "Built geo library"
    );
    library
}
