//! Entity filters.
//!
//! One pure projection per entity kind. Each takes the full collection and the
//! caller's [`GeoSelection`](crate::GeoSelection) and returns the scoped subset
//! as borrowed records in a freshly allocated vector. Inputs are never
//! mutated and nothing is retained between calls.
//!
//! Ownership is traced through stored references only: premises reach their
//! ward through the erf index, meters and transactions through their
//! denormalized `wardId`.

mod erf;
mod meter;
mod premise;
mod transaction;
mod ward;

use std::collections::HashMap;

pub use erf::select_filtered_erfs;
pub use meter::select_filtered_meters;
pub use premise::select_filtered_premises;
pub use transaction::{select_filtered_transactions, select_transactions_by_actor};
pub use ward::select_filtered_wards;

use crate::types::Erf;

/// Auxiliary erf lookup used to resolve a premise's ward.
pub type ErfIndex<'a> = HashMap<&'a str, &'a Erf>;

/// Index erfs by id. The first erf wins on duplicate ids; erfs without an id
/// are left out.
pub fn index_erfs_by_id(erfs: &[Erf]) -> ErfIndex<'_> {
    let mut index = HashMap::with_capacity(erfs.len());
    for erf in erfs {
        if let Some(id) = erf.id.as_deref() {
            index.entry(id).or_insert(erf);
        }
    }
    index
}

/// Whether an erf belongs to the ward with `ward_id`.
///
/// Two identifier schemes coexist in the data: the erf's ward reference
/// matches on either its `id` or its legacy `pcode`.
pub fn erf_in_ward(erf: &Erf, ward_id: &str) -> bool {
    erf.ward_ref().is_some_and(|ward| {
        ward.id.as_deref() == Some(ward_id) || ward.pcode.as_deref() == Some(ward_id)
    })
}

/// Equality that never matches an absent side.
pub(crate) fn same_id(candidate: Option<&str>, selected: Option<&str>) -> bool {
    matches!((candidate, selected), (Some(a), Some(b)) if a == b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ErfAdmin, WardRef};

    fn erf_with_ref(id: &str, ward_id: Option<&str>, pcode: Option<&str>) -> Erf {
        Erf {
            id: Some(id.to_string()),
            admin: Some(ErfAdmin {
                ward: Some(WardRef {
                    id: ward_id.map(str::to_string),
                    pcode: pcode.map(str::to_string),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_erf_in_ward_by_id_or_pcode() {
        let by_id = erf_with_ref("e1", Some("w1"), None);
        let by_pcode = erf_with_ref("e2", Some("legacy-7"), Some("ZA1048001"));

        assert!(erf_in_ward(&by_id, "w1"));
        assert!(!erf_in_ward(&by_id, "w2"));
        assert!(erf_in_ward(&by_pcode, "ZA1048001"));
        assert!(erf_in_ward(&by_pcode, "legacy-7"));
    }

    #[test]
    fn test_erf_in_ward_missing_admin() {
        assert!(!erf_in_ward(&Erf::default(), "w1"));
        assert!(!erf_in_ward(&erf_with_ref("e1", None, None), "w1"));
    }

    #[test]
    fn test_index_first_wins_and_skips_missing_ids() {
        let erfs = vec![
            Erf::new("e1", "w1"),
            Erf::new("e1", "w2"),
            Erf::default(),
        ];
        let index = index_erfs_by_id(&erfs);

        assert_eq!(index.len(), 1);
        assert!(erf_in_ward(index["e1"], "w1"));
    }

    #[test]
    fn test_same_id_never_matches_absent() {
        assert!(same_id(Some("a"), Some("a")));
        assert!(!same_id(Some("a"), Some("b")));
        assert!(!same_id(None, None));
        assert!(!same_id(Some("a"), None));
    }
}
