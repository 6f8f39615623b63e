use std::cmp::Reverse;

use crate::filters::{erf_in_ward, same_id};
use crate::selection::GeoSelection;
use crate::types::Erf;

/// Erfs scoped to the selection, newest `metadata.updatedAt` first.
///
/// Precedence: selected erf, then selected ward (id or pcode match), then all.
/// Recently touched parcels surface first for field triage; ties keep input
/// order.
pub fn select_filtered_erfs<'a>(erfs: &'a [Erf], geo: &GeoSelection) -> Vec<&'a Erf> {
    let (branch, mut result): (&str, Vec<&Erf>) = if let Some(selected) = &geo.selected_erf {
        (
            "erf",
            erfs.iter()
                .filter(|erf| same_id(erf.id.as_deref(), selected.id()))
                .collect(),
        )
    } else if let Some(selected) = &geo.selected_ward {
        let result = match selected.id() {
            Some(ward_id) => erfs.iter().filter(|erf| erf_in_ward(erf, ward_id)).collect(),
            None => Vec::new(),
        };
        ("ward", result)
    } else {
        ("all", erfs.iter().collect())
    };

    result.sort_by_cached_key(|erf| Reverse(erf.updated_at_millis()));

    tracing::debug!(branch, matched = result.len(), "Filtered erfs");
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timestamp::Timestamp;
    use crate::types::{ErfAdmin, WardRef};

    fn erf_at(id: &str, ward_id: &str, millis: i64) -> Erf {
        Erf::new(id, ward_id).with_updated_at(Timestamp::Native { millis })
    }

    fn ids<'a>(erfs: &[&'a Erf]) -> Vec<&'a str> {
        erfs.iter().filter_map(|e| e.id.as_deref()).collect()
    }

    #[test]
    fn test_unfiltered_newest_first() {
        let erfs = vec![erf_at("e1", "w1", 100), erf_at("e3", "w1", 300), erf_at("e2", "w2", 200)];
        let result = select_filtered_erfs(&erfs, &GeoSelection::default());
        assert_eq!(ids(&result), vec!["e3", "e2", "e1"]);
    }

    #[test]
    fn test_mixed_timestamp_shapes_order() {
        let erfs = vec![
            Erf::new("iso", "w1").with_updated_at(Timestamp::Iso("1970-01-01T00:00:02Z".into())),
            Erf::new("secs", "w1").with_updated_at(Timestamp::Seconds {
                seconds: 3.0,
                nanoseconds: None,
            }),
            Erf::new("none", "w1"),
            Erf::new("native", "w1").with_updated_at(Timestamp::Native { millis: 2500 }),
        ];
        let result = select_filtered_erfs(&erfs, &GeoSelection::default());
        assert_eq!(ids(&result), vec!["secs", "native", "iso", "none"]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let erfs = vec![Erf::new("a", "w1"), Erf::new("b", "w1"), Erf::new("c", "w1")];
        let result = select_filtered_erfs(&erfs, &GeoSelection::default());
        assert_eq!(ids(&result), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_selected_erf_wins_over_ward() {
        let erfs = vec![erf_at("e1", "w1", 1), erf_at("e2", "w1", 2)];
        let geo = GeoSelection::default().with_ward("w1").with_erf("e1");
        assert_eq!(ids(&select_filtered_erfs(&erfs, &geo)), vec!["e1"]);
    }

    #[test]
    fn test_ward_matches_legacy_pcode() {
        let legacy = Erf {
            id: Some("e9".to_string()),
            admin: Some(ErfAdmin {
                ward: Some(WardRef {
                    id: Some("some-other-id".to_string()),
                    pcode: Some("ZA1048001".to_string()),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        };
        let erfs = vec![legacy, erf_at("e1", "w1", 5), erf_at("e2", "ZA1048001", 1)];
        let geo = GeoSelection::default().with_ward("ZA1048001");
        assert_eq!(ids(&select_filtered_erfs(&erfs, &geo)), vec!["e2", "e9"]);
    }

    #[test]
    fn test_missing_admin_does_not_match_ward() {
        let erfs = vec![Erf::default(), erf_at("e1", "w1", 1)];
        let geo = GeoSelection::default().with_ward("w1");
        assert_eq!(ids(&select_filtered_erfs(&erfs, &geo)), vec!["e1"]);
    }
}
