use crate::filters::{erf_in_ward, same_id, ErfIndex};
use crate::selection::GeoSelection;
use crate::types::Premise;

/// Premises scoped to the selection, in input order.
///
/// Precedence: selected premise, then selected erf (via `erfId`), then
/// selected ward (via the parent erf looked up in `erf_by_id`), then all.
pub fn select_filtered_premises<'a>(
    prems: &'a [Premise],
    erf_by_id: &ErfIndex<'_>,
    geo: &GeoSelection,
) -> Vec<&'a Premise> {
    let (branch, result): (&str, Vec<&Premise>) = if let Some(selected) = &geo.selected_premise {
        (
            "premise",
            prems
                .iter()
                .filter(|premise| same_id(premise.id.as_deref(), selected.id()))
                .collect(),
        )
    } else if let Some(selected) = &geo.selected_erf {
        (
            "erf",
            prems
                .iter()
                .filter(|premise| same_id(premise.erf_id.as_deref(), selected.id()))
                .collect(),
        )
    } else if let Some(selected) = &geo.selected_ward {
        let result = match selected.id() {
            Some(ward_id) => prems
                .iter()
                .filter(|premise| {
                    premise
                        .erf_id
                        .as_deref()
                        .and_then(|erf_id| erf_by_id.get(erf_id))
                        .is_some_and(|erf| erf_in_ward(erf, ward_id))
                })
                .collect(),
            None => Vec::new(),
        };
        ("ward", result)
    } else {
        ("all", prems.iter().collect())
    };

    tracing::debug!(branch, matched = result.len(), "Filtered premises");
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::index_erfs_by_id;
    use crate::types::{Erf, ErfAdmin, WardRef};

    fn ids<'a>(prems: &[&'a Premise]) -> Vec<&'a str> {
        prems.iter().filter_map(|p| p.id.as_deref()).collect()
    }

    fn fixture() -> (Vec<Erf>, Vec<Premise>) {
        let legacy = Erf {
            id: Some("e3".to_string()),
            admin: Some(ErfAdmin {
                ward: Some(WardRef {
                    pcode: Some("w1".to_string()),
                    ..Default::default()
                }),
                ..Default::default()
            }),
            ..Default::default()
        };
        let erfs = vec![Erf::new("e1", "w1"), Erf::new("e2", "w2"), legacy];
        let prems = vec![
            Premise::new("p1", "e1"),
            Premise::new("p2", "e2"),
            Premise::new("p3", "e3"),
            Premise::new("p4", "e-unknown"),
            Premise {
                id: Some("p5".to_string()),
                ..Default::default()
            },
            Premise::new("p6", "e1"),
        ];
        (erfs, prems)
    }

    #[test]
    fn test_all_in_input_order() {
        let (erfs, prems) = fixture();
        let index = index_erfs_by_id(&erfs);
        let result = select_filtered_premises(&prems, &index, &GeoSelection::default());
        assert_eq!(ids(&result), vec!["p1", "p2", "p3", "p4", "p5", "p6"]);
    }

    #[test]
    fn test_selected_premise() {
        let (erfs, prems) = fixture();
        let index = index_erfs_by_id(&erfs);
        let geo = GeoSelection::default().with_erf("e2").with_premise("p6");
        assert_eq!(ids(&select_filtered_premises(&prems, &index, &geo)), vec!["p6"]);
    }

    #[test]
    fn test_selected_erf() {
        let (erfs, prems) = fixture();
        let index = index_erfs_by_id(&erfs);
        let geo = GeoSelection::default().with_ward("w2").with_erf("e1");
        assert_eq!(ids(&select_filtered_premises(&prems, &index, &geo)), vec!["p1", "p6"]);
    }

    #[test]
    fn test_selected_ward_through_erf_index() {
        let (erfs, prems) = fixture();
        let index = index_erfs_by_id(&erfs);
        let geo = GeoSelection::default().with_ward("w1");
        assert_eq!(
            ids(&select_filtered_premises(&prems, &index, &geo)),
            vec!["p1", "p3", "p6"]
        );
    }

    #[test]
    fn test_selected_ward_with_empty_index() {
        let (_, prems) = fixture();
        let geo = GeoSelection::default().with_ward("w1");
        assert!(select_filtered_premises(&prems, &ErfIndex::new(), &geo).is_empty());
    }
}
