use crate::filters::same_id;
use crate::selection::GeoSelection;
use crate::types::Transaction;

/// Transactions scoped to the most specific selected level, in input order.
///
/// Precedence: premise, erf, ward, all. Transactions are not meter scoped, so
/// a selected meter is ignored.
pub fn select_filtered_transactions<'a>(
    trns: &'a [Transaction],
    geo: &GeoSelection,
) -> Vec<&'a Transaction> {
    let (branch, selected_id, key): (&str, Option<&str>, fn(&Transaction) -> Option<&str>) =
        if let Some(selected) = &geo.selected_premise {
            ("premise", selected.id(), Transaction::premise_id)
        } else if let Some(selected) = &geo.selected_erf {
            ("erf", selected.id(), Transaction::erf_id)
        } else if let Some(selected) = &geo.selected_ward {
            ("ward", selected.id(), Transaction::ward_id)
        } else {
            tracing::debug!(branch = "all", matched = trns.len(), "Filtered transactions");
            return trns.iter().collect();
        };

    let result: Vec<&Transaction> = trns
        .iter()
        .filter(|trn| same_id(key(trn), selected_id))
        .collect();

    tracing::debug!(branch, matched = result.len(), "Filtered transactions");
    result
}

/// Transactions created by the user `uid`, in input order.
pub fn select_transactions_by_actor<'a>(trns: &'a [Transaction], uid: &str) -> Vec<&'a Transaction> {
    let result: Vec<&Transaction> = trns
        .iter()
        .filter(|trn| same_id(trn.actor_uid(), Some(uid)))
        .collect();

    tracing::debug!(uid = %uid, matched = result.len(), "Filtered transactions by actor");
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids<'a>(trns: &[&'a Transaction]) -> Vec<&'a str> {
        trns.iter().filter_map(|t| t.id.as_deref()).collect()
    }

    fn fixture() -> Vec<Transaction> {
        vec![
            Transaction::new("t1", "p1", "e1", "w1").with_actor("u1"),
            Transaction::new("t2", "p2", "e1", "w1").with_actor("u2"),
            Transaction::new("t3", "p3", "e2", "w2").with_actor("u1"),
            Transaction::default(),
        ]
    }

    #[test]
    fn test_premise_beats_ward() {
        let trns = fixture();
        let geo = GeoSelection::default().with_ward("w2").with_premise("p1");
        assert_eq!(ids(&select_filtered_transactions(&trns, &geo)), vec!["t1"]);
    }

    #[test]
    fn test_erf_and_ward_levels() {
        let trns = fixture();
        let by_erf = GeoSelection::default().with_ward("w2").with_erf("e1");
        assert_eq!(ids(&select_filtered_transactions(&trns, &by_erf)), vec!["t1", "t2"]);

        let by_ward = GeoSelection::default().with_ward("w2");
        assert_eq!(ids(&select_filtered_transactions(&trns, &by_ward)), vec!["t3"]);
    }

    #[test]
    fn test_selected_meter_is_ignored() {
        let trns = fixture();
        let geo = GeoSelection::default().with_meter("m1");
        assert_eq!(select_filtered_transactions(&trns, &geo).len(), 4);

        let with_erf = GeoSelection::default().with_meter("m1").with_erf("e2");
        assert_eq!(ids(&select_filtered_transactions(&trns, &with_erf)), vec!["t3"]);
    }

    #[test]
    fn test_by_actor() {
        let trns = fixture();
        assert_eq!(ids(&select_transactions_by_actor(&trns, "u1")), vec!["t1", "t3"]);
        assert!(select_transactions_by_actor(&trns, "nobody").is_empty());
    }
}
