use crate::filters::same_id;
use crate::selection::GeoSelection;
use crate::types::{Meter, Record};

/// Meters scoped to the most specific selected level, in input order.
///
/// Precedence: meter, premise, erf, ward, all. Exactly one level is applied;
/// levels are never combined.
pub fn select_filtered_meters<'a>(meters: &'a [Meter], geo: &GeoSelection) -> Vec<&'a Meter> {
    let (branch, selected_id, key): (&str, Option<&str>, fn(&Meter) -> Option<&str>) =
        if let Some(selected) = &geo.selected_meter {
            ("meter", selected.id(), <Meter as Record>::id)
        } else if let Some(selected) = &geo.selected_premise {
            ("premise", selected.id(), Meter::premise_id)
        } else if let Some(selected) = &geo.selected_erf {
            ("erf", selected.id(), Meter::erf_id)
        } else if let Some(selected) = &geo.selected_ward {
            ("ward", selected.id(), Meter::ward_id)
        } else {
            tracing::debug!(branch = "all", matched = meters.len(), "Filtered meters");
            return meters.iter().collect();
        };

    let result: Vec<&Meter> = meters
        .iter()
        .filter(|meter| same_id(key(meter), selected_id))
        .collect();

    tracing::debug!(branch, matched = result.len(), "Filtered meters");
    result
}
