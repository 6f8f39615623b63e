use crate::filters::same_id;
use crate::selection::GeoSelection;
use crate::types::Ward;

/// Wards in ascending `code` order, narrowed to the selected ward if any.
///
/// Sorting happens before narrowing so ordering does not depend on the
/// selection. A missing code sorts as `0`.
pub fn select_filtered_wards<'a>(wards: &'a [Ward], geo: &GeoSelection) -> Vec<&'a Ward> {
    let mut sorted: Vec<&Ward> = wards.iter().collect();
    sorted.sort_by(|a, b| a.sort_code().total_cmp(&b.sort_code()));

    match geo.selected_ward.as_ref() {
        Some(selected) => {
            let result: Vec<&Ward> = sorted
                .into_iter()
                .filter(|ward| same_id(ward.id.as_deref(), selected.id()))
                .take(1)
                .collect();
            tracing::debug!(branch = "ward", matched = result.len(), "Filtered wards");
            result
        }
        None => {
            tracing::debug!(branch = "all", matched = sorted.len(), "Filtered wards");
            sorted
        }
    }
}
