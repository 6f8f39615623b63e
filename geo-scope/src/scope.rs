//! One-call composition of every entity filter.
//!
//! Dependent screens (ward list, erf list, premises, meters, transactions)
//! all project the same selection. [`scope`] runs each filter once; the
//! filters stay independent of one another.

use serde::Serialize;

use crate::filters::{
    select_filtered_erfs, select_filtered_meters, select_filtered_premises,
    select_filtered_transactions, select_filtered_wards,
};
use crate::selection::{Focus, GeoSelection};
use crate::types::{Erf, Meter, Premise, Transaction, Ward};
use crate::warehouse::Warehouse;

/// Result counts per entity kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ScopeSummary {
    pub focus: Focus,
    pub wards: usize,
    pub erfs: usize,
    pub premises: usize,
    pub meters: usize,
    pub transactions: usize,
}

/// Every collection scoped to one selection.
#[derive(Debug, Clone, Serialize)]
pub struct ScopedView<'a> {
    pub wards: Vec<&'a Ward>,
    pub erfs: Vec<&'a Erf>,
    pub premises: Vec<&'a Premise>,
    pub meters: Vec<&'a Meter>,
    pub transactions: Vec<&'a Transaction>,
    pub summary: ScopeSummary,
}

/// Scope the whole warehouse to `geo`.
pub fn scope<'a>(warehouse: &'a Warehouse, geo: &GeoSelection) -> ScopedView<'a> {
    let erf_by_id = warehouse.erf_by_id();

    let wards = select_filtered_wards(&warehouse.wards, geo);
    let erfs = select_filtered_erfs(&warehouse.erfs, geo);
    let premises = select_filtered_premises(&warehouse.prems, &erf_by_id, geo);
    let meters = select_filtered_meters(&warehouse.meters, geo);
    let transactions = select_filtered_transactions(&warehouse.trns, geo);

    let summary = ScopeSummary {
        focus: geo.focus(),
        wards: wards.len(),
        erfs: erfs.len(),
        premises: premises.len(),
        meters: meters.len(),
        transactions: transactions.len(),
    };
    tracing::debug!(
        focus = summary.focus.as_str(),
        wards = summary.wards,
        erfs = summary.erfs,
        premises = summary.premises,
        meters = summary.meters,
        transactions = summary.transactions,
        "Scoped warehouse"
    );

    ScopedView {
        wards,
        erfs,
        premises,
        meters,
        transactions,
        summary,
    }
}
