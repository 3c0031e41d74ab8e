//! Supplier resolution: pick the highest-priority supplier with a known
//! SKU for every group and bucket the resulting purchase entries per
//! supplier.

use std::collections::BTreeMap;

use crate::component::{BomEntry, ComponentGroup};
use crate::issues::{Issue, IssueSink};
use crate::NO_MPN;

/// Assign every group to the first supplier in `priority` holding a
/// non-null SKU for it. Groups with no resolvable supplier are reported as
/// one aggregate issue. The `NO_MPN` sentinel group is never ordered.
pub fn resolve_suppliers(
    groups: &BTreeMap<String, ComponentGroup>,
    priority: &[String],
    issues: &mut IssueSink,
) -> BTreeMap<String, Vec<BomEntry>> {
    let mut boms: BTreeMap<String, Vec<BomEntry>> = priority
        .iter()
        .map(|supplier| (supplier.clone(), Vec::new()))
        .collect();

    let mut no_supplier: Vec<String> = Vec::new();
    for (mpn, group) in groups {
        if mpn == NO_MPN {
            continue;
        }

        let winner = priority
            .iter()
            .find_map(|supplier| group.sku(supplier).map(|sku| (supplier, sku)));

        match winner {
            Some((supplier, sku)) => {
                boms.entry(supplier.clone()).or_default().push(BomEntry {
                    mpn: mpn.clone(),
                    sku: sku.to_string(),
                    quantity: group.count,
                });
            }
            None => no_supplier.push(mpn.clone()),
        }
    }

    if !no_supplier.is_empty() {
        issues.push(Issue::NoSupplier { mpns: no_supplier });
    }

    boms
}
