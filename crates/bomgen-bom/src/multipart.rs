//! Expansion of multipart components.
//!
//! Some physical placements represent several discrete parts ganged on one
//! schematic symbol (e.g. a dual-diode array), encoded as a `+`-joined MPN
//! with correspondingly `+`-joined SKU strings. Each such component is
//! split into one record per sub-part; the fragment counts must agree or
//! the whole component is discarded with an issue.

use std::collections::BTreeMap;

use crate::component::Component;
use crate::issues::{Issue, IssueSink};

/// Expand `+`-joined multipart components into one record per sub-part.
///
/// `supplier_order` fixes the pairing order of SKU fragments across
/// suppliers. Components without an MPN, or whose MPN holds no `+`, pass
/// through unchanged.
pub fn expand_multipart(
    components: Vec<Component>,
    supplier_order: &[String],
    issues: &mut IssueSink,
) -> Vec<Component> {
    let mut out = Vec::with_capacity(components.len());
    for component in components {
        let Some(mpn) = component.mpn.clone() else {
            out.push(component);
            continue;
        };

        let mpns: Vec<&str> = mpn.trim().split('+').collect();
        if mpns.len() == 1 {
            out.push(component);
            continue;
        }

        // Flatten SKU fragments across suppliers, supplier order first,
        // then within-string split order.
        let mut fragments: Vec<(&str, &str)> = Vec::new();
        for supplier in supplier_order {
            if let Some(sku) = component.sku(supplier) {
                for fragment in sku.trim().split('+') {
                    fragments.push((supplier, fragment));
                }
            }
        }

        if fragments.len() != mpns.len() {
            // Fail-safe discard: expanding a mismatched component would
            // assign fragments to the wrong parts.
            issues.push(Issue::MultipartCountMismatch { mpn });
            continue;
        }

        let total = fragments.len();
        for (index, (supplier, sku)) in fragments.into_iter().enumerate() {
            let mut part = component.clone();
            part.mpn = Some(format!("Multipart {}/{}: {:?}", index + 1, total, mpns));
            // Fresh single-entry map so split siblings never share SKU
            // storage with each other or the original.
            part.skus = BTreeMap::from([(supplier.to_string(), Some(sku.to_string()))]);
            log::debug!("Expanded {:?} -> {:?}", part.mpn, part.skus);
            out.push(part);
        }
    }
    out
}
