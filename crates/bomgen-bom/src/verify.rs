//! Verification pass: every component must have a traceable MPN and at
//! least one supplier SKU, unless its category is exempt.
//!
//! Verification never mutates components and never halts the pipeline; its
//! only effect is issue accumulation.

use std::collections::BTreeSet;

use crate::component::{category_of, Component};
use crate::issues::{Issue, IssueSink};
use crate::NO_MPN;

/// Check all components against the MPN/SKU rules.
///
/// `exempt` holds the reference categories allowed to omit an MPN (test
/// points, mounting hardware, generic passives picked from lab stock —
/// this differs per project, so it is configuration, not a constant).
pub fn verify_components(
    components: &[Component],
    exempt: &BTreeSet<String>,
    issues: &mut IssueSink,
) {
    log::info!("Verifying {} components", components.len());
    for component in components {
        let category = category_of(&component.reference);

        if component.mpn.is_none() && !exempt.contains(&category) {
            issues.push(Issue::MissingMpn {
                reference: component.reference.clone(),
            });
        }

        // A real (non-sentinel) MPN without any SKU cannot be ordered.
        if let Some(mpn) = &component.mpn {
            if mpn != NO_MPN && component.has_no_skus() {
                issues.push(Issue::MissingSku {
                    reference: component.reference.clone(),
                });
            }
        }
    }
}
