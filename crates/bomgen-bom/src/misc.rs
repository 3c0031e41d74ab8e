//! Misc-component synthesis.
//!
//! Generic parts that legitimately carry no MPN (lab-stock resistors,
//! capacitors) get a synthetic one derived from category and value, and
//! are routed to the in-house "Lab" pseudo-supplier.

use crate::component::{category_of, Component};
use crate::issues::{Issue, IssueSink};
use crate::LAB_SUPPLIER;

/// Sentinel MPN for components missing both MPN and value. It collides on
/// purpose so all such broken components group together instead of
/// silently vanishing.
pub const MISSING_MPN_AND_VALUE: &str = "MissingMPNandValue";

/// Assign synthetic MPNs to components still lacking one after expansion.
pub fn assign_misc_components(
    mut components: Vec<Component>,
    issues: &mut IssueSink,
) -> Vec<Component> {
    for component in &mut components {
        if component.mpn.is_some() {
            continue;
        }
        match &component.value {
            Some(value) => {
                let mpn = format!("{}{}", category_of(&component.reference), value);
                component
                    .skus
                    .insert(LAB_SUPPLIER.to_string(), Some(mpn.clone()));
                component.mpn = Some(mpn);
            }
            None => {
                component.mpn = Some(MISSING_MPN_AND_VALUE.to_string());
                issues.push(Issue::MissingMpnAndValue {
                    reference: component.reference.clone(),
                });
            }
        }
    }
    components
}
