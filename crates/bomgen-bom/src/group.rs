//! Grouping: fold the normalized component list into one
//! [`ComponentGroup`] per distinct MPN.

use std::collections::BTreeMap;

use crate::component::{Component, ComponentGroup};
use crate::issues::{Issue, IssueSink};

/// Group components by MPN with a stable left-to-right fold.
///
/// The first component seen for an MPN seeds the group's SKUs; later
/// duplicates only increment the count. Every component is expected to
/// carry an MPN at this point; one that does not is skipped with a
/// programming-bug issue.
pub fn group_components(
    components: Vec<Component>,
    issues: &mut IssueSink,
) -> BTreeMap<String, ComponentGroup> {
    log::info!("Grouping {} components", components.len());
    let mut groups: BTreeMap<String, ComponentGroup> = BTreeMap::new();
    for component in components {
        let Some(mpn) = component.mpn else {
            issues.push(Issue::MissingMpnAtGrouping {
                reference: component.reference,
            });
            continue;
        };

        match groups.get_mut(&mpn) {
            Some(group) => group.count += 1,
            None => {
                groups.insert(mpn, ComponentGroup::new(component.skus));
            }
        }
    }
    groups
}
