use std::collections::BTreeMap;

/// One schematic instance, as extracted from the exported netlist.
///
/// `skus` maps a supplier name to the raw SKU string from the matching
/// schematic property. A missing key or a `None` value both mean "no SKU
/// known from this supplier".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    /// Reference designator, unique within a schematic (e.g. "R12").
    pub reference: String,
    /// Free-text value label (e.g. "10k"), if the symbol has one.
    pub value: Option<String>,
    /// Manufacturer part number, if assigned.
    pub mpn: Option<String>,
    pub skus: BTreeMap<String, Option<String>>,
}

impl Component {
    pub fn new(reference: impl Into<String>) -> Self {
        Component {
            reference: reference.into(),
            value: None,
            mpn: None,
            skus: BTreeMap::new(),
        }
    }

    /// SKU for the given supplier, treating an absent key and an explicit
    /// `None` identically.
    pub fn sku(&self, supplier: &str) -> Option<&str> {
        self.skus.get(supplier).and_then(|s| s.as_deref())
    }

    /// True when no supplier has a usable SKU for this component.
    pub fn has_no_skus(&self) -> bool {
        self.skus.values().all(|s| s.is_none())
    }
}

/// Aggregate of all components sharing a resolved MPN.
///
/// `skus` come from the first component seen for the MPN; later duplicates
/// only increment `count` and never overwrite or merge SKUs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentGroup {
    pub count: u32,
    pub skus: BTreeMap<String, Option<String>>,
}

impl ComponentGroup {
    pub fn new(skus: BTreeMap<String, Option<String>>) -> Self {
        ComponentGroup { count: 1, skus }
    }

    pub fn sku(&self, supplier: &str) -> Option<&str> {
        self.skus.get(supplier).and_then(|s| s.as_deref())
    }
}

/// One purchasable line item, bound for a single supplier CSV.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BomEntry {
    pub mpn: String,
    pub sku: String,
    pub quantity: u32,
}

/// Category of a reference designator: the reference with every digit
/// removed ("R12" -> "R", "TP3" -> "TP").
pub fn category_of(reference: &str) -> String {
    reference.chars().filter(|c| !c.is_ascii_digit()).collect()
}
