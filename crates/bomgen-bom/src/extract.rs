//! Extraction of [`Component`] records from the KiCad `python-bom` XML
//! export.
//!
//! The export looks like:
//!
//! ```xml
//! <export version="E">
//!   <components>
//!     <comp ref="R1">
//!       <value>10k</value>
//!       <property name="MPN" value="..."/>
//!       <property name="Mouser" value="..."/>
//!     </comp>
//!   </components>
//! </export>
//! ```
//!
//! Property lookup is case-sensitive exact-match on the property name. A
//! document without a `components` section yields an empty list, not an
//! error.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::component::Component;

/// Property name carrying the manufacturer part number.
pub const MPN_PROPERTY: &str = "MPN";

/// Parse an exported XML BOM file into a flat component list.
///
/// `suppliers` are the property names to read SKUs from, one per supplier.
pub fn parse_bom_file(path: &Path, suppliers: &[String]) -> Result<Vec<Component>> {
    let xml = fs::read_to_string(path)
        .with_context(|| format!("failed to read exported BOM {}", path.display()))?;
    parse_bom_xml(&xml, suppliers)
}

/// Parse the exported XML BOM document into a flat component list.
pub fn parse_bom_xml(xml: &str, suppliers: &[String]) -> Result<Vec<Component>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut components = Vec::new();
    let mut in_components = false;
    let mut in_value = false;
    let mut reference: Option<String> = None;
    let mut value: Option<String> = None;
    let mut properties: Vec<(String, String)> = Vec::new();

    let mut buf = Vec::new();
    loop {
        match reader
            .read_event_into(&mut buf)
            .context("malformed BOM XML")?
        {
            Event::Start(e) => match e.name().as_ref() {
                b"components" => in_components = true,
                b"comp" if in_components => {
                    reference = attribute(&e, b"ref")?;
                    value = None;
                    properties.clear();
                }
                b"value" if in_components && reference.is_some() => in_value = true,
                b"property" if reference.is_some() => push_property(&e, &mut properties)?,
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"property" if reference.is_some() => push_property(&e, &mut properties)?,
                // Self-closing comp: a component with no value and no
                // properties at all.
                b"comp" if in_components => {
                    if let Some(reference) = attribute(&e, b"ref")? {
                        components.push(build_component(reference, None, &[], suppliers));
                    }
                }
                _ => {}
            },
            Event::Text(t) if in_value => {
                value = Some(t.unescape().context("malformed BOM XML")?.into_owned());
            }
            Event::End(e) => match e.name().as_ref() {
                b"value" => in_value = false,
                b"comp" => {
                    // A comp without a ref attribute is malformed; skip it
                    // rather than failing the whole export.
                    if let Some(reference) = reference.take() {
                        components.push(build_component(
                            reference,
                            value.take(),
                            &properties,
                            suppliers,
                        ));
                    }
                }
                b"components" => in_components = false,
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(components)
}

fn attribute(e: &BytesStart, name: &[u8]) -> Result<Option<String>> {
    for attr in e.attributes() {
        let attr = attr.context("malformed BOM XML attribute")?;
        if attr.key.as_ref() == name {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn push_property(e: &BytesStart, properties: &mut Vec<(String, String)>) -> Result<()> {
    let name = attribute(e, b"name")?;
    let value = attribute(e, b"value")?;
    if let (Some(name), Some(value)) = (name, value) {
        properties.push((name, value));
    }
    Ok(())
}

fn build_component(
    reference: String,
    value: Option<String>,
    properties: &[(String, String)],
    suppliers: &[String],
) -> Component {
    let find = |name: &str| {
        properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.clone())
    };

    let mut skus = BTreeMap::new();
    for supplier in suppliers {
        if let Some(sku) = find(supplier) {
            skus.insert(supplier.clone(), Some(sku));
        }
    }

    Component {
        reference,
        value,
        mpn: find(MPN_PROPERTY),
        skus,
    }
}
