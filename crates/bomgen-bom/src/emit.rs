//! Per-supplier CSV emission.
//!
//! Each requested supplier gets one semicolon-delimited CSV in the output
//! directory. The column set depends on the supplier's output format, a
//! closed set of variants resolved by name: catalog-priced suppliers get
//! live price/stock columns, the Lab pseudo-supplier a bare name/quantity
//! pair. Downstream consolidation parses these files positionally, so the
//! column order is load-bearing.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use csv::Writer;

use bomgen_suppliers::{lookup_with_retry, PartCatalog};

use crate::component::BomEntry;
use crate::issues::{Issue, IssueSink};
use crate::LAB_SUPPLIER;

/// Output format of one supplier's CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupplierFormat {
    /// Structured-API catalog supplier, priced in PLN (Mouser, TME).
    Catalog,
    /// In-house pseudo-supplier; no external lookup.
    Lab,
    /// Web-scraped catalog supplier, priced in USD (LCSC).
    Scraped,
}

impl SupplierFormat {
    /// Resolve a supplier name to its output format. Unknown names get the
    /// catalog treatment, which is what every structured-API supplier uses.
    pub fn for_supplier(name: &str) -> SupplierFormat {
        match name {
            LAB_SUPPLIER => SupplierFormat::Lab,
            "LCSC" => SupplierFormat::Scraped,
            _ => SupplierFormat::Catalog,
        }
    }

    fn currency(self) -> &'static str {
        match self {
            SupplierFormat::Scraped => "USD",
            _ => "zł",
        }
    }
}

/// Write one CSV per supplier bucket into `out_dir` (created if missing).
///
/// `catalogs` maps each catalog-style supplier name to its lookup client;
/// `sleep` is the injectable rate-limit delay.
pub fn write_supplier_csvs(
    boms: &BTreeMap<String, Vec<BomEntry>>,
    out_dir: &Path,
    catalogs: &BTreeMap<String, &dyn PartCatalog>,
    sleep: &mut dyn FnMut(Duration),
    issues: &mut IssueSink,
) -> Result<()> {
    log::info!("Generating CSV BOMs in {}", out_dir.display());
    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    for (supplier, entries) in boms {
        let path = out_dir.join(format!("{supplier}.csv"));
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b';')
            .from_path(&path)
            .with_context(|| format!("failed to create {}", path.display()))?;

        match SupplierFormat::for_supplier(supplier) {
            SupplierFormat::Lab => write_lab_rows(entries, &mut writer)?,
            format @ (SupplierFormat::Catalog | SupplierFormat::Scraped) => {
                let catalog = catalogs
                    .get(supplier)
                    .copied()
                    .with_context(|| format!("no catalog client for supplier {supplier}"))?;
                write_catalog_rows(supplier, format, entries, catalog, sleep, &mut writer, issues)?;
            }
        }

        writer
            .flush()
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    Ok(())
}

fn write_lab_rows<W: std::io::Write>(entries: &[BomEntry], writer: &mut Writer<W>) -> Result<()> {
    writer.write_record(["Name", "Quantity"])?;
    for entry in entries {
        writer.write_record([entry.mpn.as_str(), entry.quantity.to_string().as_str()])?;
    }
    Ok(())
}

fn write_catalog_rows<W: std::io::Write>(
    supplier: &str,
    format: SupplierFormat,
    entries: &[BomEntry],
    catalog: &dyn PartCatalog,
    sleep: &mut dyn FnMut(Duration),
    writer: &mut Writer<W>,
    issues: &mut IssueSink,
) -> Result<()> {
    let currency = format.currency();
    let unit_header = format!("Price [{currency}/unit]");
    let total_header = format!("Price [{currency}]");
    writer.write_record([
        "MPN",
        "SKU",
        "Quantity",
        unit_header.as_str(),
        total_header.as_str(),
        "In stock",
        "Available",
    ])?;

    for entry in entries {
        log::info!("Searching {supplier} for {}", entry.sku);
        let Some(part) = lookup_with_retry(catalog, &entry.sku, sleep)? else {
            issues.push(Issue::PartNotFound {
                supplier: supplier.to_string(),
                sku: entry.sku.clone(),
            });
            continue;
        };

        let price = part.price_at_qty(entry.quantity);
        let cost = price.map(|p| p * f64::from(entry.quantity));
        let available = part.covers_qty(entry.quantity);
        if !available {
            issues.push(Issue::InsufficientStock {
                supplier: supplier.to_string(),
                mpn: entry.mpn.clone(),
                needed: entry.quantity,
                stock: part.availability.unwrap_or(0),
            });
        }

        writer.write_record([
            entry.mpn.as_str(),
            entry.sku.as_str(),
            entry.quantity.to_string().as_str(),
            display_opt(price).as_str(),
            display_opt(cost).as_str(),
            display_opt(part.availability).as_str(),
            available.to_string().as_str(),
        ])?;
    }

    Ok(())
}

/// Unknown values render as empty cells, never as zero.
fn display_opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bomgen_suppliers::{Lookup, Part, PriceBreak};

    struct FixedCatalog {
        parts: BTreeMap<String, Part>,
    }

    impl PartCatalog for FixedCatalog {
        fn lookup(&self, sku: &str) -> Result<Lookup> {
            Ok(self
                .parts
                .get(sku)
                .cloned()
                .map(Lookup::Found)
                .unwrap_or(Lookup::NotFound))
        }
    }

    fn part(sku: &str, stock: Option<i64>, breaks: &[(u32, f64)]) -> Part {
        Part {
            mpn: format!("mpn-{sku}"),
            sku: sku.to_string(),
            description: String::new(),
            datasheet: String::new(),
            availability: stock,
            min_order_qty: 1,
            price_breaks: breaks
                .iter()
                .map(|&(quantity, unit_price)| PriceBreak {
                    quantity,
                    unit_price,
                })
                .collect(),
        }
    }

    fn entry(mpn: &str, sku: &str, quantity: u32) -> BomEntry {
        BomEntry {
            mpn: mpn.to_string(),
            sku: sku.to_string(),
            quantity,
        }
    }

    fn read_rows(path: &Path) -> Vec<Vec<String>> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(false)
            .from_path(path)
            .unwrap();
        reader
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn lab_csv_has_name_and_quantity_only() {
        let dir = tempfile::tempdir().unwrap();
        let boms = BTreeMap::from([(
            "Lab".to_string(),
            vec![entry("R10k", "R10k", 3), entry("C100n", "C100n", 1)],
        )]);

        let mut issues = IssueSink::new();
        write_supplier_csvs(
            &boms,
            dir.path(),
            &BTreeMap::new(),
            &mut |_| {},
            &mut issues,
        )
        .unwrap();

        let rows = read_rows(&dir.path().join("Lab.csv"));
        assert_eq!(rows[0], vec!["Name", "Quantity"]);
        assert_eq!(rows[1], vec!["R10k", "3"]);
        assert_eq!(rows[2], vec!["C100n", "1"]);
        assert!(issues.is_empty());
    }

    #[test]
    fn catalog_csv_carries_price_stock_and_availability() {
        let dir = tempfile::tempdir().unwrap();
        let boms = BTreeMap::from([(
            "Mouser".to_string(),
            vec![entry("ATMEGA328P-PU", "556-AT328", 50)],
        )]);

        let catalog = FixedCatalog {
            parts: BTreeMap::from([(
                "556-AT328".to_string(),
                part("556-AT328", Some(5000), &[(1, 10.0), (10, 8.0), (100, 5.0)]),
            )]),
        };
        let catalogs: BTreeMap<String, &dyn PartCatalog> =
            BTreeMap::from([("Mouser".to_string(), &catalog as &dyn PartCatalog)]);

        let mut issues = IssueSink::new();
        write_supplier_csvs(&boms, dir.path(), &catalogs, &mut |_| {}, &mut issues).unwrap();

        let rows = read_rows(&dir.path().join("Mouser.csv"));
        assert_eq!(
            rows[0],
            vec![
                "MPN",
                "SKU",
                "Quantity",
                "Price [zł/unit]",
                "Price [zł]",
                "In stock",
                "Available"
            ]
        );
        // Quantity 50 takes the 10-break, not the 100-break.
        assert_eq!(
            rows[1],
            vec!["ATMEGA328P-PU", "556-AT328", "50", "8", "400", "5000", "true"]
        );
        assert!(issues.is_empty());
    }

    #[test]
    fn missing_part_is_an_issue_and_later_entries_still_emit() {
        let dir = tempfile::tempdir().unwrap();
        let boms = BTreeMap::from([(
            "Mouser".to_string(),
            vec![entry("GONE", "no-such-sku", 1), entry("HERE", "real", 1)],
        )]);

        let catalog = FixedCatalog {
            parts: BTreeMap::from([("real".to_string(), part("real", Some(10), &[(1, 1.0)]))]),
        };
        let catalogs: BTreeMap<String, &dyn PartCatalog> =
            BTreeMap::from([("Mouser".to_string(), &catalog as &dyn PartCatalog)]);

        let mut issues = IssueSink::new();
        write_supplier_csvs(&boms, dir.path(), &catalogs, &mut |_| {}, &mut issues).unwrap();

        let rows = read_rows(&dir.path().join("Mouser.csv"));
        assert_eq!(rows.len(), 2); // header + the found part
        assert_eq!(rows[1][0], "HERE");
        assert_eq!(
            issues.issues(),
            &[Issue::PartNotFound {
                supplier: "Mouser".to_string(),
                sku: "no-such-sku".to_string()
            }]
        );
    }

    #[test]
    fn insufficient_stock_still_writes_the_row() {
        let dir = tempfile::tempdir().unwrap();
        let boms = BTreeMap::from([("TME".to_string(), vec![entry("BAT54", "BAT54-TME", 100)])]);

        let catalog = FixedCatalog {
            parts: BTreeMap::from([(
                "BAT54-TME".to_string(),
                part("BAT54-TME", Some(7), &[(1, 0.5)]),
            )]),
        };
        let catalogs: BTreeMap<String, &dyn PartCatalog> =
            BTreeMap::from([("TME".to_string(), &catalog as &dyn PartCatalog)]);

        let mut issues = IssueSink::new();
        write_supplier_csvs(&boms, dir.path(), &catalogs, &mut |_| {}, &mut issues).unwrap();

        let rows = read_rows(&dir.path().join("TME.csv"));
        assert_eq!(rows[1][5], "7");
        assert_eq!(rows[1][6], "false");
        assert!(matches!(
            issues.issues()[0],
            Issue::InsufficientStock { needed: 100, stock: 7, .. }
        ));
    }

    #[test]
    fn unknown_price_renders_as_empty_cells() {
        let dir = tempfile::tempdir().unwrap();
        let boms = BTreeMap::from([("Mouser".to_string(), vec![entry("X", "sku-x", 5)])]);

        // Only break requires quantity 10; requested 5 -> price unknown.
        let catalog = FixedCatalog {
            parts: BTreeMap::from([("sku-x".to_string(), part("sku-x", Some(100), &[(10, 8.0)]))]),
        };
        let catalogs: BTreeMap<String, &dyn PartCatalog> =
            BTreeMap::from([("Mouser".to_string(), &catalog as &dyn PartCatalog)]);

        let mut issues = IssueSink::new();
        write_supplier_csvs(&boms, dir.path(), &catalogs, &mut |_| {}, &mut issues).unwrap();

        let rows = read_rows(&dir.path().join("Mouser.csv"));
        assert_eq!(rows[1][3], "");
        assert_eq!(rows[1][4], "");
        assert!(issues.is_empty());
    }

    #[test]
    fn scraped_format_prices_in_usd() {
        let dir = tempfile::tempdir().unwrap();
        let boms = BTreeMap::from([("LCSC".to_string(), vec![entry("CL10A", "C25804", 100)])]);

        let catalog = FixedCatalog {
            parts: BTreeMap::from([(
                "C25804".to_string(),
                part("C25804", Some(50000), &[(100, 0.0087)]),
            )]),
        };
        let catalogs: BTreeMap<String, &dyn PartCatalog> =
            BTreeMap::from([("LCSC".to_string(), &catalog as &dyn PartCatalog)]);

        let mut issues = IssueSink::new();
        write_supplier_csvs(&boms, dir.path(), &catalogs, &mut |_| {}, &mut issues).unwrap();

        let rows = read_rows(&dir.path().join("LCSC.csv"));
        assert_eq!(rows[0][3], "Price [USD/unit]");
        assert_eq!(rows[1][3], "0.0087");
    }
}
