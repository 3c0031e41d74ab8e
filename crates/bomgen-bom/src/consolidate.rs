//! Consolidation of multiple per-supplier BOM CSVs into one aggregate
//! order, weighted by board quantity and padded with spare stock.
//!
//! Input is a file list of `(bom_csv_path, board_multiplier)` rows. Each
//! referenced CSV is read positionally (the column layout written by
//! [`crate::emit`]): MPN(0), SKU(1), Quantity(2), Price(3), InStock(5),
//! Available(6). A row whose second column is literally `"SKU"` is a
//! header and skipped.

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// One aggregate order line, keyed by SKU during consolidation.
#[derive(Debug, Clone, PartialEq)]
pub struct ConsolidatedLine {
    pub mpn: String,
    pub sku: String,
    pub quantity: u32,
    /// Unit price as read from the source CSV; may be empty.
    pub price: String,
    pub in_stock: String,
    pub available: String,
    /// Which boards need this part, with per-board quantity breakdown.
    pub needed_for: String,
}

/// Read the `(path, multiplier)` file list. Semicolon-delimited first,
/// falling back to comma when the rows are too short.
pub fn read_file_list(path: &Path) -> Result<Vec<(PathBuf, u32)>> {
    for delimiter in [b';', b','] {
        if let Some(list) = try_read_file_list(path, delimiter)? {
            return Ok(list);
        }
    }
    anyhow::bail!(
        "file list {} needs two columns: bom csv path and board multiplier",
        path.display()
    )
}

fn try_read_file_list(path: &Path, delimiter: u8) -> Result<Option<Vec<(PathBuf, u32)>>> {
    let file =
        File::open(path).with_context(|| format!("failed to open file list {}", path.display()))?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut list = Vec::new();
    for record in reader.records() {
        let record = record.context("malformed file list")?;
        let (Some(csv_path), Some(multiplier)) = (record.get(0), record.get(1)) else {
            // Wrong delimiter collapses everything into one column.
            return Ok(None);
        };
        let multiplier = multiplier.trim().parse().with_context(|| {
            format!("bad board multiplier {multiplier:?} for {csv_path}")
        })?;
        list.push((PathBuf::from(csv_path), multiplier));
    }
    Ok(Some(list))
}

/// Fold the listed BOM CSVs into one order, multiplying each line's
/// quantity by its board multiplier and merging duplicate SKUs.
pub fn consolidate(file_list: &[(PathBuf, u32)]) -> Result<Vec<ConsolidatedLine>> {
    let mut lines: Vec<ConsolidatedLine> = Vec::new();

    for (path, multiplier) in file_list {
        log::info!("Consolidating {} (x{multiplier})", path.display());
        let file = File::open(path)
            .with_context(|| format!("failed to open BOM csv {}", path.display()))?;
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(false)
            .flexible(true)
            .from_reader(file);

        for record in reader.records() {
            let record =
                record.with_context(|| format!("malformed BOM csv {}", path.display()))?;
            let field = |i: usize| record.get(i).unwrap_or_default().to_string();

            if field(1) == "SKU" {
                continue;
            }

            let quantity: u32 = field(2).trim().parse().with_context(|| {
                format!("bad quantity {:?} in {}", field(2), path.display())
            })?;
            let needed = quantity * multiplier;
            let note = format!("{} ({quantity}x{multiplier})", path.display());

            let sku = field(1);
            match lines.iter_mut().find(|line| line.sku == sku) {
                Some(line) => {
                    line.quantity += needed;
                    line.needed_for.push_str(", ");
                    line.needed_for.push_str(&note);
                }
                None => lines.push(ConsolidatedLine {
                    mpn: field(0),
                    sku,
                    quantity: needed,
                    price: field(3),
                    in_stock: field(5),
                    available: field(6),
                    needed_for: note,
                }),
            }
        }
    }

    Ok(lines)
}

/// Write the aggregate order as a comma-delimited CSV, adding `spare`
/// extra units to every line. An unparseable price yields a zero total,
/// not an error.
pub fn write_consolidated_csv<W: std::io::Write>(
    lines: &[ConsolidatedLine],
    spare: u32,
    out: W,
) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record([
        "MPN",
        "SKU",
        "Quantity",
        "Price [zł/unit]",
        "Price [zł]",
        "In stock",
        "Available",
        "Needed for",
    ])?;

    for line in lines {
        let quantity = line.quantity + spare;
        let total = line
            .price
            .parse::<f64>()
            .map(|unit| unit * f64::from(quantity))
            .unwrap_or(0.0);

        writer.write_record([
            line.mpn.as_str(),
            line.sku.as_str(),
            quantity.to_string().as_str(),
            line.price.as_str(),
            total.to_string().as_str(),
            line.in_stock.as_str(),
            line.available.as_str(),
            line.needed_for.as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}
