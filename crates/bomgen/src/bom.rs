use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;

use bomgen_bom::emit::{write_supplier_csvs, SupplierFormat};
use bomgen_bom::extract::parse_bom_file;
use bomgen_bom::group::group_components;
use bomgen_bom::misc::assign_misc_components;
use bomgen_bom::multipart::expand_multipart;
use bomgen_bom::resolve::resolve_suppliers;
use bomgen_bom::verify::verify_components;
use bomgen_bom::{IssueSink, LAB_SUPPLIER};
use bomgen_suppliers::lcsc::LcscClient;
use bomgen_suppliers::mouser::MouserClient;
use bomgen_suppliers::PartCatalog;

use crate::config::Config;

/// Output directory for the per-supplier purchase CSVs.
const BOM_DIR: &str = "bom";

#[derive(Args, Debug, Clone)]
#[command(about = "Generate BOM and run BOM checks")]
pub struct BomArgs {
    /// Path to the main schematic file (default: <cwd>/<cwd>.kicad_sch)
    #[arg(short, long, value_name = "FILE")]
    pub path: Option<PathBuf>,

    /// Generate purchase CSVs for these suppliers (Lab is always included)
    #[arg(short = 'g', long = "generate", value_name = "SUPPLIER", num_args = 0..)]
    pub suppliers: Option<Vec<String>>,
}

/// Run the full pipeline. Returns whether any non-fatal issue was found;
/// fatal conditions (missing input, kicad-cli failure) are errors.
pub fn execute(args: BomArgs) -> Result<bool> {
    let cwd = std::env::current_dir()?;
    let config = Config::load(&cwd)?;

    let schematic = match args.path {
        Some(path) => path,
        None => bomgen_kicad::default_schematic()?,
    };
    if !schematic.exists() {
        bail!("schematic file doesn't exist: {}", schematic.display());
    }

    let export = bomgen_kicad::export_python_bom(&schematic)?;
    let components = parse_bom_file(export.path(), &config.suppliers)?;
    log::info!("Extracted {} components", components.len());

    let mut issues = IssueSink::new();
    verify_components(&components, &config.exempt_set(), &mut issues);
    let components = expand_multipart(components, &config.suppliers, &mut issues);
    let components = assign_misc_components(components, &mut issues);
    let groups = group_components(components, &mut issues);

    if let Some(requested) = args.suppliers {
        // Lab comes first so in-house stock always wins resolution.
        let mut priority = vec![LAB_SUPPLIER.to_string()];
        priority.extend(requested);

        let boms = resolve_suppliers(&groups, &priority, &mut issues);

        let needs_mouser_api = priority
            .iter()
            .any(|s| SupplierFormat::for_supplier(s) == SupplierFormat::Catalog);
        let mouser = if needs_mouser_api {
            Some(MouserClient::new(config.mouser_api_key()?))
        } else {
            None
        };
        let lcsc = LcscClient::new();

        let mut catalogs: BTreeMap<String, &dyn PartCatalog> = BTreeMap::new();
        for supplier in &priority {
            match SupplierFormat::for_supplier(supplier) {
                SupplierFormat::Lab => {}
                SupplierFormat::Catalog => {
                    if let Some(mouser) = mouser.as_ref() {
                        catalogs.insert(supplier.clone(), mouser);
                    }
                }
                SupplierFormat::Scraped => {
                    catalogs.insert(supplier.clone(), &lcsc);
                }
            }
        }

        write_supplier_csvs(
            &boms,
            &cwd.join(BOM_DIR),
            &catalogs,
            &mut std::thread::sleep,
            &mut issues,
        )?;
    }

    Ok(issues.has_issues())
}
