use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use bomgen_bom::consolidate::{consolidate, read_file_list, write_consolidated_csv};

const OUTPUT_FILE: &str = "consolidated_bom.csv";

#[derive(Args, Debug, Clone)]
#[command(about = "Consolidate per-board BOM CSVs into a single order")]
pub struct ConsolidateArgs {
    /// File list: one "<bom csv>;<board multiplier>" row per board
    #[arg(short, long, value_name = "FILE")]
    pub path: PathBuf,

    /// Spare components to add to every order line
    #[arg(short, long, default_value_t = 0)]
    pub spare: u32,
}

pub fn execute(args: ConsolidateArgs) -> Result<bool> {
    let file_list = read_file_list(&args.path)?;
    let lines = consolidate(&file_list)?;

    let out = File::create(OUTPUT_FILE)
        .with_context(|| format!("failed to create {OUTPUT_FILE}"))?;
    write_consolidated_csv(&lines, args.spare, out)?;
    log::info!("Wrote {} order lines to {OUTPUT_FILE}", lines.len());

    Ok(false)
}
