use clap::{Parser, Subcommand};
use colored::Colorize;
use env_logger::Env;

mod bom;
mod config;
mod consolidate;

#[derive(Parser)]
#[command(name = "bomgen")]
#[command(about = "BOM generation and consolidation for KiCad projects", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short = 'd', long = "debug", global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate BOM and run BOM checks
    Bom(bom::BomArgs),

    /// Consolidate per-board BOM CSVs into a single order
    Consolidate(consolidate::ConsolidateArgs),
}

fn main() {
    let cli = Cli::parse();

    // Default level depends on --debug; RUST_LOG still overrides.
    let env = if cli.debug {
        Env::default().default_filter_or("debug")
    } else {
        Env::default().default_filter_or("info")
    };
    env_logger::Builder::from_env(env).init();

    let has_issues = match cli.command {
        Commands::Bom(args) => bom::execute(args),
        Commands::Consolidate(args) => consolidate::execute(args),
    };

    match has_issues {
        Ok(false) => println!("OK!"),
        Ok(true) => {
            eprintln!("{}", "There were issues found".red());
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("{} {e}", "Error:".red());
            for cause in e.chain().skip(1) {
                eprintln!("  {cause}");
            }
            std::process::exit(1);
        }
    }
}
