//! Explorergen CLI - Generate data explorer TSV files from Google Sheets
//!
//! # Main Commands
//!
//! ```bash
//! explorergen generate                       # Generate every registered explorer
//! explorergen generate -e lis-inequality     # Generate one explorer
//! explorergen list                           # List registered explorers
//! ```
//!
//! # Debug Commands (for development)
//!
//! ```bash
//! explorergen fetch --sheet-id <ID> --sheet welfare   # Dump one sheet as JSON
//! ```

use clap::{Parser, Subcommand};
use explorergen::{explorers, fetch, ReadOptions, SheetRef};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "explorergen")]
#[command(about = "Generate data explorer configuration files from Google Sheets", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate explorer files
    Generate {
        /// Explorer slug (default: all registered explorers)
        #[arg(short, long)]
        explorer: Option<String>,

        /// Output directory
        #[arg(short, long, default_value = "explorers")]
        out_dir: PathBuf,
    },

    /// List registered explorers
    List,

    /// Fetch a single reference sheet and output it as JSON
    Fetch {
        /// Google Sheets document ID
        #[arg(long)]
        sheet_id: String,

        /// Sheet (tab) name
        #[arg(long)]
        sheet: String,

        /// Treat empty cells as null instead of empty strings
        #[arg(long)]
        empty_as_null: bool,

        /// Column to keep as text, skipping numeric auto-parsing (repeatable)
        #[arg(long)]
        string_column: Vec<String>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate { explorer, out_dir } => {
            cmd_generate(explorer.as_deref(), &out_dir).await
        }

        Commands::List => cmd_list(),

        Commands::Fetch {
            sheet_id,
            sheet,
            empty_as_null,
            string_column,
            output,
        } => {
            cmd_fetch(
                &sheet_id,
                &sheet,
                empty_as_null,
                string_column,
                output.as_deref(),
            )
            .await
        }
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn cmd_generate(
    explorer: Option<&str>,
    out_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let selected: Vec<&explorers::ExplorerInfo> = match explorer {
        Some(slug) => vec![explorers::find(slug)
            .ok_or_else(|| format!("unknown explorer '{slug}' (see `explorergen list`)"))?],
        None => explorers::REGISTRY.iter().collect(),
    };

    fs::create_dir_all(out_dir)?;
    let client = reqwest::Client::new();

    for info in selected {
        eprintln!("📄 Generating: {}", info.slug);
        let explorer = explorers::build(info.slug, &client).await?;
        let path = out_dir.join(info.outfile);
        explorer.write(&path)?;
        eprintln!(
            "✅ Wrote {} ({} views, {} tables)",
            path.display(),
            explorer.graphers().len(),
            explorer.tables().len()
        );
    }

    Ok(())
}

fn cmd_list() -> Result<(), Box<dyn std::error::Error>> {
    for info in explorers::REGISTRY {
        println!("{}\t{}\t{}", info.slug, info.outfile, info.title);
    }
    Ok(())
}

async fn cmd_fetch(
    sheet_id: &str,
    sheet: &str,
    empty_as_null: bool,
    string_columns: Vec<String>,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut opts = ReadOptions::default();
    if empty_as_null {
        opts = opts.empty_as_null();
    }
    for col in string_columns {
        opts = opts.string_column(col);
    }

    eprintln!("📄 Fetching sheet '{}' from document {}", sheet, sheet_id);
    let client = reqwest::Client::new();
    let table = fetch(&client, &SheetRef::new(sheet_id, sheet), &opts).await?;
    eprintln!("✅ Fetched {} rows, {} columns", table.len(), table.columns().len());

    let json = serde_json::to_string_pretty(&table.to_json())?;
    write_output(&json, output)?;

    Ok(())
}

fn write_output(content: &str, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match output {
        Some(path) => {
            fs::write(path, content)?;
            eprintln!("✅ Saved to {}", path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}
