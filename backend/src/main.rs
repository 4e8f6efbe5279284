//! Order cleaner CLI - clear shop columns in order workbooks
//!
//! # Main Commands
//!
//! ```bash
//! ordercleaner serve                    # Start HTTP server (port 3000)
//! ordercleaner clean order.xlsx        # Clean an order workbook
//! ordercleaner template show           # Show the removal template contents
//! ```
//!
//! # Debug Commands (for development)
//!
//! ```bash
//! ordercleaner inspect order.xlsx      # Show detected structure, no changes
//! ```

use clap::{Parser, Subcommand};
use ordercleaner::{
    clean_order_file, default_template_path, find_supplier_column, load_template_from_file,
    read_first_sheet, sheet_names, shop_code_columns, starter_template, west_columns, CleanOptions,
    DEFAULT_PROTECTED_SUPPLIER, DEFAULT_SUPPLIER_LABEL, DEFAULT_WEST_PREFIX, DOWNLOAD_FILENAME,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "ordercleaner")]
#[command(about = "Clear shop columns in order workbooks by code and nickname", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean an order workbook and write the modified copy
    Clean {
        /// Input order workbook (xlsx)
        input: PathBuf,

        /// Removal template (default: bundled config template)
        #[arg(short, long)]
        template: Option<PathBuf>,

        /// Output file (default: the fixed download filename)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Protected supplier: rows with this value are never touched
        #[arg(long, default_value = DEFAULT_PROTECTED_SUPPLIER)]
        protected_supplier: String,

        /// Prefix of "West" aggregate columns to drop
        #[arg(long, default_value = DEFAULT_WEST_PREFIX)]
        west_prefix: String,

        /// Write the run summary as JSON to this file (default: stderr)
        #[arg(long)]
        summary: Option<PathBuf>,
    },

    /// Show what the cleaner detects in an order workbook, without changes
    Inspect {
        /// Input order workbook (xlsx)
        input: PathBuf,

        /// Row-0 label of the supplier column
        #[arg(long, default_value = DEFAULT_SUPPLIER_LABEL)]
        supplier_label: String,

        /// Prefix of "West" aggregate columns
        #[arg(long, default_value = DEFAULT_WEST_PREFIX)]
        west_prefix: String,
    },

    /// Start HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },

    /// Inspect the client removal template
    Template {
        #[command(subcommand)]
        action: TemplateAction,
    },
}

#[derive(Subcommand)]
enum TemplateAction {
    /// Show the normalized shop codes and nicknames
    Show {
        /// Template path (default: bundled config template)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// Create a starter template with the expected columns
    Init {
        /// Where to write it (default: bundled config template path)
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Clean {
            input,
            template,
            output,
            protected_supplier,
            west_prefix,
            summary,
        } => cmd_clean(
            &input,
            template.as_deref(),
            output.as_deref(),
            protected_supplier,
            west_prefix,
            summary.as_deref(),
        ),

        Commands::Inspect {
            input,
            supplier_label,
            west_prefix,
        } => cmd_inspect(&input, &supplier_label, &west_prefix),

        Commands::Serve { port } => cmd_serve(port).await,

        Commands::Template { action } => cmd_template(action),
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn cmd_clean(
    input: &Path,
    template: Option<&Path>,
    output: Option<&Path>,
    protected_supplier: String,
    west_prefix: String,
    summary_path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Processing: {}", input.display());

    let template_path = template
        .map(Path::to_path_buf)
        .unwrap_or_else(default_template_path);
    eprintln!("   Template: {}", template_path.display());

    let spec = load_template_from_file(&template_path)?;
    eprintln!(
        "   {} shop codes, {} nicknames to clear",
        spec.shop_codes.len(),
        spec.nicknames.len()
    );

    if spec.is_empty() {
        eprintln!("⚠️  Template does not contain any shop_code or nickname values.");
        eprintln!("   Nothing to clear; no output written.");
        return Ok(());
    }

    let options = CleanOptions {
        supplier_label: DEFAULT_SUPPLIER_LABEL.to_string(),
        protected_supplier,
        west_prefix,
    };

    let (bytes, summary) = clean_order_file(input, &spec, &options)?;

    let output_path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DOWNLOAD_FILENAME));
    fs::write(&output_path, &bytes)?;
    eprintln!("💾 Cleaned workbook written to: {}", output_path.display());

    eprintln!("\n📊 Summary");
    eprintln!("   Sheet:               {}", summary.sheet_name);
    eprintln!("   Columns cleared:     {}", summary.columns_to_clear_count);
    eprintln!("   West columns dropped:{}", summary.west_columns_dropped);
    eprintln!("   Eligible rows:       {}", summary.rows_eligible_by_supplier_rule);
    eprintln!("   Cells blanked (est): {}", summary.cleared_cells_estimate);
    eprintln!("   Protected supplier:  {}", summary.protected_supplier);

    if let Some(path) = summary_path {
        let json = serde_json::to_string_pretty(&summary)?;
        fs::write(path, &json)?;
        eprintln!("💾 Summary written to: {}", path.display());
    }

    eprintln!("\n✨ Done!");
    Ok(())
}

fn cmd_inspect(
    input: &Path,
    supplier_label: &str,
    west_prefix: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Inspecting: {}", input.display());

    let bytes = fs::read(input)?;

    let names = sheet_names(&bytes)?;
    eprintln!("   Sheets: {}", names.join(", "));

    let (sheet_name, grid) = read_first_sheet(&bytes)?;
    eprintln!("   Using first sheet: {}", sheet_name);
    eprintln!("   Size: {} rows x {} columns", grid.height(), grid.width());

    match find_supplier_column(&grid, supplier_label) {
        Some(col) => eprintln!("   Supplier column: {} ('{}')", col, supplier_label),
        None => eprintln!("   ⚠️  Supplier column '{}' not found", supplier_label),
    }

    let mut codes: Vec<(usize, String)> = shop_code_columns(&grid).into_iter().collect();
    codes.sort_by_key(|(col, _)| *col);
    eprintln!("   Shop columns ({}):", codes.len());
    for (col, code) in codes {
        println!("     [{:3}] #{}#  {}", col, code, grid.cell(0, col).trimmed());
    }

    let west = west_columns(&grid, west_prefix);
    eprintln!("   West columns ({}):", west.len());
    for col in west {
        println!("     [{:3}] {}", col, grid.cell(0, col).trimmed());
    }

    Ok(())
}

async fn cmd_serve(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    ordercleaner::server::start_server(port).await
}

fn cmd_template(action: TemplateAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        TemplateAction::Show { path } => {
            let template_path = path.unwrap_or_else(default_template_path);
            eprintln!("📋 Template: {}", template_path.display());

            let spec = load_template_from_file(&template_path)?;

            let mut codes: Vec<&String> = spec.shop_codes.iter().collect();
            codes.sort();
            println!("shop codes ({}):", codes.len());
            for code in codes {
                println!("  {}", code);
            }

            let mut nicknames: Vec<&String> = spec.nicknames.iter().collect();
            nicknames.sort();
            println!("nicknames ({}):", nicknames.len());
            for nickname in nicknames {
                println!("  {}", nickname);
            }

            if spec.is_empty() {
                eprintln!("⚠️  Template is empty: a clean run would have nothing to clear.");
            }
        }

        TemplateAction::Init { path, force } => {
            let template_path = path.unwrap_or_else(default_template_path);

            if template_path.exists() && !force {
                return Err(format!(
                    "{} already exists (use --force to overwrite)",
                    template_path.display()
                )
                .into());
            }

            if let Some(parent) = template_path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }

            let bytes = starter_template()?;
            fs::write(&template_path, &bytes)?;
            eprintln!("✅ Starter template written to: {}", template_path.display());
            eprintln!("   Edit the 'clients_to_clear' sheet, then run 'ordercleaner clean'.");
        }
    }

    Ok(())
}
