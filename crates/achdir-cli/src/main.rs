mod commands;
mod output;

use achdir_core::query::ParticipantFilter;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "achdir",
    version,
    about = "Load ACH participant directories from workbooks and PDF participant lists"
)]
struct Cli {
    /// Custom JSON configuration file (default: built-in)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load participant sheets from a workbook (xlsx, xls, ods)
    Sheets {
        /// Path to the workbook
        workbook: PathBuf,

        /// Only show the sheet with this name
        #[arg(long, value_name = "NAME")]
        sheet: Option<String>,

        #[command(flatten)]
        view: ViewArgs,

        /// Reload and re-render whenever the workbook changes, polling every SECS seconds
        #[arg(long, value_name = "SECS")]
        watch: Option<u64>,
    },
    /// Extract participants from a single PDF participant list
    Extract {
        /// Path to the PDF
        pdf_file: PathBuf,

        /// Table name (default: file stem)
        #[arg(long)]
        name: Option<String>,

        /// Ask pdftotext to preserve the physical page layout
        #[arg(long)]
        layout: bool,

        #[command(flatten)]
        view: ViewArgs,
    },
    /// Extract every configured payment stream from a directory of PDFs
    Streams {
        /// Directory holding one PDF per stream
        dir: PathBuf,

        /// Ask pdftotext to preserve the physical page layout
        #[arg(long)]
        layout: bool,

        #[command(flatten)]
        view: ViewArgs,
    },
    /// Inspect and validate loader configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the active configuration as JSON
    Show,
    /// Validate a configuration file
    Validate {
        /// Path to JSON configuration file
        file: PathBuf,
    },
}

/// Row selection and rendering options shared by all loading commands.
#[derive(Args, Debug, Clone)]
pub struct ViewArgs {
    /// Only rows with this category (repeatable)
    #[arg(long = "category", value_name = "C")]
    categories: Vec<String>,

    /// Only rows with this institution type (repeatable)
    #[arg(long = "type", value_name = "T")]
    institution_types: Vec<String>,

    /// Case-insensitive substring of the institution name
    #[arg(short, long)]
    search: Option<String>,

    /// Print participant counts by category and institution type
    #[arg(long)]
    pub summary: bool,

    /// List institutions grouped by institution type and category
    #[arg(long)]
    pub grouped: bool,

    /// Output format: table (default) or json
    #[arg(short, long, default_value = "table")]
    pub output: String,
}

impl ViewArgs {
    pub fn filter(&self) -> ParticipantFilter {
        ParticipantFilter {
            categories: self.categories.clone(),
            institution_types: self.institution_types.clone(),
            search: self.search.clone().unwrap_or_default(),
        }
    }
}

fn main() {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config_file = cli.config;

    let result = match cli.command {
        Commands::Sheets {
            workbook,
            sheet,
            view,
            watch,
        } => commands::sheets::run(workbook, config_file, sheet.as_deref(), &view, watch),
        Commands::Extract {
            pdf_file,
            name,
            layout,
            view,
        } => commands::extract::run(pdf_file, config_file, name, layout, &view),
        Commands::Streams { dir, layout, view } => {
            commands::streams::run(dir, config_file, layout, &view)
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::show(config_file.as_deref()),
            ConfigAction::Validate { file } => commands::config::validate(&file),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
