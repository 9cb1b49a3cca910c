mod commands;
mod logging;
mod output;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use commands::convert::{ConvertOptions, PageRequest};
use datev_core::model::ReportKind;

#[derive(Parser)]
#[command(
    name = "datev",
    version,
    about = "Extract tables from DATEV report PDFs into CSV and Excel"
)]
struct Cli {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert the BWA Entwicklungsuebersicht (one page)
    Entwicklung {
        #[command(flatten)]
        convert: ConvertArgs,

        /// Page number to read instead of searching for the title
        #[arg(long, value_name = "N")]
        page: Option<usize>,
    },
    /// Convert the Summen- und Saldenliste (a page range)
    Susa {
        #[command(flatten)]
        convert: ConvertArgs,

        /// First page of the list (without --end-page: up to the last page)
        #[arg(long, value_name = "N")]
        start_page: Option<usize>,

        /// Last page of the list (without --start-page: from page 1)
        #[arg(long, value_name = "N")]
        end_page: Option<usize>,
    },
    /// Inspect and check report layouts
    Layout {
        #[command(subcommand)]
        action: LayoutAction,
    },
}

#[derive(Args)]
struct ConvertArgs {
    /// PDF to convert; a directory converts every PDF in it. Without it, the input directory is converted
    #[arg(long, value_name = "PATH")]
    pdf: Option<PathBuf>,

    /// Directory searched for PDFs in batch mode
    #[arg(long, value_name = "DIR", default_value = "input")]
    input_dir: PathBuf,

    /// Directory for the generated CSV files
    #[arg(long, value_name = "DIR", default_value = "output")]
    output_dir: PathBuf,

    /// CSV output path (single file only)
    #[arg(long = "out", value_name = "FILE")]
    out: Option<PathBuf>,

    /// Excel output path (single file only)
    #[arg(long, value_name = "FILE")]
    excel: Option<PathBuf>,

    /// Directory for Excel files (default: the output directory)
    #[arg(long, value_name = "DIR")]
    excel_dir: Option<PathBuf>,

    /// Skip the Excel file
    #[arg(long)]
    no_excel: bool,

    /// DATEV structure export whose row count the result is checked against
    #[arg(long, value_name = "FILE")]
    structure: Option<PathBuf>,

    /// Custom layout JSON instead of the built-in one
    #[arg(long, value_name = "FILE")]
    layout: Option<PathBuf>,

    /// Output format for a single file: table (default) or json
    #[arg(short, long, default_value = "table")]
    output: String,
}

impl ConvertArgs {
    fn into_options(self, kind: ReportKind, pages: PageRequest) -> ConvertOptions {
        ConvertOptions {
            kind,
            pages,
            pdf: self.pdf,
            input_dir: self.input_dir,
            output_dir: self.output_dir,
            out: self.out,
            excel: self.excel,
            excel_dir: self.excel_dir,
            write_excel: !self.no_excel,
            structure: self.structure,
            layout: self.layout,
            format: self.output,
        }
    }
}

#[derive(Subcommand)]
enum LayoutAction {
    /// List the built-in layouts
    List,
    /// Describe a layout's columns and skip rules
    Explain {
        /// Report kind: entwicklungsuebersicht or susa
        kind: String,
    },
    /// Validate a custom layout file
    Validate {
        /// Path to JSON layout file
        file: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Entwicklung { convert, page } => commands::convert::run(
            convert.into_options(ReportKind::Entwicklungsuebersicht, PageRequest::single(page)),
        ),
        Commands::Susa {
            convert,
            start_page,
            end_page,
        } => commands::convert::run(
            convert.into_options(ReportKind::Susa, PageRequest::span(start_page, end_page)),
        ),
        Commands::Layout { action } => match action {
            LayoutAction::List => commands::layout::list(),
            LayoutAction::Explain { kind } => commands::layout::explain(&kind),
            LayoutAction::Validate { file } => commands::layout::validate(&file),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
