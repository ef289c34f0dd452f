//! rtimport CLI - rich-text fragment import tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use log::debug;

use rtimport::{
    import_file, DiagnosticKind, ImportOptions, ImportReport, JsonFormat, RecordingSink,
    RenderOptions, RtImport,
};

#[derive(Parser)]
#[command(name = "rtimport")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Import styled rich-text XML fragments into one document", long_about = None)]
struct Cli {
    /// Input fragment files, imported in order
    #[arg(value_name = "FILES")]
    inputs: Vec<PathBuf>,

    #[command(flatten)]
    render: RenderArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Import fragments into one document and print or save it
    Import {
        /// Input fragment files, imported in order
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// Print the sink operations of one fragment as JSON lines
    Trace {
        /// Input fragment file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[command(flatten)]
        margins: MarginArgs,
    },

    /// Report diagnostics and statistics without producing output
    Check {
        /// Input fragment files
        #[arg(value_name = "FILES", required = true)]
        inputs: Vec<PathBuf>,
    },

    /// Show version information
    Version,
}

#[derive(Args, Clone)]
struct MarginArgs {
    /// Extra left margin added to indents and tab stops
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    left_margin: i32,

    /// Extra right margin added to right indents
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    right_margin: i32,
}

#[derive(Args, Clone)]
struct RenderArgs {
    #[command(flatten)]
    margins: MarginArgs,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Output file (stdout if not specified)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Directory to save embedded images
    #[arg(long, value_name = "DIR")]
    images: Option<PathBuf>,

    /// Output compact JSON
    #[arg(long)]
    compact: bool,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Plain text, one line per paragraph
    Text,
    /// Markdown with emphasis, links and images
    #[value(alias = "md")]
    Markdown,
    /// Document model as JSON
    Json,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Import { inputs, render }) => cmd_import(&inputs, &render),
        Some(Commands::Trace { input, margins }) => cmd_trace(&input, &margins),
        Some(Commands::Check { inputs }) => cmd_check(&inputs),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: import if inputs are provided
            if cli.inputs.is_empty() {
                println!("{}", "Usage: rtimport <FILES>... [OPTIONS]".yellow());
                println!("       rtimport --help for more information");
                Ok(())
            } else {
                cmd_import(&cli.inputs, &cli.render)
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_import(inputs: &[PathBuf], args: &RenderArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut render_options = RenderOptions::new();
    if let Some(ref dir) = args.images {
        let prefix = match dir.file_name() {
            Some(name) => format!("{}/", name.to_string_lossy()),
            None => String::new(),
        };
        render_options = render_options
            .with_image_dir(dir)
            .with_image_prefix(prefix);
    }

    let result = RtImport::new()
        .with_margins(args.margins.left_margin, args.margins.right_margin)
        .with_render_options(render_options)
        .import_files(inputs)?;
    debug!(
        "imported {} fragments into {} paragraphs",
        inputs.len(),
        result.document.paragraph_count()
    );

    for diagnostic in &result.report.diagnostics {
        eprintln!("{} {}", "warning:".yellow().bold(), diagnostic);
    }

    let rendered = match args.format {
        OutputFormat::Text => result.to_text()?,
        OutputFormat::Markdown => result.to_markdown()?,
        OutputFormat::Json => {
            let format = if args.compact {
                JsonFormat::Compact
            } else {
                JsonFormat::Pretty
            };
            result.to_json(format)?
        }
    };

    let saved = result.save_images()?;
    for path in &saved {
        eprintln!("{} {}", "Extracted".green(), path.display());
    }

    if let Some(ref path) = args.output {
        fs::write(path, &rendered)?;
        eprintln!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", rendered);
    }

    Ok(())
}

fn cmd_trace(input: &Path, margins: &MarginArgs) -> Result<(), Box<dyn std::error::Error>> {
    let options = ImportOptions::new().with_margins(margins.left_margin, margins.right_margin);
    let mut sink = RecordingSink::new();
    let report = import_file(input, &mut sink, &options)?;

    for op in sink.ops() {
        println!("{}", serde_json::to_string(op)?);
    }
    for diagnostic in &report.diagnostics {
        eprintln!("{} {}", "warning:".yellow().bold(), diagnostic);
    }
    Ok(())
}

fn cmd_check(inputs: &[PathBuf]) -> Result<(), Box<dyn std::error::Error>> {
    let options = ImportOptions::default();
    let mut failures = 0;

    for input in inputs {
        let mut sink = RecordingSink::new();
        match import_file(input, &mut sink, &options) {
            Ok(report) => print_report(input, &report),
            Err(e) => {
                failures += 1;
                println!("{} {}: {}", "✗".red().bold(), input.display(), e);
            }
        }
    }

    if failures > 0 {
        return Err(format!("{} of {} files failed to import", failures, inputs.len()).into());
    }
    Ok(())
}

fn print_report(input: &Path, report: &ImportReport) {
    let mark = if report.is_clean() {
        "✓".green().bold()
    } else {
        "!".yellow().bold()
    };
    println!("{} {}", mark, input.display().to_string().bold());

    let stats = &report.stats;
    println!(
        "  {} paragraphs, {} runs, {} symbols, {} chars",
        stats.paragraph_count, stats.text_run_count, stats.symbol_count, stats.char_count
    );
    println!(
        "  {} images, {} placeholders",
        stats.image_count, stats.placeholder_count
    );
    println!("  {}: {}", "Fonts".bold(), report.font_faces.join(", "));

    for diagnostic in &report.diagnostics {
        let label = match diagnostic.kind {
            DiagnosticKind::ImageDecode | DiagnosticKind::MismatchedEnd => {
                diagnostic.kind.to_string().red()
            }
            _ => diagnostic.kind.to_string().yellow(),
        };
        println!("  {} {}: {}", "─".dimmed(), label, diagnostic.message);
    }
}

fn cmd_version() {
    println!("{} {}", "rtimport".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Rich-text fragment import tool");
    println!();
    println!("License: MIT");
}
