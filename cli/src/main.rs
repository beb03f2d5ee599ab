//! docoutline CLI - document outline inference tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use docoutline::render::{self, JsonFormat};
use docoutline::{
    batch, outline_with_report, universal_from_dump_file, BatchOptions, DumpSource,
    OutlineOptions, PageSource, Tier,
};

#[derive(Parser)]
#[command(name = "docoutline")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Infer multilingual document outlines from page dumps", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Infer the outline of one page dump
    Outline {
        /// Input page dump
        #[arg(value_name = "DUMP")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Document language (detected if not specified)
        #[arg(long, value_name = "CODE")]
        lang: Option<String>,

        /// Ignore the embedded table of contents
        #[arg(long)]
        no_toc: bool,

        /// Never escalate to the forced full scan
        #[arg(long)]
        no_full_scan: bool,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Extract the universal content record of one page dump
    Universal {
        /// Input page dump
        #[arg(value_name = "DUMP")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Process every page dump in a directory
    Batch {
        /// Directory of page dumps
        #[arg(value_name = "INPUT_DIR")]
        input: PathBuf,

        /// Directory for output records
        #[arg(value_name = "OUTPUT_DIR")]
        output: PathBuf,

        /// Emit universal records instead of outlines
        #[arg(long)]
        universal: bool,

        /// Process documents one at a time
        #[arg(long)]
        sequential: bool,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Print the outline as an indented tree
    Tree {
        /// Input page dump
        #[arg(value_name = "DUMP")]
        input: PathBuf,
    },

    /// Show document information and build diagnostics
    Info {
        /// Input page dump
        #[arg(value_name = "DUMP")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Outline {
            input,
            output,
            lang,
            no_toc,
            no_full_scan,
            compact,
        } => {
            let mut options = OutlineOptions::new()
                .with_embedded_toc(!no_toc)
                .with_full_scan(!no_full_scan);
            if let Some(lang) = lang {
                options = options.with_language(lang);
            }
            cmd_outline(&input, output.as_deref(), options, json_format(compact))
        }
        Commands::Universal {
            input,
            output,
            compact,
        } => cmd_universal(&input, output.as_deref(), json_format(compact)),
        Commands::Batch {
            input,
            output,
            universal,
            sequential,
            compact,
        } => {
            let mut options = BatchOptions::new()
                .with_parallel(!sequential)
                .with_format(json_format(compact));
            if universal {
                options = options.universal();
            }
            cmd_batch(&input, &output, &options)
        }
        Commands::Tree { input } => cmd_tree(&input),
        Commands::Info { input } => cmd_info(&input),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn json_format(compact: bool) -> JsonFormat {
    if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    }
}

fn emit(json: &str, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = output {
        fs::write(path, format!("{}\n", json))?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }
    Ok(())
}

fn cmd_outline(
    input: &Path,
    output: Option<&Path>,
    options: OutlineOptions,
    format: JsonFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let (result, report) = outline_with_report(input, options)?;
    if report.tier == Tier::Placeholder {
        eprintln!(
            "{} {} could not be read, wrote a placeholder outline",
            "Warning:".yellow().bold(),
            input.display()
        );
    }
    let json = render::to_json(&result, format)?;
    emit(&json, output)
}

fn cmd_universal(
    input: &Path,
    output: Option<&Path>,
    format: JsonFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let record = universal_from_dump_file(input)?;
    let json = render::to_json(&record, format)?;
    emit(&json, output)
}

fn cmd_batch(
    input: &Path,
    output: &Path,
    options: &BatchOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let total = batch::collect_inputs(input)?.len();

    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );

    let progress = |path: &Path| {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        pb.set_message(name);
        pb.inc(1);
    };
    let report = batch::run_batch_with_progress(input, output, options, &progress)?;
    pb.finish_with_message("Done!");

    println!(
        "\n{} {} records written to {}",
        "Done!".green().bold(),
        report.processed,
        output.display()
    );
    if report.degraded > 0 {
        println!(
            "{} {} inputs produced placeholder records",
            "Warning:".yellow().bold(),
            report.degraded
        );
    }

    Ok(())
}

fn cmd_tree(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let (result, _) = outline_with_report(input, OutlineOptions::default())?;
    print!("{}", render::to_tree(&result));
    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let source = DumpSource::open(input)?;
    let metadata = source.metadata()?;
    let (result, report) = outline_with_report(input, OutlineOptions::default())?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Pages".bold(), source.page_count()?);
    println!("{}: {}", "Title".bold(), result.title);

    if let Some(ref author) = metadata.author {
        println!("{}: {}", "Author".bold(), author);
    }
    if let Some(ref creator) = metadata.creator {
        println!("{}: {}", "Creator".bold(), creator);
    }
    if let Some(ref producer) = metadata.producer {
        println!("{}: {}", "Producer".bold(), producer);
    }
    if let Some(ref created) = metadata.created {
        println!("{}: {}", "Created".bold(), created);
    }
    if let Some(ref modified) = metadata.modified {
        println!("{}: {}", "Modified".bold(), modified);
    }
    println!(
        "{}: {}",
        "Embedded TOC".bold(),
        source.table_of_contents()?.len()
    );

    println!();
    println!("{}", "Outline Build".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Language".bold(), report.language);
    println!("{}: {}", "Tier".bold(), report.tier);
    println!(
        "{}: {} processed, {} failed, {} from layout",
        "Pages".bold(),
        report.pages_processed,
        report.pages_failed,
        report.layout_pages
    );
    println!("{}: {}", "Primary headings".bold(), report.primary_count);
    if let Some(count) = report.full_scan_count {
        println!("{}: {}", "Full-scan headings".bold(), count);
    }
    if let Some(count) = report.sparse_count {
        println!("{}: {}", "Sparse-scan headings".bold(), count);
    }
    println!("{}: {}", "Final headings".bold(), result.outline.len());

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "docoutline".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Multilingual document outline inference");
    println!();
    println!("License: MIT");
}
