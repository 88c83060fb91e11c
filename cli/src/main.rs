//! medstruct CLI - medical report structuring tool

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use medstruct::{
    parse_input_file, process_batch, process_document, render, CoordinateTarget, Document,
    JsonFormat, ProcessingContext, ProcessingOptions, RenderOptions, ReportInput, StructureStats,
};

#[derive(Parser)]
#[command(name = "medstruct")]
#[command(author = "iyulab")]
#[command(version)]
#[command(
    about = "Structure labeled medical report tokens into TEI, JSON, and text",
    long_about = None
)]
struct Cli {
    /// Input report (JSON)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output directory
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(flatten)]
    process: ProcessArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Options shared by every command that structures a report.
#[derive(Args, Clone, Default)]
struct ProcessArgs {
    /// Segment paragraphs into sentences
    #[arg(long, global = true)]
    sentences: bool,

    /// Elements receiving coordinates (e.g., "head,s,ref,note")
    #[arg(long, global = true, value_name = "ELEMENTS")]
    coords: Option<String>,

    /// Generate xml:id identifiers
    #[arg(long, global = true)]
    ids: bool,

    /// Language used when the report does not declare one
    #[arg(long, global = true, env = "MEDSTRUCT_LANG", default_value = "fr")]
    lang: String,

    /// Fail on labels outside the taxonomy
    #[arg(long, global = true)]
    strict: bool,
}

impl ProcessArgs {
    fn to_options(&self) -> Result<ProcessingOptions, String> {
        let mut options = ProcessingOptions::new()
            .with_sentences(self.sentences)
            .with_ids(self.ids)
            .with_language(self.lang.clone());
        if let Some(ref coords) = self.coords {
            for target in CoordinateTarget::parse_list(coords)? {
                options = options.with_coordinates(target);
            }
        }
        if self.strict {
            options = options.strict();
        }
        Ok(options)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a report to all formats (TEI, text, JSON)
    Convert {
        /// Input report (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// Convert a report to TEI XML
    Tei {
        /// Input report (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Omit the teiHeader
        #[arg(long)]
        no_header: bool,

        /// Render on a single line
        #[arg(long)]
        compact: bool,
    },

    /// Convert a report to plain text
    Text {
        /// Input report (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
    },

    /// Convert a report to JSON
    Json {
        /// Input report (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show structure statistics of a report
    Info {
        /// Input report (JSON)
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Convert every report of a directory to TEI in parallel
    Batch {
        /// Directory of JSON reports
        #[arg(value_name = "DIR")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.process.to_options() {
        Err(e) => Err(e.into()),
        Ok(options) => match cli.command {
            Some(Commands::Convert { input, output }) => {
                cmd_convert(&input, output.as_deref(), &options)
            }
            Some(Commands::Tei {
                input,
                output,
                no_header,
                compact,
            }) => cmd_tei(&input, output.as_deref(), &options, no_header, compact),
            Some(Commands::Text { input, output }) => cmd_text(&input, output.as_deref(), &options),
            Some(Commands::Json {
                input,
                output,
                compact,
            }) => cmd_json(&input, output.as_deref(), &options, compact),
            Some(Commands::Info { input }) => cmd_info(&input, &options),
            Some(Commands::Batch { input, output }) => {
                cmd_batch(&input, output.as_deref(), &options)
            }
            Some(Commands::Version) => {
                cmd_version();
                Ok(())
            }
            None => {
                // Default behavior: convert if input is provided
                if let Some(input) = cli.input {
                    cmd_convert(&input, cli.output.as_deref(), &options)
                } else {
                    println!("{}", "Usage: medstruct <FILE> [OUTPUT]".yellow());
                    println!("       medstruct --help for more information");
                    Ok(())
                }
            }
        },
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

fn structure(input: &Path, options: &ProcessingOptions) -> Result<Document, medstruct::Error> {
    let report = parse_input_file(input)?;
    process_document(&report, &ProcessingContext::new(), options)
}

fn render_options() -> RenderOptions {
    RenderOptions::new().with_timestamp(Utc::now())
}

fn write_or_print(output: Option<&Path>, content: &str) -> CliResult {
    if let Some(path) = output {
        fs::write(path, content)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", content);
    }
    Ok(())
}

fn cmd_convert(input: &Path, output: Option<&Path>, options: &ProcessingOptions) -> CliResult {
    let output_dir = output.map(|p| p.to_path_buf()).unwrap_or_else(|| {
        let stem = input.file_stem().unwrap_or_default().to_string_lossy();
        PathBuf::from(format!("{}_output", stem))
    });

    fs::create_dir_all(&output_dir)?;

    let pb = ProgressBar::new(4);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")?
            .progress_chars("#>-"),
    );

    pb.set_message("Structuring report...");
    let doc = structure(input, options)?;
    pb.inc(1);

    let render_options = render_options();

    pb.set_message("Generating TEI...");
    let tei = render::to_tei(&doc, &render_options)?;
    fs::write(output_dir.join("report.tei.xml"), &tei)?;
    pb.inc(1);

    pb.set_message("Generating text...");
    let text = render::to_text(&doc, &render_options)?;
    fs::write(output_dir.join("report.txt"), &text)?;
    pb.inc(1);

    pb.set_message("Generating JSON...");
    let json = render::to_json(&doc, JsonFormat::Pretty)?;
    fs::write(output_dir.join("report.json"), &json)?;
    pb.inc(1);

    pb.finish_with_message("Done!");

    println!("\n{}", "Output files:".green().bold());
    println!("  {} report.tei.xml", "├─".dimmed());
    println!("  {} report.txt", "├─".dimmed());
    println!("  {} report.json", "└─".dimmed());

    Ok(())
}

fn cmd_tei(
    input: &Path,
    output: Option<&Path>,
    options: &ProcessingOptions,
    no_header: bool,
    compact: bool,
) -> CliResult {
    let doc = structure(input, options)?;

    let mut render_options = render_options().with_header(!no_header);
    if compact {
        render_options = render_options.compact();
    }

    let tei = render::to_tei(&doc, &render_options)?;
    write_or_print(output, &tei)
}

fn cmd_text(input: &Path, output: Option<&Path>, options: &ProcessingOptions) -> CliResult {
    let doc = structure(input, options)?;
    let text = render::to_text(&doc, &render_options())?;
    write_or_print(output, &text)
}

fn cmd_json(
    input: &Path,
    output: Option<&Path>,
    options: &ProcessingOptions,
    compact: bool,
) -> CliResult {
    let doc = structure(input, options)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };

    let json = render::to_json(&doc, format)?;
    write_or_print(output, &json)
}

fn cmd_info(input: &Path, options: &ProcessingOptions) -> CliResult {
    let doc = structure(input, options)?;
    let stats = StructureStats::from_document(&doc);

    println!("{}", "Report Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    if let Some(ref title) = doc.title {
        println!("{}: {}", "Title".bold(), title);
    }
    if let Some(ref language) = doc.language {
        println!("{}: {}", "Language".bold(), language);
    }

    println!();
    println!("{}", "Structure Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Divisions".bold(), stats.division_count);
    println!("{}: {}", "Headings".bold(), stats.heading_count);
    println!("{}: {}", "Paragraphs".bold(), stats.paragraph_count);
    println!("{}: {}", "Sentences".bold(), stats.sentence_count);
    println!(
        "{}: {} ({} items)",
        "Lists".bold(),
        stats.list_count,
        stats.item_count
    );
    println!(
        "{}: {} ({} resolved)",
        "References".bold(),
        stats.reference_count,
        stats.resolved_reference_count
    );
    println!("{}: {}", "Notes".bold(), stats.note_count);
    println!("{}: {}", "Running notes".bold(), stats.running_note_count);
    println!(
        "{}: {} ({} with email)",
        "Persons".bold(),
        stats.person_count,
        stats.assigned_email_count
    );
    println!("{}: {}", "Words".bold(), stats.word_count);
    println!("{}: {}", "Characters".bold(), stats.char_count);

    Ok(())
}

/// JSON files of a directory, sorted by name.
fn collect_inputs(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();
    Ok(paths)
}

fn tei_file_name(input: &Path) -> String {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    format!("{}.tei.xml", stem)
}

fn cmd_batch(input: &Path, output: Option<&Path>, options: &ProcessingOptions) -> CliResult {
    let output_dir = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| input.join("tei"));
    fs::create_dir_all(&output_dir)?;

    let paths = collect_inputs(input)?;
    let pb = ProgressBar::new(paths.len() as u64 * 2);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    pb.set_message("Reading reports...");
    let mut reports: Vec<(PathBuf, ReportInput)> = Vec::new();
    let mut failures = 0usize;
    for path in paths {
        match parse_input_file(&path) {
            Ok(report) => reports.push((path, report)),
            Err(e) => {
                failures += 1;
                pb.println(format!("{} {}: {}", "Skipped".yellow(), path.display(), e));
            }
        }
        pb.inc(1);
    }

    pb.set_message("Structuring reports...");
    let inputs: Vec<ReportInput> = reports.iter().map(|(_, r)| r.clone()).collect();
    let results = process_batch(&inputs, &ProcessingContext::new(), options);

    let render_options = render_options();
    let mut written = 0usize;
    for ((path, _), result) in reports.iter().zip(results) {
        match result.and_then(|doc| render::to_tei(&doc, &render_options)) {
            Ok(tei) => {
                fs::write(output_dir.join(tei_file_name(path)), tei)?;
                written += 1;
            }
            Err(e) => {
                failures += 1;
                pb.println(format!("{} {}: {}", "Failed".red(), path.display(), e));
            }
        }
        pb.inc(1);
    }

    pb.finish_with_message("Done!");
    println!(
        "\n{} {} reports written to {} ({} failed)",
        "Done!".green().bold(),
        written,
        output_dir.display(),
        failures
    );

    Ok(())
}

fn cmd_version() {
    println!("{} {}", "medstruct".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("Medical report structuring tool");
    println!();
    println!(
        "Repository: {}",
        "https://github.com/iyulab/medstruct".dimmed()
    );
    println!("License: MIT");
}
