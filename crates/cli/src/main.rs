//! CLI tool for turning model-generated outlines into PowerPoint decks.

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use clap::Parser;
use deck_core::{
    outline_prompt, suggested_filename, DirectoryPublisher, FileSource, Outline, OutlineParser,
    OutlineSource, Publisher, StaticSource, Validated,
};
use deck_pptx::{Assembler, DirectoryAssets};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// Render a model's slide outline (JSON, possibly wrapped in prose) to PPTX.
#[derive(Parser, Debug)]
#[command(name = "deck-gen")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// File holding the raw model response, or `-` for stdin
    #[arg(required_unless_present = "print_prompt")]
    input: Option<PathBuf>,

    /// Output directory (default: next to the input file)
    #[arg(short, long, env = "DECK_OUTPUT_DIR")]
    output: Option<PathBuf>,

    /// Replace the deck title from the outline
    #[arg(short, long)]
    title: Option<String>,

    /// Replace the deck author from the outline
    #[arg(short, long)]
    author: Option<String>,

    /// Directory image references are resolved against (default: input's directory)
    #[arg(long)]
    assets: Option<PathBuf>,

    /// Stamp the current time into the document properties
    #[arg(long)]
    timestamp: bool,

    /// Print the outline prompt for TOPIC and exit
    #[arg(long, value_name = "TOPIC")]
    print_prompt: Option<String>,

    /// Write the deck to stdout instead of the output directory
    #[arg(long)]
    stdout: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    if let Some(topic) = &args.print_prompt {
        println!("{}", outline_prompt(topic));
        return Ok(());
    }

    let Some(input) = args.input.as_deref() else {
        anyhow::bail!("no input given");
    };

    let validated = read_outline(input)?;
    let mut warnings = validated.warnings.clone();
    let outline = apply_overrides(validated, &args)?;

    let mut assembler =
        Assembler::new().with_resolver(DirectoryAssets::new(assets_dir(input, args.assets.as_deref())));
    if args.timestamp {
        assembler = assembler.with_created(Utc::now());
    }
    let assembly = assembler
        .assemble(&outline)
        .with_context(|| format!("Failed to render '{}'", outline.title()))?;
    warnings.extend(assembly.warnings);

    if args.stdout {
        io::stdout()
            .lock()
            .write_all(&assembly.bytes)
            .context("Failed to write deck to stdout")?;
        return Ok(());
    }

    let output_dir = get_output_dir(input, args.output.as_deref());
    let filename = suggested_filename(outline.title(), Local::now().naive_local());
    let stored = DirectoryPublisher::new(&output_dir)
        .publish(&assembly.bytes, &filename)
        .with_context(|| format!("Failed to publish to {}", output_dir.display()))?;

    if args.verbose {
        eprintln!("  {}", summary(&outline, &warnings));
    }
    println!("{}", stored.location);

    Ok(())
}

/// Read and validate the raw model response.
fn read_outline(input: &Path) -> Result<Validated> {
    let raw = if input == Path::new("-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        StaticSource::new(text).generate("")
    } else {
        FileSource::new(input).generate("")
    };
    let raw = raw.with_context(|| format!("Failed to read {}", input.display()))?;

    OutlineParser::new()
        .parse(&raw)
        .with_context(|| format!("No usable outline in {}", input.display()))
}

/// Apply `--title` / `--author` to a validated outline.
fn apply_overrides(validated: Validated, args: &Args) -> Result<Outline> {
    let outline = validated.outline;
    if args.title.is_none() && args.author.is_none() {
        return Ok(outline);
    }

    let title = args.title.as_deref().unwrap_or(outline.title());
    let author = args.author.as_deref().unwrap_or(outline.author());
    Outline::new(title, author, outline.slides().to_vec()).context("Invalid --title")
}

/// One-line report: slide count plus validator and renderer repairs.
fn summary(outline: &Outline, warnings: &[String]) -> String {
    format!("{} slides, {} repaired", outline.slides().len(), warnings.len())
}

fn assets_dir(input: &Path, assets: Option<&Path>) -> PathBuf {
    match assets {
        Some(dir) => dir.to_path_buf(),
        None => input_parent(input),
    }
}

/// Determine where the deck is written.
fn get_output_dir(input: &Path, output_dir: Option<&Path>) -> PathBuf {
    match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => input_parent(input),
    }
}

fn input_parent(input: &Path) -> PathBuf {
    match input.parent() {
        Some(parent) if input != Path::new("-") && !parent.as_os_str().is_empty() => {
            parent.to_path_buf()
        }
        _ => PathBuf::from("."),
    }
}
