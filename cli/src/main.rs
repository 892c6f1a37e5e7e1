//! pdfsift CLI - PDF outline extraction and persona-driven section ranking

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfsift::{
    extract_outline_batch, load_descriptor, rank_documents, to_json, FastEmbedder, JsonFormat,
    Outline, OutlineAssembler, ParseOptions, ScoreConfig,
};

#[derive(Parser)]
#[command(name = "pdfsift")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Extract PDF outlines and rank sections for a persona", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract title + H1/H2/H3 outlines, one JSON per input PDF
    Outline {
        /// Input PDF file or directory of PDFs
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output directory (default: <INPUT>/outlines)
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Process documents one at a time
        #[arg(long)]
        sequential: bool,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Rank document sections for a persona + job query
    Rank {
        /// Collection directory: a descriptor JSON plus PDFs (or a PDFs/ subdir)
        #[arg(value_name = "COLLECTION")]
        collection: PathBuf,

        /// Output file (default: <COLLECTION>/analysis.json)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Embedding model cache directory
        #[arg(long, value_name = "DIR", env = "PDFSIFT_MODEL_DIR")]
        model_dir: Option<PathBuf>,

        /// Number of top sections to retain
        #[arg(long, default_value = "5")]
        top_k: usize,

        /// Process documents one at a time
        #[arg(long)]
        sequential: bool,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Outline {
            input,
            output,
            sequential,
            compact,
        } => cmd_outline(&input, output.as_deref(), sequential, compact),
        Commands::Rank {
            collection,
            output,
            model_dir,
            top_k,
            sequential,
            compact,
        } => cmd_rank(
            &collection,
            output.as_deref(),
            model_dir.as_deref(),
            top_k,
            sequential,
            compact,
        ),
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_outline(
    input: &Path,
    output: Option<&Path>,
    sequential: bool,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let pdf_files = find_pdfs(input)?;
    if pdf_files.is_empty() {
        return Err(format!("no PDF files found in {}", input.display()).into());
    }

    let output_dir = output.map(|p| p.to_path_buf()).unwrap_or_else(|| {
        if input.is_dir() {
            input.join("outlines")
        } else {
            input
                .parent()
                .map(|p| p.to_path_buf())
                .unwrap_or_else(|| PathBuf::from("."))
        }
    });
    fs::create_dir_all(&output_dir)?;

    let pb = progress_bar(pdf_files.len() as u64);
    let format = json_format(compact);

    let mut options = ParseOptions::default();
    if sequential {
        options = options.sequential();
    }

    let assembler = OutlineAssembler::new();
    let results = extract_outline_batch(&pdf_files, &options, &assembler);

    let mut failures = 0;
    for (path, result) in results {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "output".to_string());
        let out_path = output_dir.join(format!("{}.json", stem));

        let outline = match result {
            Ok(outline) => {
                pb.println(format!(
                    "{} {} ({} headings)",
                    "✓".green(),
                    path.display(),
                    outline.len()
                ));
                outline
            }
            Err(e) => {
                // An unreadable document still gets a record so the batch
                // output stays one JSON per input
                failures += 1;
                pb.println(format!("{} {}: {}", "✗".red(), path.display(), e));
                Outline::new(stem)
            }
        };

        fs::write(&out_path, to_json(&outline, format)?)?;
        pb.inc(1);
    }

    pb.finish_and_clear();
    println!(
        "Processed {} document(s) into {} ({} failed)",
        pdf_files.len(),
        output_dir.display(),
        failures
    );
    Ok(())
}

fn cmd_rank(
    collection: &Path,
    output: Option<&Path>,
    model_dir: Option<&Path>,
    top_k: usize,
    sequential: bool,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let descriptor_path = find_descriptor(collection)?;
    let descriptor = load_descriptor(&descriptor_path)?;

    let pdf_dir = {
        let nested = collection.join("PDFs");
        if nested.is_dir() {
            nested
        } else {
            collection.to_path_buf()
        }
    };

    let listed = descriptor.document_names();
    let pdf_files: Vec<PathBuf> = if listed.is_empty() {
        find_pdfs(&pdf_dir)?
    } else {
        listed
            .iter()
            .map(|name| pdf_dir.join(name))
            .filter(|p| p.is_file())
            .collect()
    };

    if pdf_files.is_empty() {
        return Err(format!("no PDF files found in {}", pdf_dir.display()).into());
    }

    println!("Loading embedding model...");
    let embedder = FastEmbedder::load(model_dir)?;

    let mut options = ParseOptions::default();
    if sequential {
        options = options.sequential();
    }
    let score_config = ScoreConfig::default().with_top_k(top_k);

    let pb = spinner(format!("Ranking {} document(s)...", pdf_files.len()));
    let record = rank_documents(
        &pdf_files,
        descriptor.persona_text(),
        descriptor.job_text(),
        &embedder,
        &options,
        &score_config,
    )?;
    pb.finish_and_clear();

    let out_path = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| collection.join("analysis.json"));
    fs::write(&out_path, to_json(&record, json_format(compact))?)?;

    println!(
        "{} {} section(s) ranked, output in {}",
        "✓".green(),
        record.extracted_sections.len(),
        out_path.display()
    );
    Ok(())
}

/// PDFs under a directory (non-recursive, sorted), or the single input file.
fn find_pdfs(input: &Path) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    if !input.is_dir() {
        return Err(format!("{} does not exist", input.display()).into());
    }

    let mut files: Vec<PathBuf> = fs::read_dir(input)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .map(|ext| ext.eq_ignore_ascii_case("pdf"))
                .unwrap_or(false)
        })
        .collect();
    files.sort();
    Ok(files)
}

/// The descriptor is the first JSON file in the collection directory,
/// ignoring previous analysis output.
fn find_descriptor(collection: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut candidates: Vec<PathBuf> = fs::read_dir(collection)
        .map_err(|e| format!("cannot read {}: {}", collection.display(), e))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension().and_then(|e| e.to_str()) == Some("json")
                && path.file_name().and_then(|n| n.to_str()) != Some("analysis.json")
        })
        .collect();
    candidates.sort();

    candidates
        .into_iter()
        .next()
        .ok_or_else(|| format!("no descriptor JSON found in {}", collection.display()).into())
}

fn progress_bar(len: u64) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    pb
}

fn spinner(msg: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(msg);
    pb
}

fn json_format(compact: bool) -> JsonFormat {
    if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    }
}
