use std::io;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cml_config::Config;
use cml_engine::{CmlParser, apply_patch, io as cml_io, remove_cml_indentation};

#[derive(Parser)]
#[command(name = "cml", version, about = "Parse, generate and apply Cogni Markup Language (CML)")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a file and print the result as JSON
    Parse {
        /// File containing CML-annotated text
        file: PathBuf,
    },
    /// Parse CML from stdin, printing one JSON event per completed span
    Stream,
    /// Strip indentation from CML marker lines, writing <FILE>.CMLINDENTOFF
    Unindent {
        /// File to process
        file: PathBuf,
    },
    /// Apply a CML patch file, writing <ORIGINAL>.PATCHED
    Patch {
        /// Path to the original file to be patched
        #[arg(long)]
        original: PathBuf,
        /// Path to the patch file
        #[arg(long)]
        patch: PathBuf,
    },
    /// Write every OUT span of a file to <OUTPUT_DIR>/<name>.txt
    Split {
        /// File containing CML-annotated text
        file: PathBuf,
        /// Directory for the extracted spans (defaults to the configured
        /// output directory)
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let parser = CmlParser::new()?;

    match cli.command {
        Command::Parse { file } => {
            let result = parser.parse_file(&file)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Stream => {
            let stdin = io::stdin();
            for event in parser.parse_stream(stdin.lock()) {
                println!("{}", serde_json::to_string(&event?)?);
            }
        }
        Command::Unindent { file } => {
            let content = cml_io::read_file(&file)?;
            let output_path = appended_extension(&file, "CMLINDENTOFF");
            cml_io::write_file(&output_path, &remove_cml_indentation(&content))?;
            println!("Successfully processed {}", file.display());
            println!("Output saved to {}", output_path.display());
        }
        Command::Patch { original, patch } => {
            let patch_content = cml_io::read_file(&patch)?;
            let blocks = parser
                .parse_content(&patch_content)
                .context("Error loading patch file")?
                .block;
            let original_content = cml_io::read_file(&original)?;

            for (tag, _) in &blocks {
                println!("Applying patch on code block '[[cc.block.{tag}]]'");
            }
            let patched = apply_patch(&original_content, &blocks);

            let output_path = appended_extension(&original, "PATCHED");
            cml_io::write_file(&output_path, &patched)?;
            println!(
                "Successfully created patched file: {}",
                output_path.display()
            );
        }
        Command::Split { file, output_dir } => {
            let result = parser.parse_file(&file)?;
            let output_dir = output_dir.unwrap_or_else(default_output_dir);

            for (name, content) in &result.out {
                let path = output_dir.join(format!("{name}.txt"));
                cml_io::write_file(&path, content)?;
                println!("Wrote {}", path.display());
            }
            println!("Parsed output saved to {}", output_dir.display());
        }
    }

    Ok(())
}

/// Append a suffix after the full file name, `output.py` → `output.py.PATCHED`.
fn appended_extension(path: &Path, suffix: &str) -> PathBuf {
    PathBuf::from(format!("{}.{suffix}", path.display()))
}

fn default_output_dir() -> PathBuf {
    match Config::load() {
        Ok(Some(config)) => config.output_dir,
        Ok(None) => Config::default().output_dir,
        Err(e) => {
            eprintln!("Warning: failed to load config file: {e}");
            Config::default().output_dir
        }
    }
}
