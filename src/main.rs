//! # Image Batch - Main Entry Point
//!
//! Questo è il punto di ingresso principale dell'applicazione.
//!
//! ## Responsabilità:
//! - Parsing degli argomenti della command line con `clap`
//! - Inizializzazione del sistema di logging con `tracing` (su stderr)
//! - Caricamento della configurazione e applicazione degli override da CLI
//! - Interpretazione dell'istruzione e avvio del batch
//!
//! ## Flusso di esecuzione:
//! 1. Parsa gli argomenti CLI (istruzione, --yes, --dry-run, --json, workers)
//! 2. Configura il logging (INFO o DEBUG a seconda del flag verbose, `RUST_LOG` se presente)
//! 3. Carica il file di configurazione e applica gli override
//! 4. Interpreta l'istruzione in `BatchOptions`
//! 5. Istanzia `BatchRunner` e avvia il batch
//!
//! ## Esempio di utilizzo:
//! ```bash
//! image-batch ~/Pictures/trip resize 1200x800 fit inside to webp quality 75
//! image-batch ./assets compress-only q60 --yes
//! ```

use anyhow::Result;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use image_batch::{json_output::JsonMessage, parse_instruction, BatchReport, BatchRunner, Config};

#[derive(Parser)]
#[command(name = "image-batch")]
#[command(about = "Resize, crop, convert and compress every image in a directory from a plain-language instruction")]
struct Args {
    /// Instruction, e.g. "./photos resize 800x600 to webp quality 75"
    #[arg(required = true)]
    instruction: Vec<String>,

    /// Skip the confirmation prompt for large batches
    #[arg(short, long)]
    yes: bool,

    /// Dry run - encode and report, don't touch any file
    #[arg(long)]
    dry_run: bool,

    /// Emit JSON events on stdout
    #[arg(long)]
    json: bool,

    /// Number of parallel workers
    #[arg(short, long)]
    workers: Option<usize>,

    /// Ask for confirmation above this many files
    #[arg(long)]
    threshold: Option<usize>,

    /// Config file (defaults to the user config directory)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging; stdout is kept for the report and JSON events
    let default_level = if args.verbose { "debug" } else { "info" };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let json = args.json;
    let result = run(args).await;
    if json {
        if let Some(event) = error_event(&result) {
            event.emit();
        }
    }

    let report = result?;
    if report.has_failures() {
        return Err(anyhow::anyhow!("{} file(s) failed", report.failed));
    }

    Ok(())
}

/// JSON `error` event for a run that never produced a report.
///
/// Failed files are already in the `complete` event.
fn error_event(result: &Result<BatchReport>) -> Option<JsonMessage> {
    result
        .as_ref()
        .err()
        .map(|e| JsonMessage::error(e.to_string(), e.chain().nth(1).map(|cause| cause.to_string())))
}

async fn run(args: Args) -> Result<BatchReport> {
    let config = load_config(&args).await?;

    let mut options = parse_instruction(&args.instruction.join(" "))?;
    if !options.unrecognized.is_empty() {
        warn!("Ignoring unrecognized words: {}", options.unrecognized.join(" "));
    }
    options.directory = expand_home(&options.directory);
    info!("Instruction: {}", options.describe(config.default_quality));

    BatchRunner::new(options, config)?.run().await
}

async fn load_config(args: &Args) -> Result<Config> {
    let mut config = match args.config.clone().or_else(Config::default_path) {
        Some(path) => Config::from_file(&path).await?,
        None => Config::default(),
    };

    if args.yes {
        config.assume_yes = true;
    }
    if args.dry_run {
        config.dry_run = true;
    }
    if args.json {
        config.json_output = true;
    }
    if let Some(workers) = args.workers {
        config.workers = workers;
    }
    if let Some(threshold) = args.threshold {
        config.confirm_threshold = threshold;
    }

    config.validate()?;
    Ok(config)
}

/// Expand a leading `~` to the home directory
fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_home() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(expand_home(Path::new("~/Pictures")), home.join("Pictures"));
        assert_eq!(expand_home(Path::new("./pics")), PathBuf::from("./pics"));
        assert_eq!(expand_home(Path::new("/tmp/~x")), PathBuf::from("/tmp/~x"));
    }

    #[test]
    fn test_failed_files_do_not_emit_error_event() {
        let failed = image_batch::FileReport::failed(Path::new("a.png"), 10, "boom".to_string());
        let report = BatchReport::new(PathBuf::from("."), vec![failed], std::time::Duration::ZERO, false);
        assert!(report.has_failures());
        assert!(error_event(&Ok(report)).is_none());

        let event = error_event(&Err(anyhow::anyhow!("Directory not found: ./nope"))).unwrap();
        let value = serde_json::to_value(event).unwrap();
        assert_eq!(value["type"], "error");
        assert_eq!(value["message"], "Directory not found: ./nope");
    }

    #[test]
    fn test_cli_collects_instruction_words() {
        let args = Args::parse_from(["image-batch", "./pics", "resize", "800x600", "--yes", "-w", "2"]);
        assert_eq!(args.instruction, vec!["./pics", "resize", "800x600"]);
        assert!(args.yes);
        assert_eq!(args.workers, Some(2));
    }
}
