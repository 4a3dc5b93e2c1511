//! # Configuration Management Module
//!
//! Questo modulo gestisce la configurazione runtime dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce la struct `Config` con i parametri di esecuzione del batch
//! - Fornisce validazione dei parametri di input
//! - Supporta caricamento/salvataggio configurazione da/verso file JSON
//! - Fornisce valori di default sensati per tutti i parametri
//!
//! Le opzioni *del lavoro* (formato, dimensioni, qualità richiesta) arrivano
//! dall'istruzione e vivono in `instruction::BatchOptions`; qui ci sono solo
//! i parametri di comportamento.
//!
//! ## Parametri di configurazione:
//! - `confirm_threshold`: Oltre questo numero di file serve conferma (default: 20)
//! - `default_quality`: Qualità usata se l'istruzione non la specifica (1-100, default: 80)
//! - `size_threshold`: In modalità compress-only sostituisce solo se new < original * threshold (default: 1.0)
//! - `workers`: Numero di worker paralleli (default: 4)
//! - `dry_run`: Simula senza scrivere (default: false)
//! - `assume_yes`: Salta la conferma interattiva (default: false)
//! - `json_output`: Eventi JSON su stdout invece della tabella (default: false)
//!
//! ## Esempio:
//! ```ignore
//! let config = Config {
//!     workers: 8,
//!     ..Default::default()
//! };
//! config.validate()?;
//! ```

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Runtime configuration for a batch run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Ask for confirmation when more than this many files match
    pub confirm_threshold: usize,
    /// Quality used when the instruction does not name one (1-100)
    pub default_quality: u8,
    /// Compress-only replaces a file only if new size < original * threshold
    pub size_threshold: f64,
    /// Number of parallel workers
    pub workers: usize,
    /// Dry run - don't actually write files
    pub dry_run: bool,
    /// Skip the interactive confirmation
    pub assume_yes: bool,
    /// Output events and report as JSON for programmatic use
    pub json_output: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            confirm_threshold: 20,
            default_quality: 80,
            size_threshold: 1.0,
            workers: 4,
            dry_run: false,
            assume_yes: false,
            json_output: false,
        }
    }
}

impl Config {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.default_quality == 0 || self.default_quality > 100 {
            return Err(anyhow::anyhow!("Default quality must be between 1 and 100"));
        }

        if self.size_threshold <= 0.0 || self.size_threshold > 1.0 {
            return Err(anyhow::anyhow!("Size threshold must be between 0.0 and 1.0"));
        }

        if self.workers == 0 {
            return Err(anyhow::anyhow!("Number of workers must be greater than 0"));
        }

        Ok(())
    }

    /// Default location of the config file (`<config_dir>/image-batch/config.json`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("image-batch").join("config.json"))
    }

    /// Load configuration from file, falling back to defaults if it does not exist
    pub async fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config file {}: {}", path.display(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}
