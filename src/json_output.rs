//! # JSON Output Module
//!
//! Questo modulo gestisce l'output strutturato in JSON (una riga per evento su stdout)
//! per chi invoca il tool da un altro processo.
//!
//! ## Responsabilità:
//! - Emette messaggi JSON strutturati per gli eventi del batch
//! - Riutilizza `FileReport` e `BatchReport` come payload
//! - In modalità JSON i log vanno su stderr e la progress bar è nascosta
//!
//! ## Tipi di messaggi:
//! - `start`: Anteprima del batch (numero file, dimensione totale, operazioni)
//! - `file_complete`: Fine elaborazione di un file
//! - `progress`: Contatori correnti
//! - `complete`: Report finale
//! - `cancelled`: L'utente ha rifiutato la conferma
//! - `error`: Errore generale

use crate::progress::BatchStats;
use crate::report::{BatchReport, FileReport};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Tipo di messaggio JSON
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum JsonMessage {
    /// Anteprima prima di toccare i file
    #[serde(rename = "start")]
    Start {
        directory: PathBuf,
        total_files: usize,
        total_bytes: u64,
        formats: BTreeMap<String, usize>,
        operations: String,
        dry_run: bool,
    },

    #[serde(rename = "file_complete")]
    FileComplete(FileReport),

    #[serde(rename = "progress")]
    Progress {
        current: usize,
        total: usize,
        percentage: f64,
        files_converted: usize,
        files_skipped: usize,
        errors: usize,
        bytes_saved: u64,
    },

    #[serde(rename = "complete")]
    Complete(BatchReport),

    #[serde(rename = "cancelled")]
    Cancelled { directory: PathBuf, total_files: usize },

    #[serde(rename = "error")]
    Error { message: String, details: Option<String> },
}

impl JsonMessage {
    /// Emette il messaggio JSON su stdout
    pub fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            println!("{}", json);
        }
    }

    /// Crea un messaggio di progresso a partire dai contatori correnti
    pub fn progress(stats: &BatchStats, total: usize) -> Self {
        let percentage = if total > 0 {
            (stats.files_processed as f64 / total as f64) * 100.0
        } else {
            0.0
        };

        Self::Progress {
            current: stats.files_processed,
            total,
            percentage,
            files_converted: stats.files_converted,
            files_skipped: stats.files_skipped,
            errors: stats.errors,
            bytes_saved: stats.bytes_saved(),
        }
    }

    pub fn error(message: String, details: Option<String>) -> Self {
        Self::Error { message, details }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use std::time::Duration;

    #[test]
    fn test_progress_message() {
        let mut stats = BatchStats::new();
        stats.add_converted(1000, 400);
        stats.add_error();

        let value = serde_json::to_value(JsonMessage::progress(&stats, 4)).unwrap();
        assert_eq!(value["type"], "progress");
        assert_eq!(value["current"], 2);
        assert_eq!(value["percentage"], 50.0);
        assert_eq!(value["bytes_saved"], 600);
    }

    #[test]
    fn test_payload_structs_are_flattened_under_tag() {
        let file = FileReport::failed(Path::new("x.png"), 10, "boom".to_string());
        let value = serde_json::to_value(JsonMessage::FileComplete(file)).unwrap();
        assert_eq!(value["type"], "file_complete");
        assert_eq!(value["status"], "failed");
        assert_eq!(value["detail"], "boom");

        let report = BatchReport::cancelled(PathBuf::from("pics"), Duration::ZERO);
        let value = serde_json::to_value(JsonMessage::Complete(report)).unwrap();
        assert_eq!(value["type"], "complete");
        assert_eq!(value["cancelled"], true);
    }

    #[test]
    fn test_error_message() {
        let value = serde_json::to_value(JsonMessage::error("bad".into(), None)).unwrap();
        assert_eq!(value["type"], "error");
        assert_eq!(value["message"], "bad");
        assert!(value["details"].is_null());
    }
}
