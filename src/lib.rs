//! # Image Batch Library
//!
//! Questo è il modulo principale della libreria che espone tutte le API pubbliche.
//!
//! ## Responsabilità:
//! - Definisce la struttura modulare dell'applicazione
//! - Espone i tipi e le funzioni principali tramite re-exports
//! - Fornisce un'interfaccia pulita per il main.rs e per altri consumatori
//!
//! ## Architettura dei moduli:
//! - `instruction`: Interpretazione dell'istruzione in linguaggio naturale
//! - `config`: Gestione configurazione e validazione parametri
//! - `error`: Tipi di errore custom per l'elaborazione dei file
//! - `file_manager`: Scansione directory e sostituzione atomica dei file
//! - `preview`: Anteprima del batch e conferma oltre la soglia
//! - `resize`: Geometria (crop quadrato, modalità di fit)
//! - `image_processor`: Decodifica, trasformazione e ricodifica di una singola immagine
//! - `batch`: Orchestratore principale del processo
//! - `progress`: Progress tracking e statistiche
//! - `report`: Report finale con riduzione per file e complessiva
//! - `json_output`: Eventi JSON per l'integrazione con altri processi
//!
//! ## Utilizzo:
//! ```ignore
//! use image_batch::{parse_instruction, BatchRunner, Config};
//!
//! let options = parse_instruction("./photos resize 800x600 to webp quality 75")?;
//! let report = BatchRunner::new(options, Config::default())?.run().await?;
//! println!("{:.1}% smaller", report.overall_reduction_percent);
//! ```

pub mod batch;
pub mod config;
pub mod error;
pub mod file_manager;
pub mod image_processor;
pub mod instruction;
pub mod json_output;
pub mod preview;
pub mod progress;
pub mod report;
pub mod resize;

pub use batch::BatchRunner;
pub use config::Config;
pub use error::BatchError;
pub use instruction::{parse_instruction, BatchOptions, ParseError};
pub use report::{BatchReport, FileReport, FileStatus};
