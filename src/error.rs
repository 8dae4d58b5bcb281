use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReceiptError {
    #[error("Config directory not found at {0}. Run 'receipt init' to create it.")]
    ConfigNotFound(PathBuf),

    #[error("Receipt file not found: {0}")]
    DocumentNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid date_format '{layout}' in {path}: it must render a plain date")]
    InvalidDateFormat { path: PathBuf, layout: String },

    #[error("Failed to parse receipt file {path}: {source}")]
    DocumentParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse receipt file {path}: {source}")]
    DocumentToml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to serialize receipt: {0}")]
    Serialize(String),

    #[error("Unknown field '{0}'")]
    UnknownField(String),

    #[error("Invalid value '{value}' for field '{field}'")]
    InvalidFieldValue { field: String, value: String },

    #[error("Line {} does not exist (the receipt has {count} line(s))", .index + 1)]
    LineOutOfRange { index: usize, count: usize },

    #[error("Unknown session command '{0}'. Type 'help' for the list of commands.")]
    UnknownCommand(String),

    #[error("Typst not found. Install it from https://typst.app/ or run: cargo install typst-cli")]
    TypstNotFound,

    #[error("Failed to generate PDF: {0}")]
    PdfGeneration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),
}

pub type Result<T> = std::result::Result<T, ReceiptError>;
