use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

use receipt::config::{
    config_dir, load_document, load_settings, resolve_output_dir, save_document, CONFIG_TEMPLATE,
    DEFAULT_DOCUMENT,
};
use receipt::error::{ReceiptError, Result};
use receipt::invoice::compute::words_for_amount;
use receipt::invoice::{amount, Invoice, InvoiceView, LineField, RenderMode, Totals};
use receipt::render::{Exporter, RenderSurface, TerminalPreview, TypstExporter};
use receipt::session::{parse_line_number, Session};
use receipt::Settings;

#[derive(Parser)]
#[command(name = "receipt")]
#[command(version, about = "Receipt/invoice editor with computed totals", long_about = None)]
struct Cli {
    /// Path to config directory (default: ~/.receipt or XDG config)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with a config and a starter receipt
    Init,

    /// Print the receipt preview with computed totals
    Show {
        /// Receipt file (default: receipt.toml in the config directory)
        file: Option<PathBuf>,
    },

    /// Compute the amount of a single line
    Amount {
        #[arg(allow_hyphen_values = true)]
        quantity: String,
        #[arg(allow_hyphen_values = true)]
        rate: String,
    },

    /// Spell a number in English words
    Words {
        #[arg(allow_hyphen_values = true)]
        number: f64,
    },

    /// Append an empty line item
    AddLine {
        file: Option<PathBuf>,
    },

    /// Remove a line item (1-based, as shown by 'show')
    RemoveLine {
        line: String,
        file: Option<PathBuf>,
    },

    /// Edit a line item field: description, quantity or rate
    SetLine {
        line: String,
        field: String,
        #[arg(allow_hyphen_values = true)]
        value: String,
        file: Option<PathBuf>,
    },

    /// Set a header field, e.g. clientName or taxLabel
    Set {
        field: String,
        #[arg(allow_hyphen_values = true)]
        value: String,
        file: Option<PathBuf>,
    },

    /// Export the receipt to Reciept.pdf
    Export {
        file: Option<PathBuf>,

        /// Output directory (default: export.output_dir from config.toml)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Open exported PDF with system default viewer
        #[arg(long)]
        open: bool,
    },

    /// Edit interactively; commands are read from stdin
    Session {
        file: Option<PathBuf>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Determine config directory
    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Show { file } => cmd_show(&cfg_dir, file),
        Commands::Amount { quantity, rate } => {
            println!("{}", amount(&quantity, &rate));
            Ok(())
        }
        Commands::Words { number } => {
            println!("{}", words_for_amount(number));
            Ok(())
        }
        Commands::AddLine { file } => cmd_edit(&cfg_dir, file, |invoice| {
            let index = invoice.add_line();
            Ok(format!("Added line {}", index + 1))
        }),
        Commands::RemoveLine { line, file } => {
            let index = parse_line_number(&line)?;
            cmd_edit(&cfg_dir, file, |invoice| {
                let removed = invoice.remove_line(index)?;
                Ok(format!("Removed line {} ({:?})", index + 1, removed.description))
            })
        }
        Commands::SetLine {
            line,
            field,
            value,
            file,
        } => {
            let index = parse_line_number(&line)?;
            let field: LineField = field.parse()?;
            cmd_edit(&cfg_dir, file, |invoice| {
                invoice.set_line_field(index, field, &value)?;
                let stored = &invoice.product_lines[index];
                Ok(format!(
                    "Line {}: {} x {} = {}",
                    index + 1,
                    stored.quantity,
                    stored.rate,
                    amount(&stored.quantity, &stored.rate)
                ))
            })
        }
        Commands::Set { field, value, file } => cmd_edit(&cfg_dir, file, |invoice| {
            invoice.set_field(&field, &value)?;
            Ok(format!("Set {field}"))
        }),
        Commands::Export { file, output, open } => cmd_export(&cfg_dir, file, output, open),
        Commands::Session { file } => cmd_session(&cfg_dir, file),
    }
}

fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

/// Receipt file to work on: the given one, or the one `init` created
fn document_path(cfg_dir: &Path, file: Option<PathBuf>) -> Result<PathBuf> {
    match file {
        Some(path) => Ok(path),
        None => {
            if !cfg_dir.exists() {
                return Err(ReceiptError::ConfigNotFound(cfg_dir.to_path_buf()));
            }
            Ok(cfg_dir.join(DEFAULT_DOCUMENT))
        }
    }
}

/// Directory image references in a receipt resolve against
fn asset_dir(document: &Path) -> PathBuf {
    document
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

fn open_document(cfg_dir: &Path, file: Option<PathBuf>) -> Result<(PathBuf, Invoice)> {
    let path = document_path(cfg_dir, file)?;
    let invoice = Invoice::start_session(Some(load_document(&path)?), today());
    Ok((path, invoice))
}

/// Initialize config directory with template files
fn cmd_init(cfg_dir: &Path) -> Result<()> {
    if cfg_dir.exists() {
        return Err(ReceiptError::AlreadyInitialized(cfg_dir.to_path_buf()));
    }

    fs::create_dir_all(cfg_dir)?;
    fs::create_dir_all(cfg_dir.join("output"))?;

    fs::write(cfg_dir.join("config.toml"), CONFIG_TEMPLATE)?;
    save_document(&cfg_dir.join(DEFAULT_DOCUMENT), &Invoice::default())?;

    println!("Initialized receipt config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Adjust currency and export settings:  $EDITOR {}/config.toml",
        cfg_dir.display()
    );
    println!(
        "  2. Fill in the starter receipt:          $EDITOR {}/{}",
        cfg_dir.display(),
        DEFAULT_DOCUMENT
    );
    println!();
    println!("Then preview or export it:");
    println!("  receipt show");
    println!("  receipt export");

    Ok(())
}

fn cmd_show(cfg_dir: &Path, file: Option<PathBuf>) -> Result<()> {
    let settings = load_settings(cfg_dir)?;
    let (path, invoice) = open_document(cfg_dir, file)?;

    let view = InvoiceView::build(
        &invoice,
        &settings.receipt,
        RenderMode::Interactive,
        today(),
        &asset_dir(&path),
    );
    TerminalPreview::new(std::io::stdout().lock()).render(&view)
}

/// Load a receipt, apply one edit and write it back
fn cmd_edit<F>(cfg_dir: &Path, file: Option<PathBuf>, edit: F) -> Result<()>
where
    F: FnOnce(&mut Invoice) -> Result<String>,
{
    let settings = load_settings(cfg_dir)?;
    let (path, mut invoice) = open_document(cfg_dir, file)?;

    let message = edit(&mut invoice)?;
    save_document(&path, &invoice)?;

    let totals = Totals::compute(&invoice);
    println!("{message}");
    println!(
        "  Total:  {} {}",
        settings.receipt.currency_code, totals.total
    );
    println!("  Saved:  {}", path.display());
    Ok(())
}

fn export_dir(cfg_dir: &Path, settings: &Settings, output: Option<PathBuf>) -> PathBuf {
    output.unwrap_or_else(|| resolve_output_dir(&settings.export.output_dir, cfg_dir))
}

fn cmd_export(
    cfg_dir: &Path,
    file: Option<PathBuf>,
    output: Option<PathBuf>,
    open: bool,
) -> Result<()> {
    let settings = load_settings(cfg_dir)?;
    let (path, invoice) = open_document(cfg_dir, file)?;

    let view = InvoiceView::build(
        &invoice,
        &settings.receipt,
        RenderMode::Export,
        today(),
        &asset_dir(&path),
    );
    let exporter = TypstExporter::new(export_dir(cfg_dir, &settings, output));
    let pdf_path = exporter.export(&view)?;

    println!("Exported {}", pdf_path.display());
    println!(
        "  Total:  {} {}",
        settings.receipt.currency_code, view.total_display
    );
    println!("  Words:  {}", view.amount_in_words);

    if open {
        open_path(&pdf_path)?;
    }
    Ok(())
}

fn cmd_session(cfg_dir: &Path, file: Option<PathBuf>) -> Result<()> {
    let settings = load_settings(cfg_dir)?;
    let (path, invoice) = open_document(cfg_dir, file)?;

    let exporter = TypstExporter::new(export_dir(cfg_dir, &settings, None));
    let assets = asset_dir(&path);
    let session = Session::new(invoice, settings, path, assets);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let stdin = tokio::io::BufReader::new(tokio::io::stdin());
        let mut stdout = std::io::stdout();
        session.run(stdin, &mut stdout, exporter).await
    })?;

    Ok(())
}

fn open_path(pdf_path: &Path) -> Result<()> {
    // Open with system default viewer
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(pdf_path).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(pdf_path).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", ""])
            .arg(pdf_path)
            .spawn()?;
    }
    Ok(())
}
