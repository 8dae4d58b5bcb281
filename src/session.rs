//! Line-oriented editing session: the invoice lives in memory, every edit
//! is previewed on demand and re-exported once edits go quiet.

use chrono::NaiveDate;
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::config::{save_document, Settings};
use crate::debounce::Debouncer;
use crate::error::{ReceiptError, Result};
use crate::invoice::{Invoice, InvoiceView, LineField, RenderMode, Totals};
use crate::render::{render_preview, Exporter};

pub const HELP: &str = "\
Commands:
  add                        append an empty line
  remove <N>                 remove line N
  line <N> <FIELD> <VALUE>   edit line N (description, quantity, rate)
  set <FIELD> <VALUE>        edit a header field (e.g. clientName)
  show                       print the preview
  save                       write the receipt file
  help                       show this list
  quit                       leave the session";

/// Turn a 1-based line number typed by the user into an index
pub fn parse_line_number(input: &str) -> Result<usize> {
    match input.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n - 1),
        _ => Err(ReceiptError::InvalidFieldValue {
            field: "line".to_string(),
            value: input.to_string(),
        }),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionCommand {
    Add,
    Remove(usize),
    Line {
        index: usize,
        field: LineField,
        value: String,
    },
    Set {
        field: String,
        value: String,
    },
    Show,
    Save,
    Help,
    Quit,
}

impl FromStr for SessionCommand {
    type Err = ReceiptError;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (verb, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim_start();

        match verb.to_ascii_lowercase().as_str() {
            "add" => Ok(SessionCommand::Add),
            "remove" | "rm" => Ok(SessionCommand::Remove(parse_line_number(rest)?)),
            "line" => {
                let mut parts = rest.splitn(3, ' ');
                let index = parse_line_number(parts.next().unwrap_or(""))?;
                let field: LineField = parts.next().unwrap_or("").parse()?;
                let value = parts.next().unwrap_or("").to_string();
                Ok(SessionCommand::Line {
                    index,
                    field,
                    value,
                })
            }
            "set" => {
                let (field, value) = rest.split_once(' ').unwrap_or((rest, ""));
                if field.is_empty() {
                    return Err(ReceiptError::UnknownField(String::new()));
                }
                Ok(SessionCommand::Set {
                    field: field.to_string(),
                    value: value.to_string(),
                })
            }
            "show" => Ok(SessionCommand::Show),
            "save" => Ok(SessionCommand::Save),
            "help" | "?" => Ok(SessionCommand::Help),
            "quit" | "exit" => Ok(SessionCommand::Quit),
            _ => Err(ReceiptError::UnknownCommand(line.to_string())),
        }
    }
}

impl SessionCommand {
    /// Apply an editing command. Returns whether the invoice changed.
    pub fn apply(&self, invoice: &mut Invoice) -> Result<bool> {
        match self {
            SessionCommand::Add => {
                invoice.add_line();
                Ok(true)
            }
            SessionCommand::Remove(index) => {
                invoice.remove_line(*index)?;
                Ok(true)
            }
            SessionCommand::Line {
                index,
                field,
                value,
            } => {
                invoice.set_line_field(*index, *field, value)?;
                Ok(true)
            }
            SessionCommand::Set { field, value } => {
                invoice.set_field(field, value)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

pub struct Session {
    invoice: Invoice,
    settings: Settings,
    document: PathBuf,
    asset_dir: PathBuf,
    today: fn() -> NaiveDate,
}

impl Session {
    pub fn new(invoice: Invoice, settings: Settings, document: PathBuf, asset_dir: PathBuf) -> Self {
        Self {
            invoice,
            settings,
            document,
            asset_dir,
            today: local_today,
        }
    }

    /// Replace the clock used for dates that default to today
    pub fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn invoice(&self) -> &Invoice {
        &self.invoice
    }

    fn view(&self, mode: RenderMode) -> InvoiceView {
        InvoiceView::build(
            &self.invoice,
            &self.settings.receipt,
            mode,
            (self.today)(),
            &self.asset_dir,
        )
    }

    /// Read commands until `quit` or end of input. The exporter receives
    /// the state once edits have been quiet for the configured window, and
    /// once more for any edit still pending when the session ends.
    pub async fn run<R, W, E>(mut self, input: R, out: &mut W, exporter: E) -> Result<Invoice>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
        E: Exporter + Send + 'static,
    {
        let receipt_settings = self.settings.receipt.clone();
        let asset_dir = self.asset_dir.clone();
        let today = self.today;

        let debouncer = Debouncer::spawn(
            Duration::from_millis(self.settings.export.debounce_ms),
            move |snapshot: Invoice| {
                let view = InvoiceView::build(
                    &snapshot,
                    &receipt_settings,
                    RenderMode::Export,
                    today(),
                    &asset_dir,
                );
                match exporter.export(&view) {
                    Ok(path) => log::info!("exported {}", path.display()),
                    Err(e) => log::error!("export failed: {e}"),
                }
            },
        );
        debouncer.push(self.invoice.clone());

        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            let command = match line.parse::<SessionCommand>() {
                Ok(command) => command,
                Err(e) => {
                    writeln!(out, "Error: {e}")?;
                    continue;
                }
            };

            match command {
                SessionCommand::Quit => break,
                SessionCommand::Help => writeln!(out, "{HELP}")?,
                SessionCommand::Show => {
                    writeln!(out, "{}", render_preview(&self.view(RenderMode::Interactive)))?
                }
                SessionCommand::Save => match save_document(&self.document, &self.invoice) {
                    Ok(()) => writeln!(out, "Saved {}", self.document.display())?,
                    Err(e) => writeln!(out, "Error: {e}")?,
                },
                edit => match edit.apply(&mut self.invoice) {
                    Ok(_) => {
                        debouncer.push(self.invoice.clone());
                        let totals = Totals::compute(&self.invoice);
                        writeln!(
                            out,
                            "OK  lines: {}  total: {} {}",
                            self.invoice.product_lines.len(),
                            self.settings.receipt.currency_code,
                            totals.total
                        )?;
                    }
                    Err(e) => writeln!(out, "Error: {e}")?,
                },
            }
        }

        debouncer.close().await;
        Ok(self.invoice)
    }
}
