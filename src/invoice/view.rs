use chrono::NaiveDate;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::ReceiptSettings;
use crate::invoice::compute::{amount, Totals};
use crate::invoice::dates::{effective_due_date, effective_invoice_date, format_date_with};
use crate::invoice::format::{format_money, format_whole};
use crate::invoice::model::Invoice;

/// Which surface a view is built for
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// On-screen editing: every row shown, images by reference
    Interactive,
    /// Downloadable document: blank rows hidden, images embedded
    Export,
}

/// A product line with its computed amount
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct LineView {
    /// Position in the invoice, which is the line's identity
    pub index: usize,
    pub description: String,
    pub quantity: String,
    pub rate: String,
    pub amount: String,
}

/// An image slot of the document
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ImageRef {
    pub slot: &'static str,
    /// Reference as stored in the invoice
    pub source: String,
    /// Absolute file to embed; only set in export mode
    pub embedded: Option<PathBuf>,
}

/// Read-only projection consumed by the preview and the exporter.
/// Both modes carry the same values and totals.
#[derive(Debug, Serialize, Clone)]
pub struct InvoiceView {
    pub mode: RenderMode,
    pub invoice: Invoice,
    pub invoice_date: String,
    pub due_date: String,
    pub lines: Vec<LineView>,
    pub totals: Totals,
    pub sub_total_display: String,
    pub sale_tax_display: String,
    pub total_display: String,
    pub currency_code: String,
    /// e.g. "Two Hundred Uganda Shillings Only"
    pub amount_in_words: String,
    pub images: Vec<ImageRef>,
}

fn image_slots(invoice: &Invoice) -> Vec<(&'static str, &str)> {
    let mut slots = vec![("logo", invoice.logo.as_str())];
    for (slot, value) in [
        ("phone_image1", &invoice.phone_image1),
        ("phone_image2", &invoice.phone_image2),
        ("signature", &invoice.signature),
    ] {
        if let Some(value) = value {
            slots.push((slot, value.as_str()));
        }
    }
    slots
        .into_iter()
        .filter(|(_, source)| !source.trim().is_empty())
        .collect()
}

/// Locate an image on disk. Web-style references ("/logo.png") are taken
/// relative to `asset_dir`.
fn resolve_image(source: &str, asset_dir: &Path) -> Option<PathBuf> {
    let relative = source.trim_start_matches('/');
    let candidate = asset_dir.join(relative);
    let candidate = if candidate.exists() {
        candidate
    } else {
        let as_given = PathBuf::from(source);
        if !as_given.exists() {
            return None;
        }
        as_given
    };
    candidate.canonicalize().ok()
}

impl InvoiceView {
    /// Build the view of `invoice` for `mode`. `today` stands in for a
    /// missing invoice date; `asset_dir` is where image references resolve.
    pub fn build(
        invoice: &Invoice,
        settings: &ReceiptSettings,
        mode: RenderMode,
        today: NaiveDate,
        asset_dir: &Path,
    ) -> Self {
        let totals = Totals::compute(invoice);

        let invoice_date = effective_invoice_date(invoice, today);
        let due_date = effective_due_date(invoice, today, i64::from(settings.due_days));

        let lines = invoice
            .product_lines
            .iter()
            .enumerate()
            .filter(|(_, line)| mode == RenderMode::Interactive || !line.description.is_empty())
            .map(|(index, line)| LineView {
                index,
                description: line.description.clone(),
                quantity: line.quantity.clone(),
                rate: line.rate.clone(),
                amount: amount(&line.quantity, &line.rate),
            })
            .collect();

        let images = image_slots(invoice)
            .into_iter()
            .filter_map(|(slot, source)| {
                let embedded = match mode {
                    RenderMode::Interactive => None,
                    RenderMode::Export => match resolve_image(source, asset_dir) {
                        Some(path) => Some(path),
                        None => {
                            log::warn!("image {slot} not found at {source:?}, leaving it out");
                            return None;
                        }
                    },
                };
                Some(ImageRef {
                    slot,
                    source: source.to_string(),
                    embedded,
                })
            })
            .collect();

        Self {
            mode,
            invoice: invoice.clone(),
            invoice_date: format_date_with(invoice_date, &settings.date_format),
            due_date: format_date_with(due_date, &settings.date_format),
            lines,
            sub_total_display: format_money(totals.sub_total),
            sale_tax_display: format_money(totals.sale_tax),
            total_display: format_whole(totals.total),
            currency_code: settings.currency_code.clone(),
            amount_in_words: format!(
                "{} {} Only",
                totals.total_in_words, settings.currency_name
            ),
            totals,
            images,
        }
    }

    pub fn image(&self, slot: &str) -> Option<&ImageRef> {
        self.images.iter().find(|image| image.slot == slot)
    }
}
