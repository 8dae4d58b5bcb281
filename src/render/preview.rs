use std::io::Write;
use tabled::{settings::Style, Table, Tabled};

use super::RenderSurface;
use crate::error::Result;
use crate::invoice::InvoiceView;

#[derive(Tabled)]
struct LineRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "DESCRIPTION")]
    description: String,
    #[tabled(rename = "QUANTITY")]
    quantity: String,
    #[tabled(rename = "RATE")]
    rate: String,
    #[tabled(rename = "AMOUNT")]
    amount: String,
}

fn or_dash(value: &str) -> &str {
    if value.trim().is_empty() {
        "-"
    } else {
        value
    }
}

/// Text rendering of the editable preview
pub fn render_preview(view: &InvoiceView) -> String {
    let invoice = &view.invoice;
    let mut out = String::new();

    out.push_str(or_dash(&invoice.title));
    out.push('\n');
    out.push_str(&"-".repeat(50));
    out.push('\n');
    out.push_str(&format!("Name:           {}\n", or_dash(&invoice.client_name)));
    out.push_str(&format!("Phone Number:   {}\n", or_dash(&invoice.client_contact)));
    out.push_str(&format!("Client Address: {}\n", or_dash(&invoice.client_country)));
    out.push_str(&format!("Date:           {}\n", view.invoice_date));
    out.push_str(&format!("Due:            {}\n", view.due_date));
    out.push('\n');

    // Line numbers are 1-based for the user, like the session commands
    let rows: Vec<LineRow> = view
        .lines
        .iter()
        .map(|line| LineRow {
            index: line.index + 1,
            description: line.description.clone(),
            quantity: line.quantity.clone(),
            rate: line.rate.clone(),
            amount: line.amount.clone(),
        })
        .collect();

    if rows.is_empty() {
        out.push_str("No line items.\n");
    } else {
        out.push_str(&Table::new(rows).with(Style::rounded()).to_string());
        out.push('\n');
    }

    out.push('\n');
    out.push_str(&format!(
        "{:<16}{}\n",
        format!("{}:", or_dash(&invoice.sub_total_label)),
        view.sub_total_display
    ));
    out.push_str(&format!(
        "{:<16}{}\n",
        format!("{}:", or_dash(&invoice.tax_label)),
        view.sale_tax_display
    ));
    out.push_str(&format!(
        "{:<16}{} {}\n",
        "Total:", view.currency_code, view.total_display
    ));
    out.push_str(&format!("Amount in words: {}\n", view.amount_in_words));

    if !view.images.is_empty() {
        out.push('\n');
        for image in &view.images {
            out.push_str(&format!("[{}] {}\n", image.slot, image.source));
        }
    }

    out
}

/// Writes previews to a terminal or any other writer
pub struct TerminalPreview<W: Write> {
    out: W,
}

impl<W: Write> TerminalPreview<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> RenderSurface for TerminalPreview<W> {
    fn render(&mut self, view: &InvoiceView) -> Result<()> {
        writeln!(self.out, "{}", render_preview(view))?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReceiptSettings;
    use crate::invoice::{Invoice, RenderMode};
    use chrono::NaiveDate;
    use std::path::Path;

    fn view(invoice: &Invoice) -> InvoiceView {
        InvoiceView::build(
            invoice,
            &ReceiptSettings::default(),
            RenderMode::Interactive,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            Path::new("."),
        )
    }

    #[test]
    fn preview_shows_lines_and_totals() {
        let mut invoice = Invoice::default();
        invoice.client_name = "Alice".to_string();
        let text = render_preview(&view(&invoice));

        assert!(text.contains("RECEIPT/INVOICE"));
        assert!(text.contains("Alice"));
        assert!(text.contains("Phone name"));
        assert!(text.contains("UGX 200"));
        assert!(text.contains("20.00"));
        assert!(text.contains("Two Hundred Uganda Shillings Only"));
        assert!(text.contains("31 Jan 2024"));
    }

    #[test]
    fn surface_writes_to_its_writer() {
        let invoice = Invoice::default();
        let mut surface = TerminalPreview::new(Vec::new());
        surface.render(&view(&invoice)).unwrap();
        let written = String::from_utf8(surface.into_inner()).unwrap();
        assert!(written.contains("AMOUNT"));
    }
}
