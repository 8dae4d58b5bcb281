use std::path::{Path, PathBuf};
use std::process::Command;

use super::Exporter;
use crate::error::{ReceiptError, Result};
use crate::invoice::InvoiceView;

/// File name of every exported document. The spelling is relied upon by
/// existing downstream users.
pub const EXPORT_FILE_NAME: &str = "Reciept.pdf";

/// Embedded Typst template for receipt generation
/// Uses a placeholder that gets replaced with the actual JSON file path
const RECEIPT_TEMPLATE: &str = r##"// Receipt Template
// Data is loaded from JSON file

#let data = json("DATA_JSON_PATH")
#let inv = data.invoice

#let image-of(slot, width) = {
  let found = data.images.filter(i => i.slot == slot)
  if found.len() > 0 and found.at(0).embedded != none {
    image(found.at(0).embedded, width: width)
  }
}

#set page(
  paper: "a4",
  margin: (top: 0.8in, bottom: 0.8in, left: 0.8in, right: 0.8in),
)

#set text(font: "Helvetica", size: 10pt)

// Header with logo and document title
#grid(
  columns: (1fr, 1fr),
  align: (left, right),
  [
    #image-of("logo", inv.logoWidth * 1pt)
    #text(size: 18pt, weight: "bold", fill: red)[#inv.companyName]
  ],
  [
    #text(size: 24pt, weight: "bold")[#inv.title]
    #v(0.5em)
    #grid(
      columns: (1fr, 1fr),
      gutter: 6pt,
      image-of("phone_image1", 72pt),
      image-of("phone_image2", 72pt),
    )
  ]
)

#v(0.5em)
#text(weight: "bold", size: 12pt, fill: red)[#inv.notesLabel]
#v(0.2em)
#text(size: 9pt)[#inv.notes]

#v(1.5em)

// Client block and dates
#grid(
  columns: (55%, 45%),
  [
    #text(weight: "bold")[Name] \
    #inv.clientName \
    #text(weight: "bold")[Phone Number] \
    #inv.clientContact \
    #text(weight: "bold")[Client Address] \
    #inv.clientCountry
  ],
  [
    #table(
      columns: (auto, auto),
      stroke: none,
      align: (right, left),
      inset: 2pt,
      [*Date:*], [#data.invoice_date],
      [*#inv.invoiceDueDateLabel:*], [#data.due_date],
    )
  ]
)

#v(1.5em)

// Line items table
#table(
  columns: (1fr, auto, auto, auto),
  align: (left, right, right, right),
  stroke: (x, y) => if y == 0 { (bottom: 1pt + black) } else if y > 0 { (bottom: 0.5pt + gray) },
  inset: 8pt,
  fill: (x, y) => if y == 0 { rgb("#1a3d7c") } else { none },

  // Header
  text(fill: white)[*#inv.productLineDescription*],
  text(fill: white)[*#inv.productLineQuantity*],
  text(fill: white)[*#inv.productLineQuantityRate*],
  text(fill: white)[*#inv.productLineQuantityAmount*],

  // Items
  ..data.lines.map(line => (
    line.description,
    line.quantity,
    line.rate,
    line.amount,
  )).flatten()
)

#v(1em)

// Totals
#align(right)[
  #table(
    columns: (auto, auto),
    stroke: none,
    align: (left, right),
    inset: 6pt,
    fill: luma(235),
    [*Total*], [*#data.currency_code #data.total_display*],
  )
]

#v(0.5em)
#text(weight: "bold")[Amount in words:] \
#data.amount_in_words

#line(length: 100%, stroke: 0.5pt + gray)

#text(weight: "bold", size: 12pt)[#inv.termLabel] \
#text(size: 9pt)[#inv.term]

#v(2em)
#text(weight: "bold")[Authorized Signature]
#v(0.3em)
#image-of("signature", 180pt)
"##;

/// Exports views to PDF with the Typst CLI
#[derive(Debug, Clone)]
pub struct TypstExporter {
    output_dir: PathBuf,
}

impl TypstExporter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(EXPORT_FILE_NAME)
    }
}

/// Template text with the data file location filled in
fn template_for(json_path: &Path) -> String {
    RECEIPT_TEMPLATE.replace("DATA_JSON_PATH", &json_path.display().to_string())
}

impl Exporter for TypstExporter {
    fn export(&self, view: &InvoiceView) -> Result<PathBuf> {
        // Check if typst is available
        let typst_check = Command::new("typst").arg("--version").output();

        if typst_check.is_err() {
            return Err(ReceiptError::TypstNotFound);
        }

        // Create temp directory for template
        let temp_dir = std::env::temp_dir().join("receipt-cli");
        std::fs::create_dir_all(&temp_dir)?;
        let temp_dir = temp_dir.canonicalize()?;
        std::fs::create_dir_all(&self.output_dir)?;

        let json_data = serde_json::to_string(view)
            .map_err(|e| ReceiptError::PdfGeneration(e.to_string()))?;

        let json_path = temp_dir.join("data.json");
        std::fs::write(&json_path, &json_data)?;

        let template_path = temp_dir.join("receipt.typ");
        std::fs::write(&template_path, template_for(&json_path))?;

        let output_path = self.output_path();

        // Root at "/" so embedded images can be anywhere on disk
        let output = Command::new("typst")
            .arg("compile")
            .arg("--root")
            .arg("/")
            .arg(&template_path)
            .arg(&output_path)
            .output()?;

        // Clean up temp files
        let _ = std::fs::remove_file(&template_path);
        let _ = std::fs::remove_file(&json_path);

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ReceiptError::PdfGeneration(stderr.to_string()));
        }

        log::info!("exported {}", output_path.display());
        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_keeps_legacy_file_name() {
        let exporter = TypstExporter::new("/tmp/out");
        assert_eq!(exporter.output_path(), PathBuf::from("/tmp/out/Reciept.pdf"));
    }

    #[test]
    fn template_points_at_data_file() {
        let template = template_for(Path::new("/tmp/receipt-cli/data.json"));
        assert!(template.contains(r#"json("/tmp/receipt-cli/data.json")"#));
        assert!(!template.contains("DATA_JSON_PATH"));
    }
}
