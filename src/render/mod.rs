mod preview;
mod typst;

pub use preview::{render_preview, TerminalPreview};
pub use typst::{TypstExporter, EXPORT_FILE_NAME};

use std::path::PathBuf;

use crate::error::Result;
use crate::invoice::InvoiceView;

/// Something that displays an invoice view
pub trait RenderSurface {
    fn render(&mut self, view: &InvoiceView) -> Result<()>;
}

/// Produces the downloadable document for a view
pub trait Exporter {
    /// Returns the path of the written document
    fn export(&self, view: &InvoiceView) -> Result<PathBuf>;
}
