pub mod config;
pub mod debounce;
pub mod error;
pub mod invoice;
pub mod render;
pub mod session;

pub use config::{ExportSettings, ReceiptSettings, Settings};
pub use debounce::Debouncer;
pub use error::{ReceiptError, Result};
pub use invoice::{amount, to_words, Invoice, InvoiceView, LineField, ProductLine, RenderMode, Totals};
pub use render::{Exporter, RenderSurface, TypstExporter};
pub use session::Session;
