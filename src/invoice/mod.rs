pub mod compute;
pub mod dates;
pub mod format;
mod model;
mod view;
pub mod words;

pub use compute::{amount, sale_tax, sub_total, tax_rate, Totals};
pub use model::{normalize_numeric_input, Invoice, LineField, ProductLine, DEFAULT_LOGO_WIDTH};
pub use view::{ImageRef, InvoiceView, LineView, RenderMode};
pub use words::to_words;
