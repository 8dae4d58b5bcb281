use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ReceiptError, Result};
use crate::invoice::compute::parse_decimal;
use crate::invoice::dates::format_date;

/// Logo width in pixels when the document does not specify one
pub const DEFAULT_LOGO_WIDTH: f64 = 100.0;

/// A billable row. Quantity and rate stay as typed so partially entered
/// numbers ("2.", "1.50") survive editing.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProductLine {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub rate: String,
}

impl ProductLine {
    pub fn new(description: &str, quantity: &str, rate: &str) -> Self {
        Self {
            description: description.to_string(),
            quantity: quantity.to_string(),
            rate: rate.to_string(),
        }
    }
}

impl Default for ProductLine {
    /// The row appended by "add line"
    fn default() -> Self {
        Self::new("", "1", "0")
    }
}

/// Editable columns of a product line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineField {
    Description,
    Quantity,
    Rate,
}

impl std::str::FromStr for LineField {
    type Err = ReceiptError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "description" | "desc" => Ok(LineField::Description),
            "quantity" | "qty" => Ok(LineField::Quantity),
            "rate" => Ok(LineField::Rate),
            _ => Err(ReceiptError::UnknownField(s.to_string())),
        }
    }
}

fn default_logo_width() -> f64 {
    DEFAULT_LOGO_WIDTH
}

fn seed_product_lines() -> Vec<ProductLine> {
    vec![
        ProductLine::new("Phone name", "2", "100"),
        ProductLine::default(),
        ProductLine::default(),
    ]
}

/// The in-memory record edited during one session.
///
/// Serialized in camelCase so documents saved by the web editor load
/// unchanged. Missing string fields deserialize to `""`, `logoWidth` to
/// [`DEFAULT_LOGO_WIDTH`] and `productLines` to the seed rows.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    #[serde(default)]
    pub logo: String,
    #[serde(default = "default_logo_width")]
    pub logo_width: f64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub company_address: String,
    #[serde(default)]
    pub company_address2: String,
    #[serde(default)]
    pub company_country: String,
    #[serde(default)]
    pub bill_to: String,
    #[serde(default)]
    pub client_name: String,
    #[serde(default)]
    pub client_contact: String,
    #[serde(default)]
    pub client_address: String,
    #[serde(default)]
    pub client_address2: String,
    #[serde(default)]
    pub client_country: String,
    #[serde(default)]
    pub invoice_title_label: String,
    #[serde(default)]
    pub invoice_title: String,
    #[serde(default)]
    pub invoice_date_label: String,
    #[serde(default)]
    pub invoice_date: String,
    #[serde(default)]
    pub invoice_due_date_label: String,
    #[serde(default)]
    pub invoice_due_date: String,
    #[serde(default)]
    pub product_line_description: String,
    #[serde(default)]
    pub product_line_quantity: String,
    #[serde(default)]
    pub product_line_quantity_rate: String,
    #[serde(default)]
    pub product_line_quantity_amount: String,
    #[serde(default = "seed_product_lines")]
    pub product_lines: Vec<ProductLine>,
    #[serde(default)]
    pub sub_total_label: String,
    #[serde(default)]
    pub tax_label: String,
    #[serde(default)]
    pub total_label: String,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub notes_label: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub term_label: String,
    #[serde(default)]
    pub term: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_image1: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_image2: Option<String>,
}

impl Default for Invoice {
    /// Seed document used when a session starts without data
    fn default() -> Self {
        Self {
            logo: String::new(),
            logo_width: DEFAULT_LOGO_WIDTH,
            title: "RECEIPT/INVOICE".to_string(),
            company_name: String::new(),
            name: String::new(),
            company_address: String::new(),
            company_address2: String::new(),
            company_country: "Uganda".to_string(),
            bill_to: "Bill To:".to_string(),
            client_name: String::new(),
            client_contact: String::new(),
            client_address: String::new(),
            client_address2: String::new(),
            client_country: "Uganda".to_string(),
            invoice_title_label: "Invoice#".to_string(),
            invoice_title: String::new(),
            invoice_date_label: "Invoice Date".to_string(),
            invoice_date: String::new(),
            invoice_due_date_label: "Due Date".to_string(),
            invoice_due_date: String::new(),
            product_line_description: "Item Description".to_string(),
            product_line_quantity: "Qantity".to_string(),
            product_line_quantity_rate: "Rate".to_string(),
            product_line_quantity_amount: "Amount".to_string(),
            product_lines: seed_product_lines(),
            sub_total_label: "Sub Total".to_string(),
            tax_label: "Sale Tax (10%)".to_string(),
            total_label: "TOTAL".to_string(),
            currency: "$".to_string(),
            notes_label: "Quality Service is our Priority".to_string(),
            notes: "Dealers in all kinds of Original Electronics, Original Mobile Devices Repairs, \
                    Computer Services, Ipads, Programming, Software updates, Phone accessories, \
                    flashing and Unlocking and Sales of all Original Mobile Devices."
                .to_string(),
            term_label: "Terms & Conditions".to_string(),
            term: "Phone should not go beyond 3 Months in a repair centre. \
                   Your device is our dedication."
                .to_string(),
            signature: Some(String::new()),
            phone_image1: Some("/apple-logo.png".to_string()),
            phone_image2: Some("/hp-logo.png".to_string()),
        }
    }
}

/// Normalize a quantity or rate keystroke.
///
/// Input that looks mid-typed (trailing `.`, or trailing `0` after a
/// decimal point) is kept verbatim, anything else is reduced to the number
/// it starts with, `"0"` when there is none.
pub fn normalize_numeric_input(value: &str) -> String {
    if value.ends_with('.') || (value.ends_with('0') && value.contains('.')) {
        return value.to_string();
    }

    let n = parse_decimal(value);
    if n == 0.0 {
        "0".to_string()
    } else {
        n.to_string()
    }
}

impl Invoice {
    /// Start an editing session from loaded data or the seed document.
    /// An empty invoice date is pinned to `today` here and never re-evaluated.
    pub fn start_session(data: Option<Invoice>, today: NaiveDate) -> Self {
        let mut invoice = data.unwrap_or_default();
        if invoice.invoice_date.is_empty() {
            invoice.invoice_date = format_date(today);
            log::debug!("invoice date defaulted to {}", invoice.invoice_date);
        }
        invoice
    }

    /// Set a header field by its camelCase or snake_case name
    pub fn set_field(&mut self, name: &str, value: &str) -> Result<()> {
        let key: String = name
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();

        if key == "logowidth" {
            let width: f64 = value
                .trim()
                .parse()
                .map_err(|_| ReceiptError::InvalidFieldValue {
                    field: name.to_string(),
                    value: value.to_string(),
                })?;
            self.logo_width = width;
            return Ok(());
        }

        let optional = match key.as_str() {
            "signature" => Some(&mut self.signature),
            "phoneimage1" => Some(&mut self.phone_image1),
            "phoneimage2" => Some(&mut self.phone_image2),
            _ => None,
        };
        if let Some(slot) = optional {
            *slot = Some(value.to_string());
            return Ok(());
        }

        let field = match key.as_str() {
            "logo" => &mut self.logo,
            "title" => &mut self.title,
            "companyname" => &mut self.company_name,
            "name" => &mut self.name,
            "companyaddress" => &mut self.company_address,
            "companyaddress2" => &mut self.company_address2,
            "companycountry" => &mut self.company_country,
            "billto" => &mut self.bill_to,
            "clientname" => &mut self.client_name,
            "clientcontact" => &mut self.client_contact,
            "clientaddress" => &mut self.client_address,
            "clientaddress2" => &mut self.client_address2,
            "clientcountry" => &mut self.client_country,
            "invoicetitlelabel" => &mut self.invoice_title_label,
            "invoicetitle" => &mut self.invoice_title,
            "invoicedatelabel" => &mut self.invoice_date_label,
            "invoicedate" => &mut self.invoice_date,
            "invoiceduedatelabel" => &mut self.invoice_due_date_label,
            "invoiceduedate" => &mut self.invoice_due_date,
            "productlinedescription" => &mut self.product_line_description,
            "productlinequantity" => &mut self.product_line_quantity,
            "productlinequantityrate" => &mut self.product_line_quantity_rate,
            "productlinequantityamount" => &mut self.product_line_quantity_amount,
            "subtotallabel" => &mut self.sub_total_label,
            "taxlabel" => &mut self.tax_label,
            "totallabel" => &mut self.total_label,
            "currency" => &mut self.currency,
            "noteslabel" => &mut self.notes_label,
            "notes" => &mut self.notes,
            "termlabel" => &mut self.term_label,
            "term" => &mut self.term,
            _ => return Err(ReceiptError::UnknownField(name.to_string())),
        };

        *field = value.to_string();
        log::debug!("set {name} = {value:?}");
        Ok(())
    }

    /// Edit one cell of a product line
    pub fn set_line_field(&mut self, index: usize, field: LineField, value: &str) -> Result<()> {
        let count = self.product_lines.len();
        let line = self
            .product_lines
            .get_mut(index)
            .ok_or(ReceiptError::LineOutOfRange { index, count })?;

        match field {
            LineField::Description => line.description = value.to_string(),
            LineField::Quantity => line.quantity = normalize_numeric_input(value),
            LineField::Rate => line.rate = normalize_numeric_input(value),
        }

        log::debug!("line {index} {field:?} -> {line:?}");
        Ok(())
    }

    /// Append a fresh line and return its index
    pub fn add_line(&mut self) -> usize {
        self.product_lines.push(ProductLine::default());
        self.product_lines.len() - 1
    }

    /// Remove the line at `index`; the remaining lines keep their order
    pub fn remove_line(&mut self, index: usize) -> Result<ProductLine> {
        if index >= self.product_lines.len() {
            return Err(ReceiptError::LineOutOfRange {
                index,
                count: self.product_lines.len(),
            });
        }
        Ok(self.product_lines.remove(index))
    }
}
