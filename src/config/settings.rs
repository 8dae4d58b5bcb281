use serde::{Deserialize, Serialize};

use crate::invoice::dates::{DATE_FORMAT, DEFAULT_DUE_DAYS};

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub receipt: ReceiptSettings,
    #[serde(default)]
    pub export: ExportSettings,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ReceiptSettings {
    /// Appended to the amount in words: "<words> <currency_name> Only"
    pub currency_name: String,
    pub currency_code: String,
    pub date_format: String,
    pub due_days: u32,
}

impl Default for ReceiptSettings {
    fn default() -> Self {
        Self {
            currency_name: "Uganda Shillings".to_string(),
            currency_code: "UGX".to_string(),
            date_format: DATE_FORMAT.to_string(),
            due_days: DEFAULT_DUE_DAYS as u32,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ExportSettings {
    pub output_dir: String,
    /// Quiet period before a session re-exports after an edit
    pub debounce_ms: u64,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            output_dir: "output".to_string(),
            debounce_ms: 500,
        }
    }
}
