mod settings;

pub use settings::{ExportSettings, ReceiptSettings, Settings};

use crate::error::{ReceiptError, Result};
use crate::invoice::dates::is_date_layout;
use crate::invoice::Invoice;
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the document `init` seeds and commands edit by default
pub const DEFAULT_DOCUMENT: &str = "receipt.toml";

/// Where receipt keeps its config: the platform config directory, or
/// `~/.receipt` when the platform has none
pub fn config_dir() -> Result<PathBuf> {
    let platform =
        ProjectDirs::from("", "", "receipt").map(|dirs| dirs.config_dir().to_path_buf());
    pick_config_dir(platform, home_dir())
}

fn pick_config_dir(platform: Option<PathBuf>, home: Option<PathBuf>) -> Result<PathBuf> {
    platform
        .or_else(|| home.map(|home| home.join(".receipt")))
        .ok_or_else(|| {
            ReceiptError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no platform config directory and $HOME is not set; pass --config-dir",
            ))
        })
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
}

/// Expand a leading `~/` to the home directory
pub fn expand_path(path: &str) -> PathBuf {
    expand_with_home(path, home_dir())
}

fn expand_with_home(path: &str, home: Option<PathBuf>) -> PathBuf {
    match (path.strip_prefix("~/"), home) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

/// Resolve the export directory; relative paths live under the config dir
pub fn resolve_output_dir(output_dir: &str, config_dir: &Path) -> PathBuf {
    let path = expand_path(output_dir);
    if path.is_absolute() {
        path
    } else {
        config_dir.join(path)
    }
}

/// Load config.toml, falling back to defaults when it does not exist
pub fn load_settings(config_dir: &Path) -> Result<Settings> {
    let path = config_dir.join("config.toml");
    if !path.exists() {
        log::debug!("no config at {}, using defaults", path.display());
        return Ok(Settings::default());
    }
    let content = fs::read_to_string(&path)?;
    let settings: Settings =
        toml::from_str(&content).map_err(|e| ReceiptError::ConfigParse {
            path: path.clone(),
            source: e,
        })?;

    if !is_date_layout(&settings.receipt.date_format) {
        return Err(ReceiptError::InvalidDateFormat {
            path,
            layout: settings.receipt.date_format,
        });
    }
    Ok(settings)
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Load a receipt document (JSON for `.json` files, TOML otherwise)
pub fn load_document(path: &Path) -> Result<Invoice> {
    if !path.exists() {
        return Err(ReceiptError::DocumentNotFound(path.to_path_buf()));
    }
    let content = fs::read_to_string(path)?;

    if is_json(path) {
        serde_json::from_str(&content).map_err(|e| ReceiptError::DocumentParse {
            path: path.to_path_buf(),
            source: e,
        })
    } else {
        toml::from_str(&content).map_err(|e| ReceiptError::DocumentToml {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

/// Write a receipt document back in the format its extension names
pub fn save_document(path: &Path, invoice: &Invoice) -> Result<()> {
    let content = if is_json(path) {
        serde_json::to_string_pretty(invoice).map_err(|e| ReceiptError::Serialize(e.to_string()))?
    } else {
        toml::to_string_pretty(invoice).map_err(|e| ReceiptError::Serialize(e.to_string()))?
    };
    fs::write(path, content)?;
    log::debug!("saved {}", path.display());
    Ok(())
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[receipt]
currency_name = "Uganda Shillings"  # amount in words ends with "<currency_name> Only"
currency_code = "UGX"
date_format = "%d %b %Y"            # e.g., 05 Jan 2024
due_days = 30                       # due date when none is set

[export]
output_dir = "output"               # relative paths live in the config directory
debounce_ms = 500                   # session re-exports after this quiet period
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn template_parses_to_defaults() {
        let settings: Settings = toml::from_str(CONFIG_TEMPLATE).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let settings: Settings = toml::from_str("[export]\ndebounce_ms = 50\n").unwrap();
        assert_eq!(settings.export.debounce_ms, 50);
        assert_eq!(settings.export.output_dir, "output");
        assert_eq!(settings.receipt.currency_name, "Uganda Shillings");
    }

    #[test]
    fn missing_config_means_defaults() {
        let dir = TempDir::new().unwrap();
        assert_eq!(load_settings(dir.path()).unwrap(), Settings::default());
    }

    #[test]
    fn unusable_date_format_is_rejected() {
        let dir = TempDir::new().unwrap();
        for layout in ["%Y-%Q", "%H:%M"] {
            fs::write(
                dir.path().join("config.toml"),
                format!("[receipt]\ndate_format = \"{layout}\"\n"),
            )
            .unwrap();
            assert!(matches!(
                load_settings(dir.path()),
                Err(ReceiptError::InvalidDateFormat { .. })
            ));
        }

        fs::write(
            dir.path().join("config.toml"),
            "[receipt]\ndate_format = \"%Y-%m-%d\"\n",
        )
        .unwrap();
        assert_eq!(load_settings(dir.path()).unwrap().receipt.date_format, "%Y-%m-%d");
    }

    #[test]
    fn document_round_trips_in_both_formats() {
        let dir = TempDir::new().unwrap();
        let mut invoice = Invoice::default();
        invoice.client_name = "Alice".to_string();

        for name in ["receipt.toml", "receipt.json"] {
            let path = dir.path().join(name);
            save_document(&path, &invoice).unwrap();
            assert_eq!(load_document(&path).unwrap(), invoice);
        }
    }

    #[test]
    fn json_documents_use_camel_case() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("template.json");
        fs::write(
            &path,
            r#"{"clientName": "Bob", "productLines": [{"description": "Screen", "quantity": "1", "rate": "50000"}]}"#,
        )
        .unwrap();

        let invoice = load_document(&path).unwrap();
        assert_eq!(invoice.client_name, "Bob");
        assert_eq!(invoice.product_lines.len(), 1);
        assert_eq!(invoice.product_lines[0].rate, "50000");
    }

    #[test]
    fn missing_document_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.toml");
        assert!(matches!(
            load_document(&path),
            Err(ReceiptError::DocumentNotFound(_))
        ));
    }

    #[test]
    fn config_dir_falls_back_to_home() {
        let home = PathBuf::from("/home/amina");
        assert_eq!(
            pick_config_dir(None, Some(home.clone())).unwrap(),
            home.join(".receipt")
        );
        assert_eq!(
            pick_config_dir(Some(PathBuf::from("/etc/xdg/receipt")), Some(home)).unwrap(),
            PathBuf::from("/etc/xdg/receipt")
        );
        assert!(matches!(
            pick_config_dir(None, None),
            Err(ReceiptError::Io(_))
        ));
    }

    #[test]
    fn tilde_expands_only_with_a_home() {
        let home = Some(PathBuf::from("/home/amina"));
        assert_eq!(
            expand_with_home("~/receipts", home.clone()),
            PathBuf::from("/home/amina/receipts")
        );
        assert_eq!(expand_with_home("~/receipts", None), PathBuf::from("~/receipts"));
        assert_eq!(expand_with_home("out/~/x", home), PathBuf::from("out/~/x"));
    }

    #[test]
    fn relative_output_dir_is_under_config() {
        let base = Path::new("/tmp/receipt-config");
        assert_eq!(resolve_output_dir("output", base), base.join("output"));
        assert_eq!(
            resolve_output_dir("/var/out", base),
            PathBuf::from("/var/out")
        );
    }
}
