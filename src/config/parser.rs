use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so a run can be tied back to the exact adapter
/// configuration that produced it.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration and returns both the config and its hash
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let config = load_config(path)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    const VALID_CONFIG: &str = r#"
[listing]
url = "https://example.com/search?open=true"
page-param = "page"
start-page = 1
base-url = "https://example.com"
results-selector = "tbody[id='results']"

[schema]
columns = ["Bid Solicitation #", "Buyer", "Description", "Bid Opening Date"]
key-column = 0
link-column = 0

[detail]
table-selector = "table.table-01"
header-selector = "td.sectionHeader-02"
section = "Header Information"
sentinel = "Bill-to Address:"

[attachments]
link-selector = "a.link-01"
id-start = "('"
id-end = "')"
download-url = "https://example.com/downloadFile.xhtml"
id-param = "docId"

[output]
folder = "output"
file-name = "bids.json"
format = "json"
"#;

    #[test]
    fn test_load_valid_config() {
        let file = create_temp_config(VALID_CONFIG);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.listing.page_param, "page");
        assert_eq!(config.listing.start_page, 1);
        assert_eq!(config.schema.columns.len(), 4);
        assert_eq!(config.schema.key_column, 0);
        assert_eq!(config.detail.section, "Header Information");
        assert_eq!(config.output.format, OutputFormat::Json);
    }

    #[test]
    fn test_defaults_fill_optional_keys() {
        let config_content = r#"
[listing]
url = "https://example.com/staff-directory"
base-url = "https://example.com"
results-selector = "div.views"

[schema]
columns = ["Name", "Title", "Phone", "Email"]
link-column = 0

[detail]
table-selector = "table.info"
header-selector = "td.header"
section = "Contact"
sentinel = "Notes:"

[attachments]
link-selector = "a.file"
id-start = "('"
id-end = "')"
download-url = "https://example.com/file"

[output]
folder = "output"
file-name = "staff.csv"
format = "csv"
"#;
        let file = create_temp_config(config_content);
        let config = load_config(file.path()).unwrap();

        assert_eq!(config.listing.page_param, "page");
        assert_eq!(config.listing.start_page, 1);
        assert_eq!(config.listing.row_selector, "tr");
        assert_eq!(config.schema.key_column, 0);
        assert_eq!(config.attachments.id_param, "docId");
        assert_eq!(config.output.format, OutputFormat::Csv);
    }

    #[test]
    fn test_load_config_with_invalid_path() {
        let result = load_config(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_invalid_toml() {
        let file = create_temp_config("this is not valid TOML {{{");
        let result = load_config(file.path());
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_with_validation_error() {
        // key-column out of range for the schema
        let config_content = VALID_CONFIG.replace("key-column = 0", "key-column = 9");
        let file = create_temp_config(&config_content);
        let result = load_config(file.path());
        assert!(matches!(result.unwrap_err(), ConfigError::Validation(_)));
    }

    #[test]
    fn test_compute_config_hash() {
        let file = create_temp_config("test content");

        let hash1 = compute_config_hash(file.path()).unwrap();
        let hash2 = compute_config_hash(file.path()).unwrap();

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn test_different_content_different_hash() {
        let file1 = create_temp_config("content 1");
        let file2 = create_temp_config("content 2");

        let hash1 = compute_config_hash(file1.path()).unwrap();
        let hash2 = compute_config_hash(file2.path()).unwrap();

        assert_ne!(hash1, hash2);
    }
}
