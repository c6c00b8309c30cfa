use crate::config::types::{
    AttachmentConfig, Config, DetailConfig, ListingConfig, OutputConfig, SchemaConfig,
};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_listing(&config.listing)?;
    validate_schema(&config.schema)?;
    validate_detail(&config.detail)?;
    validate_attachments(&config.attachments)?;
    validate_output(&config.output)?;
    Ok(())
}

fn validate_listing(config: &ListingConfig) -> Result<(), ConfigError> {
    Url::parse(&config.url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid listing url: {}", e)))?;

    Url::parse(&config.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid base-url: {}", e)))?;

    if config.page_param.is_empty() {
        return Err(ConfigError::Validation(
            "page-param cannot be empty".to_string(),
        ));
    }

    validate_selector(&config.results_selector, "results-selector")?;
    validate_selector(&config.row_selector, "row-selector")?;

    Ok(())
}

fn validate_schema(config: &SchemaConfig) -> Result<(), ConfigError> {
    if config.columns.is_empty() {
        return Err(ConfigError::Validation(
            "schema must list at least one column".to_string(),
        ));
    }

    if config.key_column >= config.columns.len() {
        return Err(ConfigError::Validation(format!(
            "key-column {} is out of range for {} columns",
            config.key_column,
            config.columns.len()
        )));
    }

    if config.link_column >= config.columns.len() {
        return Err(ConfigError::Validation(format!(
            "link-column {} is out of range for {} columns",
            config.link_column,
            config.columns.len()
        )));
    }

    Ok(())
}

fn validate_detail(config: &DetailConfig) -> Result<(), ConfigError> {
    validate_selector(&config.table_selector, "table-selector")?;
    validate_selector(&config.header_selector, "header-selector")?;

    if config.section.is_empty() {
        return Err(ConfigError::Validation(
            "detail section name cannot be empty".to_string(),
        ));
    }

    if config.sentinel.is_empty() {
        return Err(ConfigError::Validation(
            "detail sentinel cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_attachments(config: &AttachmentConfig) -> Result<(), ConfigError> {
    validate_selector(&config.link_selector, "link-selector")?;

    if config.id_start.is_empty() || config.id_end.is_empty() {
        return Err(ConfigError::Validation(
            "id-start and id-end delimiters cannot be empty".to_string(),
        ));
    }

    Url::parse(&config.download_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid download-url: {}", e)))?;

    if config.id_param.is_empty() {
        return Err(ConfigError::Validation(
            "id-param cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_output(config: &OutputConfig) -> Result<(), ConfigError> {
    if config.folder.is_empty() {
        return Err(ConfigError::Validation(
            "output folder cannot be empty".to_string(),
        ));
    }

    if config.file_name.is_empty() {
        return Err(ConfigError::Validation(
            "output file-name cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_selector(raw: &str, field: &str) -> Result<(), ConfigError> {
    Selector::parse(raw)
        .map_err(|_| ConfigError::InvalidSelector(format!("{}: '{}'", field, raw)))?;
    Ok(())
}
