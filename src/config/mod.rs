//! Configuration loading, parsing, and validation
//!
//! Everything site-specific lives here: the listing URL and pagination
//! parameter, the column schema, the detail-section markers, the attachment
//! link shape, and the output format.

mod parser;
mod types;
mod validation;

pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use types::{
    AttachmentConfig, Config, DetailConfig, ListingConfig, OutputConfig, OutputFormat,
    SchemaConfig,
};
pub use validation::validate;
