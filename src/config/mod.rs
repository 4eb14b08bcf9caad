#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::utils::error::{ClassifierError, Result};
use crate::utils::validation;

pub const DEFAULT_OUTPUT_PATH: &str = "./output";
pub const DEFAULT_OUTPUT_FILE: &str = "classified_projects.xlsx";

/// Checks shared by every configuration source.
pub(crate) fn validate_common(
    input: &str,
    output_path: &str,
    output_file: &str,
    model: &str,
    api_base_url: &str,
    timeout_seconds: Option<u64>,
) -> Result<()> {
    validation::validate_path("input", input)?;
    validation::validate_file_extension("input", input, &["xlsx"])?;
    validation::validate_path("output_path", output_path)?;
    validation::validate_file_extension("output_file", output_file, &["xlsx"])?;
    if output_file.contains('/') || output_file.contains('\\') {
        return Err(ClassifierError::InvalidConfigValueError {
            field: "output_file".to_string(),
            value: output_file.to_string(),
            reason: "Must be a file name; use output_path for the directory".to_string(),
        });
    }
    validation::validate_non_empty_string("model", model)?;
    validation::validate_url("api_base_url", api_base_url)?;
    if let Some(timeout) = timeout_seconds {
        validation::validate_range("timeout_seconds", timeout, 1, 3600)?;
    }
    Ok(())
}
