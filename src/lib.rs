pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::openai::{ClassifierSettings, OpenAiClassifier};
pub use adapters::storage::LocalStorage;
pub use config::toml_config::TomlConfig;
pub use core::{engine::ClassificationEngine, pipeline::ClassificationPipeline};
pub use domain::catalog::{parse_domain_rows, render_catalog};
pub use domain::model::{Classification, DomainEntry, DomainRow};
pub use utils::error::{ClassifierError, Result};
