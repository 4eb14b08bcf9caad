use crate::adapters::openai::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::config::toml_config::TomlConfig;
use crate::config::{validate_common, DEFAULT_OUTPUT_FILE, DEFAULT_OUTPUT_PATH};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::Parser;
use std::time::Duration;

#[derive(Clone, Parser)]
#[command(name = "priority-classifier")]
#[command(about = "Assign R&D project summaries to priority domains")]
pub struct CliConfig {
    /// Workbook with the "Projetos" and "Dominios" sheets
    #[arg(short, long)]
    pub input: Option<String>,

    /// Output directory [default: ./output]
    #[arg(long)]
    pub output_path: Option<String>,

    /// Output workbook name [default: classified_projects.xlsx]
    #[arg(long)]
    pub output_file: Option<String>,

    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Chat model [default: gpt-4-turbo]
    #[arg(long)]
    pub model: Option<String>,

    /// Base URL of the chat-completions API [default: https://api.openai.com/v1]
    #[arg(long)]
    pub api_base_url: Option<String>,

    #[arg(long, help = "Per-request timeout for the completion API")]
    pub timeout_seconds: Option<u64>,

    /// TOML configuration file; command-line values override it
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(long, help = "Also write the results table as CSV to this path")]
    pub results_csv: Option<String>,

    #[arg(long, help = "Parse the workbook and print the domain catalog without classifying")]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

impl std::fmt::Debug for CliConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CliConfig")
            .field("input", &self.input)
            .field("output_path", &self.output_path)
            .field("output_file", &self.output_file)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("api_base_url", &self.api_base_url)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("config", &self.config)
            .field("results_csv", &self.results_csv)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        self.input.as_deref().unwrap_or_default()
    }

    fn output_path(&self) -> &str {
        self.output_path.as_deref().unwrap_or(DEFAULT_OUTPUT_PATH)
    }

    fn output_file(&self) -> &str {
        self.output_file.as_deref().unwrap_or(DEFAULT_OUTPUT_FILE)
    }

    fn model(&self) -> &str {
        self.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    fn api_base_url(&self) -> &str {
        self.api_base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }
}

impl CliConfig {
    /// Copies every value set on the command line (or through
    /// `OPENAI_API_KEY`) over the TOML configuration.
    pub fn apply_to(&self, config: &mut TomlConfig) {
        if let Some(input) = &self.input {
            config.input.path = input.clone();
            tracing::info!("🔧 Input overridden to: {}", input);
        }
        if let Some(path) = &self.output_path {
            config.output.path = path.clone();
        }
        if self.output_file.is_some() {
            config.output.filename = self.output_file.clone();
        }
        if self.results_csv.is_some() {
            config.output.results_csv = self.results_csv.clone();
        }
        if self.api_key.is_some() {
            config.classifier.api_key = self.api_key.clone();
        }
        if self.model.is_some() {
            config.classifier.model = self.model.clone();
        }
        if self.api_base_url.is_some() {
            config.classifier.base_url = self.api_base_url.clone();
        }
        if self.timeout_seconds.is_some() {
            config.classifier.timeout_seconds = self.timeout_seconds;
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        let input = validation::validate_required_field("input", &self.input)?;
        validate_common(
            input,
            self.output_path(),
            self.output_file(),
            self.model(),
            self.api_base_url(),
            self.timeout_seconds,
        )?;
        if let Some(csv_path) = &self.results_csv {
            validation::validate_file_extension("results_csv", csv_path, &["csv"])?;
        }
        Ok(())
    }
}
