use crate::adapters::openai::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use crate::config::{validate_common, DEFAULT_OUTPUT_FILE};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{ClassifierError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub input: InputConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    pub path: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassifierConfig {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    pub filename: Option<String>,
    pub results_csv: Option<String>,
}

fn env_placeholder() -> &'static Regex {
    static PLACEHOLDER: OnceLock<Regex> = OnceLock::new();
    PLACEHOLDER.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid"))
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ClassifierError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value; unknown variables are
    /// left as written.
    fn substitute_env_vars(content: &str) -> String {
        env_placeholder()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn results_csv(&self) -> Option<&str> {
        self.output.results_csv.as_deref()
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> &str {
        &self.input.path
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn output_file(&self) -> &str {
        self.output.filename.as_deref().unwrap_or(DEFAULT_OUTPUT_FILE)
    }

    fn model(&self) -> &str {
        self.classifier.model.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    fn api_base_url(&self) -> &str {
        self.classifier.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    }

    /// An unresolved `${VAR}` placeholder counts as no key.
    fn api_key(&self) -> Option<&str> {
        self.classifier
            .api_key
            .as_deref()
            .filter(|key| !env_placeholder().is_match(key))
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.classifier.timeout_seconds.map(Duration::from_secs)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_common(
            self.input_path(),
            self.output_path(),
            self.output_file(),
            self.model(),
            self.api_base_url(),
            self.classifier.timeout_seconds,
        )?;
        if let Some(csv_path) = self.results_csv() {
            crate::utils::validation::validate_file_extension("output.results_csv", csv_path, &["csv"])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_minimal_config_uses_defaults() {
        let toml_content = r#"
[input]
path = "projetos.xlsx"

[output]
path = "./out"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.input_path(), "projetos.xlsx");
        assert_eq!(config.output_file(), DEFAULT_OUTPUT_FILE);
        assert_eq!(config.model(), DEFAULT_MODEL);
        assert_eq!(config.api_base_url(), DEFAULT_BASE_URL);
        assert_eq!(config.api_key(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PRIORITY_CLASSIFIER_TEST_KEY", "sk-from-env");

        let toml_content = r#"
[input]
path = "projetos.xlsx"

[classifier]
api_key = "${PRIORITY_CLASSIFIER_TEST_KEY}"
model = "gpt-4o"
timeout_seconds = 30

[output]
path = "./out"
filename = "resultado.xlsx"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.api_key(), Some("sk-from-env"));
        assert_eq!(config.model(), "gpt-4o");
        assert_eq!(config.output_file(), "resultado.xlsx");
        assert_eq!(config.request_timeout(), Some(Duration::from_secs(30)));

        std::env::remove_var("PRIORITY_CLASSIFIER_TEST_KEY");
    }

    #[test]
    fn test_unresolved_placeholder_is_not_a_key() {
        let toml_content = r#"
[input]
path = "projetos.xlsx"

[classifier]
api_key = "${PRIORITY_CLASSIFIER_UNSET_VARIABLE}"

[output]
path = "./out"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.api_key(), None);
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[input]
path = "projetos.xlsx"

[classifier]
base_url = "invalid-url"

[output]
path = "./out"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[input\npath = 1").unwrap_err();
        assert!(matches!(err, ClassifierError::ConfigError { .. }));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[input]\npath = \"p.xlsx\"\n\n[output]\npath = \"./out\"\nresults_csv = \"r.csv\""
        )
        .unwrap();

        let config = TomlConfig::from_file(file.path()).unwrap();
        assert_eq!(config.input_path(), "p.xlsx");
        assert_eq!(config.results_csv(), Some("r.csv"));
    }
}
