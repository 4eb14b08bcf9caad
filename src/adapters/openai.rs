//! Chat-completions classifier.

use crate::domain::model::{Classification, DomainCatalog, FailureKind};
use crate::domain::ports::{Classifier, ConfigProvider};
use crate::domain::prompt::{build_user_prompt, SYSTEM_MESSAGE};
use crate::utils::error::{ClassifierError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4-turbo";
const TEMPERATURE: f32 = 0.0;

/// Explicit connection settings; the API key is never read from globals.
#[derive(Clone)]
pub struct ClassifierSettings {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout: Option<Duration>,
}

impl std::fmt::Debug for ClassifierSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClassifierSettings")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ClassifierSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: None,
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let api_key = config
            .api_key()
            .ok_or_else(|| ClassifierError::MissingConfigError {
                field: "api_key".to_string(),
            })?;
        if api_key.trim().is_empty() {
            return Err(ClassifierError::MissingConfigError {
                field: "api_key".to_string(),
            });
        }

        Ok(Self {
            api_key: api_key.trim().to_string(),
            base_url: config.api_base_url().to_string(),
            model: config.model().to_string(),
            timeout: config.request_timeout(),
        })
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

pub struct OpenAiClassifier {
    client: Client,
    endpoint: String,
    model: String,
}

impl OpenAiClassifier {
    pub fn new(settings: ClassifierSettings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {}", settings.api_key)).map_err(|_| {
            ClassifierError::InvalidConfigValueError {
                field: "api_key".to_string(),
                value: "<redacted>".to_string(),
                reason: "API key contains characters not allowed in an HTTP header".to_string(),
            }
        })?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let mut builder = Client::builder().default_headers(headers);
        if let Some(timeout) = settings.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: format!("{}/chat/completions", settings.base_url.trim_end_matches('/')),
            model: settings.model,
        })
    }

    async fn complete(&self, user_prompt: &str) -> std::result::Result<String, Classification> {
        let request = ChatRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: SYSTEM_MESSAGE,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            temperature: TEMPERATURE,
        };

        tracing::debug!("POST {} (model {})", self.endpoint, self.model);
        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| Classification::failed(FailureKind::Transport, e.to_string()))?;

        let status = response.status();
        tracing::debug!("Completion response status: {}", status);
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Classification::failed(
                FailureKind::Status(status.as_u16()),
                format!("{} {}", status, body.trim()),
            ));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| Classification::failed(FailureKind::MalformedResponse, e.to_string()))?;

        body.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| {
                Classification::failed(FailureKind::EmptyResponse, "completion returned no text")
            })
    }
}

#[async_trait]
impl Classifier for OpenAiClassifier {
    async fn classify(&self, summary: &str, catalog: &DomainCatalog) -> Classification {
        let prompt = build_user_prompt(&catalog.render(), summary);
        match self.complete(&prompt).await {
            Ok(answer) => Classification::Domain(answer),
            Err(failure) => failure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::DomainEntry;
    use httpmock::prelude::*;

    fn catalog() -> DomainCatalog {
        DomainCatalog::new(vec![
            DomainEntry {
                name: "Energia".to_string(),
                description: "Energias renováveis".to_string(),
            },
            DomainEntry {
                name: "Mar".to_string(),
                description: "Economia do mar".to_string(),
            },
        ])
    }

    fn classifier_for(server: &MockServer) -> OpenAiClassifier {
        let mut settings = ClassifierSettings::new("sk-test");
        settings.base_url = server.url("/v1");
        OpenAiClassifier::new(settings).unwrap()
    }

    #[tokio::test]
    async fn test_classify_returns_trimmed_answer() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1/chat/completions")
                .header("authorization", "Bearer sk-test")
                .body_contains("gpt-4-turbo")
                .body_contains("Energia - Energias renováveis")
                .body_contains("Turbinas eólicas offshore");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "choices": [{"message": {"role": "assistant", "content": "  Energia \n"}}]
                }));
        });

        let result = classifier_for(&server)
            .classify("Turbinas eólicas offshore", &catalog())
            .await;

        api_mock.assert();
        assert_eq!(result, Classification::Domain("Energia".to_string()));
    }

    #[tokio::test]
    async fn test_error_status_becomes_failure() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(401).body("invalid api key");
        });

        let result = classifier_for(&server).classify("x", &catalog()).await;

        api_mock.assert();
        match result {
            Classification::Failed(failure) => {
                assert_eq!(failure.kind, FailureKind::Status(401));
                assert!(failure.message.contains("invalid api key"));
            }
            other => panic!("expected failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unparseable_body_becomes_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200).body("<html>gateway</html>");
        });

        let result = classifier_for(&server).classify("x", &catalog()).await;

        assert!(matches!(
            result,
            Classification::Failed(ref f) if f.kind == FailureKind::MalformedResponse
        ));
    }

    #[tokio::test]
    async fn test_empty_choices_become_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/v1/chat/completions");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"choices": []}));
        });

        let result = classifier_for(&server).classify("x", &catalog()).await;

        assert!(matches!(
            result,
            Classification::Failed(ref f) if f.kind == FailureKind::EmptyResponse
        ));
    }

    #[tokio::test]
    async fn test_unreachable_server_becomes_transport_failure() {
        let mut settings = ClassifierSettings::new("sk-test");
        settings.base_url = "http://127.0.0.1:1".to_string();
        settings.timeout = Some(Duration::from_secs(5));
        let classifier = OpenAiClassifier::new(settings).unwrap();

        let result = classifier.classify("x", &catalog()).await;

        assert!(matches!(
            result,
            Classification::Failed(ref f) if f.kind == FailureKind::Transport
        ));
    }

    #[test]
    fn test_settings_require_api_key() {
        struct NoKey;
        impl ConfigProvider for NoKey {
            fn input_path(&self) -> &str {
                "in.xlsx"
            }
            fn output_path(&self) -> &str {
                "."
            }
            fn output_file(&self) -> &str {
                "out.xlsx"
            }
            fn model(&self) -> &str {
                DEFAULT_MODEL
            }
            fn api_base_url(&self) -> &str {
                DEFAULT_BASE_URL
            }
            fn api_key(&self) -> Option<&str> {
                None
            }
            fn request_timeout(&self) -> Option<Duration> {
                None
            }
        }

        let err = ClassifierSettings::from_config(&NoKey).unwrap_err();
        assert!(matches!(err, ClassifierError::MissingConfigError { .. }));
    }
}
