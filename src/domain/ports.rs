use crate::domain::model::{Classification, ClassificationRun, DomainCatalog, SourceWorkbook};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_file(&self) -> &str;
    fn model(&self) -> &str;
    fn api_base_url(&self) -> &str;
    fn api_key(&self) -> Option<&str>;
    fn request_timeout(&self) -> Option<Duration>;
}

/// Single-call classification interface. Failures are reported in the
/// returned `Classification`, so one bad row never aborts a run.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, summary: &str, catalog: &DomainCatalog) -> Classification;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<SourceWorkbook>;
    async fn transform(&self, source: SourceWorkbook) -> Result<ClassificationRun>;
    async fn load(&self, run: &ClassificationRun) -> Result<String>;
}
