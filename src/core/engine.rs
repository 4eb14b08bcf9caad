use crate::core::{ClassifiedProject, Pipeline};
use crate::utils::error::Result;

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub output_path: String,
    pub results: Vec<ClassifiedProject>,
    pub failed: usize,
}

pub struct ClassificationEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> ClassificationEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<RunSummary> {
        tracing::info!("Reading workbook...");
        let source = self.pipeline.extract().await?;
        tracing::info!(
            "Found {} project rows and {} domain rows",
            source.projects.rows.len(),
            source.domains.rows.len()
        );

        tracing::info!("Classifying projects...");
        let run = self.pipeline.transform(source).await?;
        let failed = run.failed_count();
        tracing::info!(
            "Classified {} projects ({} failed)",
            run.results.len(),
            failed
        );

        tracing::info!("Writing output workbook...");
        let output_path = self.pipeline.load(&run).await?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(RunSummary {
            output_path,
            results: run.results,
            failed,
        })
    }
}
