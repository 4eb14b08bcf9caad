use crate::adapters::workbook::{project_summaries, read_source_workbook, write_output_workbook};
use crate::core::{
    Classification, ClassificationRun, Classifier, ClassifiedProject, ConfigProvider,
    DomainCatalog, Pipeline, SourceWorkbook, Storage,
};
use crate::domain::catalog::{domain_rows_from_sheet, parse_domain_rows};
use crate::utils::error::{ClassifierError, Result};

/// Builds the domain catalog from the domains sheet. An empty catalog leaves
/// nothing to classify into, so it is rejected.
pub fn build_catalog(source: &SourceWorkbook) -> Result<DomainCatalog> {
    let rows = domain_rows_from_sheet(&source.domains)?;
    let catalog = DomainCatalog::new(parse_domain_rows(&rows));
    if catalog.is_empty() {
        return Err(ClassifierError::EmptyCatalogError {
            sheet: source.domains.name.clone(),
        });
    }
    Ok(catalog)
}

/// Reads the workbook and builds its catalog without classifying anything.
pub async fn preview_catalog<S: Storage>(
    storage: &S,
    input_path: &str,
) -> Result<(SourceWorkbook, DomainCatalog)> {
    let source = read_input(storage, input_path).await?;
    let catalog = build_catalog(&source)?;
    Ok((source, catalog))
}

async fn read_input<S: Storage>(storage: &S, input_path: &str) -> Result<SourceWorkbook> {
    tracing::debug!("Reading workbook from: {}", input_path);
    let bytes = storage.read_file(input_path).await?;
    read_source_workbook(&bytes)
}

pub struct ClassificationPipeline<S: Storage, C: ConfigProvider, K: Classifier> {
    storage: S,
    config: C,
    classifier: K,
}

impl<S: Storage, C: ConfigProvider, K: Classifier> ClassificationPipeline<S, C, K> {
    pub fn new(storage: S, config: C, classifier: K) -> Self {
        Self {
            storage,
            config,
            classifier,
        }
    }

    pub fn output_location(&self) -> String {
        format!(
            "{}/{}",
            self.config.output_path().trim_end_matches('/'),
            self.config.output_file()
        )
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, K: Classifier> Pipeline for ClassificationPipeline<S, C, K> {
    async fn extract(&self) -> Result<SourceWorkbook> {
        read_input(&self.storage, self.config.input_path()).await
    }

    async fn transform(&self, source: SourceWorkbook) -> Result<ClassificationRun> {
        let catalog = build_catalog(&source)?;
        tracing::info!("Domain catalog has {} entries", catalog.len());

        let summaries = project_summaries(&source.projects)?;
        let total = summaries.len();
        let mut results = Vec::with_capacity(total);

        // Strictly sequential: one call per row, in sheet order.
        for (position, (id, summary)) in summaries.into_iter().enumerate() {
            tracing::info!("Classifying project {} ({}/{})", id, position + 1, total);

            let classification = self.classifier.classify(&summary, &catalog).await;
            match &classification {
                Classification::Domain(name) if !catalog.contains(name) => {
                    tracing::warn!("Project {}: answer '{}' is not a catalog domain", id, name);
                }
                Classification::Domain(name) => {
                    tracing::debug!("Project {} -> {}", id, name);
                }
                Classification::Failed(failure) => {
                    tracing::warn!(
                        "Project {}: classification failed ({}): {}",
                        id,
                        failure.kind,
                        failure.message
                    );
                }
            }

            results.push(ClassifiedProject {
                id,
                summary,
                classification,
            });
        }

        Ok(ClassificationRun {
            source,
            catalog,
            results,
        })
    }

    async fn load(&self, run: &ClassificationRun) -> Result<String> {
        let output_location = self.output_location();
        let bytes = write_output_workbook(run)?;

        tracing::debug!("Writing workbook ({} bytes) to storage", bytes.len());
        self.storage.write_file(&output_location, &bytes).await?;

        Ok(output_location)
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::{MockConfig, MockStorage, ScriptedClassifier};
    use super::*;
    use crate::adapters::workbook::test_support::workbook_bytes;
    use crate::adapters::workbook::{read_named_sheet, RESULTS_SHEET, SUMMARY_COLUMN};
    use crate::domain::model::{CellValue, FailureKind};

    fn two_project_workbook() -> Vec<u8> {
        workbook_bytes(vec![
            (
                "Projetos",
                vec![SUMMARY_COLUMN],
                vec![vec!["Baterias de lítio"], vec!["Monitorização costeira"]],
            ),
            (
                "Dominios",
                vec!["Dominios", "Descrição"],
                vec![
                    vec!["Energia", "Transição energética"],
                    vec!["", "e armazenamento"],
                    vec!["Mar", "Economia azul"],
                ],
            ),
        ])
    }

    async fn pipeline_with(
        bytes: Vec<u8>,
        classifier: ScriptedClassifier,
    ) -> (ClassificationPipeline<MockStorage, MockConfig, ScriptedClassifier>, MockStorage) {
        let storage = MockStorage::default();
        storage.put_file("input.xlsx", bytes).await;
        (
            ClassificationPipeline::new(storage.clone(), MockConfig, classifier),
            storage,
        )
    }

    #[tokio::test]
    async fn test_transform_classifies_rows_in_order() {
        let classifier = ScriptedClassifier::new(vec![
            Classification::Domain("Energia".to_string()),
            Classification::Domain("Mar".to_string()),
        ]);
        let (pipeline, _) = pipeline_with(two_project_workbook(), classifier.clone()).await;

        let source = pipeline.extract().await.unwrap();
        let run = pipeline.transform(source).await.unwrap();

        assert_eq!(
            classifier.calls(),
            vec!["Baterias de lítio", "Monitorização costeira"]
        );
        assert_eq!(run.catalog.len(), 2);
        assert_eq!(
            run.catalog.entries()[0].description,
            "Transição energética e armazenamento"
        );
        let ids: Vec<usize> = run.results.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(run.results[1].classification.domain(), Some("Mar"));
        assert_eq!(run.failed_count(), 0);
    }

    #[tokio::test]
    async fn test_failed_row_does_not_stop_the_run() {
        let classifier = ScriptedClassifier::new(vec![
            Classification::failed(FailureKind::Status(500), "server error"),
            Classification::Domain("Mar".to_string()),
        ]);
        let (pipeline, _) = pipeline_with(two_project_workbook(), classifier.clone()).await;

        let source = pipeline.extract().await.unwrap();
        let run = pipeline.transform(source).await.unwrap();

        assert_eq!(classifier.calls().len(), 2);
        assert!(run.results[0].classification.is_failure());
        assert_eq!(run.results[1].classification.domain(), Some("Mar"));
        assert_eq!(run.failed_count(), 1);
    }

    #[tokio::test]
    async fn test_ids_follow_sheet_rows_across_blank_rows() {
        let bytes = workbook_bytes(vec![
            (
                "Projetos",
                vec!["Acronimo", SUMMARY_COLUMN],
                vec![
                    vec!["BAT", "Baterias de lítio"],
                    vec!["", ""],
                    vec!["COSTA", "Monitorização costeira"],
                ],
            ),
            ("Dominios", vec!["Dominios", "Descrição"], vec![vec!["Mar", "Oceanos"]]),
        ]);
        let classifier = ScriptedClassifier::default();
        let (pipeline, _) = pipeline_with(bytes, classifier.clone()).await;

        let source = pipeline.extract().await.unwrap();
        let run = pipeline.transform(source).await.unwrap();

        assert_eq!(classifier.calls().len(), 2);
        let ids: Vec<usize> = run.results.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(run.source.projects.rows.len(), 3);
    }

    #[tokio::test]
    async fn test_missing_domains_sheet_halts_before_classification() {
        let bytes = workbook_bytes(vec![("Projetos", vec![SUMMARY_COLUMN], vec![vec!["x"]])]);
        let classifier = ScriptedClassifier::default();
        let (pipeline, _) = pipeline_with(bytes, classifier.clone()).await;

        let err = pipeline.extract().await.unwrap_err();

        assert!(matches!(err, ClassifierError::MissingSheetError { .. }));
        assert!(classifier.calls().is_empty());
    }

    #[tokio::test]
    async fn test_empty_catalog_halts_before_classification() {
        let bytes = workbook_bytes(vec![
            ("Projetos", vec![SUMMARY_COLUMN], vec![vec!["x"]]),
            ("Dominios", vec!["Dominios", "Descrição"], vec![vec!["", "orphan"]]),
        ]);
        let classifier = ScriptedClassifier::default();
        let (pipeline, _) = pipeline_with(bytes, classifier.clone()).await;

        let source = pipeline.extract().await.unwrap();
        let err = pipeline.transform(source).await.unwrap_err();

        assert!(matches!(err, ClassifierError::EmptyCatalogError { .. }));
        assert!(classifier.calls().is_empty());
    }

    #[tokio::test]
    async fn test_load_writes_results_sheet() {
        let classifier = ScriptedClassifier::new(vec![
            Classification::Domain("Energia".to_string()),
            Classification::failed(FailureKind::Transport, "connection reset"),
        ]);
        let (pipeline, storage) = pipeline_with(two_project_workbook(), classifier).await;

        let source = pipeline.extract().await.unwrap();
        let run = pipeline.transform(source).await.unwrap();
        let output_path = pipeline.load(&run).await.unwrap();

        assert_eq!(output_path, "test_output/classified.xlsx");
        let bytes = storage.get_file(&output_path).await.unwrap();
        let results = read_named_sheet(&bytes, RESULTS_SHEET).unwrap();
        assert_eq!(results.rows.len(), 2);
        assert_eq!(results.cell(0, 2), &CellValue::Text("Energia".to_string()));
        assert_eq!(
            results.cell(1, 2),
            &CellValue::Text("Erro: connection reset".to_string())
        );
    }

    #[tokio::test]
    async fn test_preview_catalog_makes_no_calls() {
        let storage = MockStorage::default();
        storage.put_file("input.xlsx", two_project_workbook()).await;

        let (source, catalog) = preview_catalog(&storage, "input.xlsx").await.unwrap();

        assert_eq!(source.projects.rows.len(), 2);
        assert_eq!(
            catalog.render(),
            "Energia - Transição energética e armazenamento\nMar - Economia azul"
        );
        assert!(storage.get_file("test_output/classified.xlsx").await.is_none());
    }
}
