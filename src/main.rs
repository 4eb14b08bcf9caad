use clap::Parser;
use priority_classifier::adapters::report;
use priority_classifier::adapters::workbook::project_summaries;
use priority_classifier::core::pipeline::preview_catalog;
use priority_classifier::core::{ConfigProvider, Storage};
use priority_classifier::utils::error::{ClassifierError, ErrorSeverity};
use priority_classifier::utils::{logger, validation::Validate};
use priority_classifier::{
    ClassificationEngine, ClassificationPipeline, ClassifierSettings, CliConfig, LocalStorage,
    OpenAiClassifier, TomlConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Before parsing, so OPENAI_API_KEY from .env reaches clap.
    dotenvy::dotenv().ok();
    let cli = CliConfig::parse();

    logger::init_logger(cli.verbose, cli.log_json);

    tracing::info!("Starting priority-classifier");
    tracing::debug!("CLI config: {:?}", cli);

    let outcome = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            match TomlConfig::from_file(path) {
                Ok(mut config) => {
                    cli.apply_to(&mut config);
                    let results_csv = config.results_csv().map(str::to_string);
                    run(config, cli.dry_run, results_csv).await
                }
                Err(e) => Err(e),
            }
        }
        None => run(cli.clone(), cli.dry_run, cli.results_csv.clone()).await,
    };

    if let Err(e) = outcome {
        tracing::error!(
            "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn run<C>(config: C, dry_run: bool, results_csv: Option<String>) -> Result<(), ClassifierError>
where
    C: ConfigProvider + Validate + 'static,
{
    config.validate()?;
    tracing::info!("✅ Configuration validated");

    let storage = LocalStorage::new(".".to_string());

    if dry_run {
        tracing::info!("🔍 DRY RUN MODE - no classification calls will be made");
        let (source, catalog) = preview_catalog(&storage, config.input_path()).await?;
        let projects = project_summaries(&source.projects)?;
        println!("Projects to classify: {}", projects.len());
        println!("Domain catalog ({} entries):", catalog.len());
        println!("{}", catalog.render());
        return Ok(());
    }

    let classifier = OpenAiClassifier::new(ClassifierSettings::from_config(&config)?)?;
    let pipeline = ClassificationPipeline::new(storage.clone(), config, classifier);
    let engine = ClassificationEngine::new(pipeline);

    let summary = engine.run().await?;

    println!("{}", report::results_table(&summary.results));
    if let Some(csv_path) = results_csv {
        storage
            .write_file(&csv_path, &report::results_csv(&summary.results)?)
            .await?;
        println!("📄 Results CSV saved to: {}", csv_path);
    }

    if summary.failed > 0 {
        tracing::warn!(
            "{} of {} projects could not be classified",
            summary.failed,
            summary.results.len()
        );
    }
    println!("✅ Classification complete!");
    println!("📁 Output saved to: {}", summary.output_path);

    Ok(())
}
