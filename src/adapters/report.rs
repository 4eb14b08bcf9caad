//! Results display: a plain-text table for the terminal and a CSV export.

use crate::adapters::workbook::{ID_COLUMN, RESULT_COLUMN, SUMMARY_COLUMN};
use crate::domain::model::ClassifiedProject;
use crate::utils::error::{ClassifierError, Result};

const SUMMARY_PREVIEW_CHARS: usize = 60;

pub fn results_csv(results: &[ClassifiedProject]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([ID_COLUMN, SUMMARY_COLUMN, RESULT_COLUMN])?;
    for project in results {
        writer.write_record([
            project.id.to_string(),
            project.summary.clone(),
            project.classification.to_cell_text(),
        ])?;
    }
    writer.into_inner().map_err(|e| ClassifierError::ProcessingError {
        message: format!("Failed to finish CSV output: {}", e),
    })
}

/// Tab-separated table with summaries shortened to one line.
pub fn results_table(results: &[ClassifiedProject]) -> String {
    let mut lines = vec![format!("{}\t{}\t{}", ID_COLUMN, RESULT_COLUMN, SUMMARY_COLUMN)];
    lines.extend(results.iter().map(|project| {
        format!(
            "{}\t{}\t{}",
            project.id,
            project.classification.to_cell_text(),
            preview(&project.summary)
        )
    }));
    lines.join("\n")
}

fn preview(summary: &str) -> String {
    let single_line = summary.split_whitespace().collect::<Vec<_>>().join(" ");
    if single_line.chars().count() <= SUMMARY_PREVIEW_CHARS {
        single_line
    } else {
        let cut: String = single_line.chars().take(SUMMARY_PREVIEW_CHARS).collect();
        format!("{}…", cut.trim_end())
    }
}
