//! Spreadsheet I/O: calamine on the way in, rust_xlsxwriter on the way out.

use crate::domain::catalog::domain_rows_from_sheet;
use crate::domain::model::{CellValue, ClassificationRun, ClassifiedProject, Sheet, SourceWorkbook};
use crate::utils::error::{ClassifierError, Result};
use calamine::{Data, Reader, Xlsx};
use rust_xlsxwriter::{Format, Workbook, Worksheet};
use std::io::Cursor;

pub const PROJECTS_SHEET: &str = "Projetos";
pub const DOMAINS_SHEET: &str = "Dominios";
pub const RESULTS_SHEET: &str = "Classificação";
pub const SUMMARY_COLUMN: &str = "Sumario Executivo";
pub const ID_COLUMN: &str = "ID";
pub const RESULT_COLUMN: &str = "Domínio Classificado";

/// Parses the uploaded workbook and checks its shape. Nothing is classified
/// until this succeeds.
pub fn read_source_workbook(bytes: &[u8]) -> Result<SourceWorkbook> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;

    let projects = read_sheet(&mut workbook, PROJECTS_SHEET)?;
    let domains = read_sheet(&mut workbook, DOMAINS_SHEET)?;

    if projects.column_index(SUMMARY_COLUMN).is_none() {
        return Err(ClassifierError::MissingColumnError {
            sheet: PROJECTS_SHEET.to_string(),
            column: SUMMARY_COLUMN.to_string(),
        });
    }
    // Column lookup for the domains sheet lives with the parser.
    domain_rows_from_sheet(&domains)?;

    tracing::debug!(
        "Workbook loaded: {} project rows, {} domain rows",
        projects.rows.len(),
        domains.rows.len()
    );

    Ok(SourceWorkbook { projects, domains })
}

/// Reads one sheet of an xlsx payload by name.
pub fn read_named_sheet(bytes: &[u8], name: &str) -> Result<Sheet> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;
    read_sheet(&mut workbook, name)
}

fn read_sheet<R>(workbook: &mut Xlsx<R>, name: &str) -> Result<Sheet>
where
    R: std::io::Read + std::io::Seek,
{
    if !workbook.sheet_names().iter().any(|n| n == name) {
        return Err(ClassifierError::MissingSheetError {
            sheet: name.to_string(),
        });
    }

    // The range begins at the first used cell, not at A1.
    let range = workbook.worksheet_range(name)?;
    let mut rows = range.rows();

    let headers = rows
        .next()
        .map(|header_row| header_row.iter().map(|cell| cell.to_string()).collect())
        .unwrap_or_default();

    let mut sheet = Sheet::new(name, headers);
    sheet.origin = range.start().unwrap_or((0, 0));
    sheet.rows = rows
        .map(|row| row.iter().map(cell_value).collect())
        .collect();

    Ok(sheet)
}

fn cell_value(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::DateTime(dt.as_f64()),
        other => CellValue::Text(other.to_string()),
    }
}

/// `(id, summary)` for every project row that is not fully blank, in sheet
/// order. The id is the 1-based data row index, so blank rows still count.
/// Blank summaries become empty strings.
pub fn project_summaries(projects: &Sheet) -> Result<Vec<(usize, String)>> {
    let col = projects
        .column_index(SUMMARY_COLUMN)
        .ok_or_else(|| ClassifierError::MissingColumnError {
            sheet: projects.name.clone(),
            column: SUMMARY_COLUMN.to_string(),
        })?;

    Ok((0..projects.rows.len())
        .filter(|&row| !projects.is_blank_row(row))
        .map(|row| (row + 1, projects.cell(row, col).to_string()))
        .collect())
}

pub fn results_sheet(results: &[ClassifiedProject]) -> Sheet {
    let mut sheet = Sheet::new(
        RESULTS_SHEET,
        vec![
            ID_COLUMN.to_string(),
            SUMMARY_COLUMN.to_string(),
            RESULT_COLUMN.to_string(),
        ],
    );
    sheet.rows = results
        .iter()
        .map(|project| {
            vec![
                CellValue::Number(project.id as f64),
                CellValue::Text(project.summary.clone()),
                CellValue::Text(project.classification.to_cell_text()),
            ]
        })
        .collect();
    sheet
}

struct SheetFormats {
    header: Format,
    date: Format,
    datetime: Format,
}

/// Output workbook: both source sheets verbatim plus the results sheet.
pub fn write_output_workbook(run: &ClassificationRun) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let formats = SheetFormats {
        header: Format::new().set_bold(),
        date: Format::new().set_num_format("yyyy-mm-dd"),
        datetime: Format::new().set_num_format("yyyy-mm-dd hh:mm:ss"),
    };

    write_sheet(workbook.add_worksheet(), &run.source.projects, &formats)?;
    write_sheet(workbook.add_worksheet(), &run.source.domains, &formats)?;
    write_sheet(workbook.add_worksheet(), &results_sheet(&run.results), &formats)?;

    Ok(workbook.save_to_buffer()?)
}

fn write_sheet(worksheet: &mut Worksheet, sheet: &Sheet, formats: &SheetFormats) -> Result<()> {
    worksheet.set_name(sheet.name.as_str())?;
    let (first_row, first_col) = sheet.origin;

    for (c, header) in sheet.headers.iter().enumerate() {
        if header.is_empty() {
            continue;
        }
        let col = grid_column(sheet, first_col, c)?;
        worksheet.write_string_with_format(first_row, col, header.as_str(), &formats.header)?;
    }

    for (r, row) in sheet.rows.iter().enumerate() {
        let row_number = grid_row(sheet, first_row, r + 1)?;
        for (c, value) in row.iter().enumerate() {
            let col = grid_column(sheet, first_col, c)?;
            match value {
                CellValue::Empty => {}
                CellValue::Text(s) => {
                    worksheet.write_string(row_number, col, s.as_str())?;
                }
                CellValue::Number(n) => {
                    worksheet.write_number(row_number, col, *n)?;
                }
                CellValue::Bool(b) => {
                    worksheet.write_boolean(row_number, col, *b)?;
                }
                CellValue::DateTime(serial) => {
                    let format = if serial.fract() == 0.0 {
                        &formats.date
                    } else {
                        &formats.datetime
                    };
                    worksheet.write_number_with_format(row_number, col, *serial, format)?;
                }
            }
        }
    }

    Ok(())
}

fn grid_row(sheet: &Sheet, first_row: u32, offset: usize) -> Result<u32> {
    u32::try_from(offset)
        .ok()
        .and_then(|offset| first_row.checked_add(offset))
        .ok_or_else(|| ClassifierError::ProcessingError {
            message: format!("Sheet '{}' has too many rows", sheet.name),
        })
}

fn grid_column(sheet: &Sheet, first_col: u32, offset: usize) -> Result<u16> {
    u32::try_from(offset)
        .ok()
        .and_then(|offset| first_col.checked_add(offset))
        .and_then(|col| u16::try_from(col).ok())
        .ok_or_else(|| ClassifierError::ProcessingError {
            message: format!("Sheet '{}' has too many columns", sheet.name),
        })
}
