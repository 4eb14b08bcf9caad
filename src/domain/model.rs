use std::fmt;

/// One row of the "Dominios" sheet, in sheet order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainRow {
    pub domain: Option<String>,
    pub description: Option<String>,
}

impl DomainRow {
    pub fn new(domain: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            domain: Some(domain.into()),
            description: Some(description.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainEntry {
    pub name: String,
    pub description: String,
}

/// Ordered set of valid answers presented to the classifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainCatalog {
    entries: Vec<DomainEntry>,
}

impl DomainCatalog {
    pub fn new(entries: Vec<DomainEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[DomainEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn render(&self) -> String {
        crate::domain::catalog::render_catalog(&self.entries)
    }

    /// Case-insensitive match on the trimmed name.
    pub fn contains(&self, name: &str) -> bool {
        let wanted = name.trim().to_lowercase();
        self.entries
            .iter()
            .any(|entry| entry.name.to_lowercase() == wanted)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    /// Excel serial date, kept apart from plain numbers so it is written back
    /// with a date format.
    DateTime(f64),
}

impl CellValue {
    /// Text content with surrounding whitespace removed, `None` when blank.
    pub fn as_trimmed_text(&self) -> Option<String> {
        let text = match self {
            CellValue::Empty => return None,
            CellValue::Text(s) => s.trim().to_string(),
            other => other.to_string(),
        };
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    pub fn is_blank(&self) -> bool {
        self.as_trimmed_text().is_none()
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => f.write_str(s),
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            CellValue::Number(n) | CellValue::DateTime(n) => write!(f, "{}", n),
            CellValue::Bool(b) => write!(f, "{}", b),
        }
    }
}

/// A worksheet whose first row is the header row.
///
/// `origin` is the zero-based (row, column) of the first header cell, and
/// `rows` keeps blank rows, so the grid can be written back cell for cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    pub name: String,
    pub origin: (u32, u32),
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, headers: Vec<String>) -> Self {
        Self {
            name: name.into(),
            origin: (0, 0),
            headers,
            rows: Vec::new(),
        }
    }

    pub fn is_blank_row(&self, row: usize) -> bool {
        self.rows
            .get(row)
            .map_or(true, |cells| cells.iter().all(CellValue::is_blank))
    }

    pub fn column_index(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == header)
    }

    /// Cell at `(row, col)`; cells past the end of a short row read as empty.
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        const EMPTY: &CellValue = &CellValue::Empty;
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(EMPTY)
    }
}

/// Both input sheets, already checked for the required columns.
#[derive(Debug, Clone)]
pub struct SourceWorkbook {
    pub projects: Sheet,
    pub domains: Sheet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Transport,
    Status(u16),
    MalformedResponse,
    EmptyResponse,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Transport => f.write_str("transport"),
            FailureKind::Status(code) => write!(f, "status {}", code),
            FailureKind::MalformedResponse => f.write_str("malformed response"),
            FailureKind::EmptyResponse => f.write_str("empty response"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationFailure {
    pub kind: FailureKind,
    pub message: String,
}

/// Outcome of one classification call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Domain(String),
    Failed(ClassificationFailure),
}

impl Classification {
    pub fn failed(kind: FailureKind, message: impl Into<String>) -> Self {
        Classification::Failed(ClassificationFailure {
            kind,
            message: message.into(),
        })
    }

    pub fn domain(&self) -> Option<&str> {
        match self {
            Classification::Domain(name) => Some(name),
            Classification::Failed(_) => None,
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Classification::Failed(_))
    }

    /// Cell text for the result sheet. Failures keep the `Erro: ` marker the
    /// exported workbook has always used.
    pub fn to_cell_text(&self) -> String {
        match self {
            Classification::Domain(name) => name.clone(),
            Classification::Failed(failure) => format!("Erro: {}", failure.message),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassifiedProject {
    /// 1-based position in the projects sheet.
    pub id: usize,
    pub summary: String,
    pub classification: Classification,
}

/// Everything the load stage needs to write the output workbook.
#[derive(Debug, Clone)]
pub struct ClassificationRun {
    pub source: SourceWorkbook,
    pub catalog: DomainCatalog,
    pub results: Vec<ClassifiedProject>,
}

impl ClassificationRun {
    pub fn failed_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.classification.is_failure())
            .count()
    }
}
