// Adapters layer: concrete implementations of the domain ports for the file
// system, the xlsx format and the completion API, plus results output.

pub mod openai;
pub mod report;
pub mod storage;
pub mod workbook;
