//! Vocabulary import from spreadsheets.
//!
//! An uploaded workbook (or CSV export) is read into rows of trimmed strings by
//! [`reader`], then [`parser`] works out which cells hold the English word, the
//! part of speech, the phonetic transcription and the Chinese meaning.
//!
//! Real-world word lists are messy: the part of speech is often glued to the
//! translation in a single cell (`vt.离弃，放弃`), sheets carry title rows and
//! Chinese headers, and columns come in any order. The parser copes with both
//! sheets that have a recognizable header row and bare positional sheets.

pub mod parser;
pub mod reader;

use thiserror::Error;

pub use parser::{parse_rows, split_meaning, Layout, ParsedSheet, ParsedWord};
pub use reader::read_rows;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to read CSV file: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to read spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::Error),

    #[error("The workbook contains no worksheets")]
    EmptyWorkbook,

    #[error("No usable vocabulary rows found")]
    NoUsableRows,
}

/// Spreadsheet formats accepted by the importer, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetFormat {
    Csv,
    Xlsx,
    Xls,
}

impl SheetFormat {
    pub fn from_file_name(file_name: &str) -> Result<Self, ImportError> {
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.trim().to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => Ok(SheetFormat::Csv),
            "xlsx" | "xlsm" => Ok(SheetFormat::Xlsx),
            "xls" => Ok(SheetFormat::Xls),
            _ => Err(ImportError::UnsupportedFormat(file_name.to_string())),
        }
    }
}

/// Reads an uploaded word list and extracts the usable vocabulary rows.
pub fn parse_upload(file_name: &str, bytes: &[u8]) -> Result<ParsedSheet, ImportError> {
    let format = SheetFormat::from_file_name(file_name)?;
    let rows = read_rows(format, bytes)?;
    let sheet = parse_rows(rows);

    tracing::debug!(
        file_name,
        ?format,
        layout = ?sheet.layout,
        words = sheet.words.len(),
        skipped = sheet.skipped,
        "Parsed vocabulary upload"
    );

    if sheet.words.is_empty() {
        return Err(ImportError::NoUsableRows);
    }

    Ok(sheet)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_file_name() {
        assert_eq!(SheetFormat::from_file_name("words.csv").unwrap(), SheetFormat::Csv);
        assert_eq!(SheetFormat::from_file_name("考研词汇.XLSX").unwrap(), SheetFormat::Xlsx);
        assert_eq!(SheetFormat::from_file_name("unit1.xlsm").unwrap(), SheetFormat::Xlsx);
        assert_eq!(SheetFormat::from_file_name("old.list.xls").unwrap(), SheetFormat::Xls);

        assert!(matches!(
            SheetFormat::from_file_name("notes.txt"),
            Err(ImportError::UnsupportedFormat(_))
        ));
        assert!(SheetFormat::from_file_name("csv").is_err());
        assert!(SheetFormat::from_file_name("").is_err());
    }

    #[test]
    fn test_parse_upload_rejects_empty_sheet() {
        let result = parse_upload("empty.csv", "单词,释义\n\n".as_bytes());
        assert!(matches!(result, Err(ImportError::NoUsableRows)));
    }

    #[test]
    fn test_parse_upload_csv() {
        let csv = "abandon,vt.离弃，放弃\npersistence,n. 坚持\n";
        let sheet = parse_upload("unit1.csv", csv.as_bytes()).expect("csv should parse");

        assert_eq!(sheet.words.len(), 2);
        assert_eq!(sheet.words[0].english, "abandon");
        assert_eq!(sheet.words[0].pos, "vt.");
        assert_eq!(sheet.words[0].chinese, "离弃，放弃");
    }

    #[test]
    fn test_parse_upload_rejects_garbage_workbook() {
        let result = parse_upload("broken.xlsx", b"definitely not a zip archive");
        assert!(matches!(result, Err(ImportError::Spreadsheet(_))));
    }
}
