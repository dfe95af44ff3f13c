use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Reader};

use super::{ImportError, SheetFormat};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Reads the first worksheet (or the whole CSV) into rows of trimmed cells.
pub fn read_rows(format: SheetFormat, bytes: &[u8]) -> Result<Vec<Vec<String>>, ImportError> {
    match format {
        SheetFormat::Csv => read_csv(bytes),
        SheetFormat::Xlsx | SheetFormat::Xls => read_workbook(bytes),
    }
}

fn read_csv(bytes: &[u8]) -> Result<Vec<Vec<String>>, ImportError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(rows)
}

fn read_workbook(bytes: &[u8]) -> Result<Vec<Vec<String>>, ImportError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or(ImportError::EmptyWorkbook)??;

    let rows = range
        .rows()
        .map(|row| row.iter().map(|cell| cell.to_string().trim().to_string()).collect())
        .collect();

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_csv_trims_and_allows_ragged_rows() {
        let csv = "  abandon , vt.离弃，放弃 \npersistence,n. 坚持,/pəˈsɪstəns/\n";
        let rows = read_rows(SheetFormat::Csv, csv.as_bytes()).expect("csv should be readable");

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], vec!["abandon", "vt.离弃，放弃"]);
        assert_eq!(rows[1], vec!["persistence", "n. 坚持", "/pəˈsɪstəns/"]);
    }

    #[test]
    fn test_read_csv_strips_bom() {
        let mut bytes = UTF8_BOM.to_vec();
        bytes.extend_from_slice("english,chinese\nstrategy,策略\n".as_bytes());

        let rows = read_rows(SheetFormat::Csv, &bytes).expect("csv should be readable");
        assert_eq!(rows[0][0], "english");
    }

    #[test]
    fn test_read_csv_quoted_commas() {
        let csv = "record,\"n.记录, 唱片\"\n";
        let rows = read_rows(SheetFormat::Csv, csv.as_bytes()).expect("csv should be readable");
        assert_eq!(rows[0][1], "n.记录, 唱片");
    }

    #[test]
    fn test_read_csv_rejects_invalid_utf8() {
        let bytes = b"word,\xff\xfe\n";
        assert!(matches!(
            read_rows(SheetFormat::Csv, bytes),
            Err(ImportError::Csv(_))
        ));
    }
}
