use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Reader};
use rust_xlsxwriter::{Workbook, XlsxError};

use crate::error::ReconError;
use crate::models::{Table, TableKind, Value};

/// 读取工作簿第一个工作表：首行为表头，其余为数据行
pub fn read_table(bytes: &[u8], kind: TableKind) -> Result<Table, ReconError> {
    if bytes.is_empty() {
        return Err(ReconError::unreadable(kind, "file is empty"));
    }
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| ReconError::unreadable(kind, e))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ReconError::unreadable(kind, "workbook has no sheets"))?;
    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| ReconError::unreadable(kind, e))?;

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| ReconError::unreadable(kind, format!("sheet '{}' is empty", sheet_name)))?;
    if header.iter().all(|c| cell_value(c).is_blank()) {
        return Err(ReconError::unreadable(kind, "header row is blank"));
    }

    let mut table = Table::new(header_names(header));
    for row in rows {
        let values: Vec<Value> = row.iter().map(cell_value).collect();
        if values.iter().all(Value::is_blank) {
            continue;
        }
        table.push_row(values);
    }

    tracing::info!(
        "Loaded {} file: sheet '{}', {} columns, {} rows",
        kind,
        sheet_name,
        table.columns.len(),
        table.len()
    );
    Ok(table)
}

/// 表头去空白；空表头记为 `Unnamed: N`，重复表头追加 `.N`
fn header_names(header: &[Data]) -> Vec<String> {
    let mut names: Vec<String> = Vec::with_capacity(header.len());
    for (idx, cell) in header.iter().enumerate() {
        let base = cell_value(cell)
            .as_text()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| format!("Unnamed: {}", idx));
        let mut name = base.clone();
        let mut n = 1;
        while names.contains(&name) {
            name = format!("{}.{}", base, n);
            n += 1;
        }
        names.push(name);
    }
    names
}

fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Empty,
        Data::String(s) => Value::Text(s.clone()),
        Data::Int(i) => Value::Int(*i),
        Data::Float(f) => Value::Float(*f),
        Data::Bool(b) => Value::Bool(*b),
        // as_datetime 按工作簿的日期系统 (1900/1904) 换算
        Data::DateTime(dt) if dt.is_datetime() => dt
            .as_datetime()
            .map(Value::DateTime)
            .unwrap_or(Value::Float(dt.as_f64())),
        Data::DateTime(dt) => Value::Float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::Text(s.clone()),
        Data::Error(_) => Value::Empty,
    }
}

/// 写出单工作表 xlsx，返回文件字节
pub fn write_table(table: &Table, sheet_name: &str) -> Result<Vec<u8>, ReconError> {
    build_workbook(table, sheet_name).map_err(|e| ReconError::Unexpected(format!("xlsx write failed: {}", e)))
}

fn build_workbook(table: &Table, sheet_name: &str) -> Result<Vec<u8>, XlsxError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    for (col, name) in table.columns.iter().enumerate() {
        worksheet.write_string(0, col as u16, name.as_str())?;
    }

    for (row_idx, record) in table.rows.iter().enumerate() {
        let row = (row_idx + 1) as u32;
        for (col_idx, name) in table.columns.iter().enumerate() {
            let col = col_idx as u16;
            match record.get(name) {
                None | Some(Value::Empty) => {}
                Some(Value::Text(s)) => {
                    worksheet.write_string(row, col, s.as_str())?;
                }
                Some(Value::Int(i)) => {
                    worksheet.write_number(row, col, *i as f64)?;
                }
                Some(Value::Float(f)) => {
                    worksheet.write_number(row, col, *f)?;
                }
                Some(Value::Bool(b)) => {
                    worksheet.write_boolean(row, col, *b)?;
                }
                Some(other) => {
                    worksheet.write_string(row, col, other.to_string())?;
                }
            }
        }
    }

    worksheet.autofit();
    workbook.save_to_buffer()
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{ExcelDateTime, ExcelDateTimeType};

    fn date_cell(serial: f64, is_1904: bool) -> String {
        match cell_value(&Data::DateTime(ExcelDateTime::new(serial, ExcelDateTimeType::DateTime, is_1904))) {
            Value::DateTime(dt) => dt.format("%Y-%m-%d %H:%M").to_string(),
            other => panic!("expected a date, got {other:?}"),
        }
    }

    #[test]
    fn date_cells_use_the_workbook_date_system() {
        assert_eq!(date_cell(45292.0, false), "2024-01-01 00:00");
        assert_eq!(date_cell(45292.5, false), "2024-01-01 12:00");
        assert_eq!(date_cell(45292.0, true), "2028-01-02 00:00");
    }

    #[test]
    fn headers_are_trimmed_and_deduplicated() {
        let header = vec![
            Data::String(" Valid From ".into()),
            Data::Empty,
            Data::String("City".into()),
            Data::String("City".into()),
        ];
        assert_eq!(header_names(&header), vec!["Valid From", "Unnamed: 1", "City", "City.1"]);
    }

    #[test]
    fn empty_bytes_are_unreadable() {
        let err = read_table(&[], TableKind::Candidate).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::EmptyOrUnreadableInput);
    }

    #[test]
    fn garbage_bytes_are_unreadable() {
        let err = read_table(b"definitely not a workbook", TableKind::Reference).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::EmptyOrUnreadableInput);
    }
}
