use chrono::{NaiveDate, NaiveDateTime};

use crate::models::{NormalizedRow, Table, Value};

/// 带时间的可接受格式
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %I:%M %p",
];

/// 仅日期的可接受格式。`01/02/2024` 这类日/月在前的斜线格式有歧义，不接受。
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y"];

/// 解析 valid-from 字段；失败返回 None，由调用方丢弃该行
pub fn parse_valid_from(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::DateTime(dt) => Some(*dt),
        Value::Text(s) => parse_date_text(s.trim()),
        // 未带日期格式的数字单元格不当作日期
        _ => None,
    }
}

fn parse_date_text(s: &str) -> Option<NaiveDateTime> {
    if s.is_empty() {
        return None;
    }
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

/// 供应商名称去首尾空白，保留大小写；空值返回 None
pub fn normalize_supplier(value: &Value) -> Option<String> {
    let text = value.as_text()?;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// 规范化整张表，返回保留的行和被丢弃的行数。
///
/// `required` 中列出的额外字段若为空，该行同样丢弃 (参考表的状态列)。
pub fn normalize_rows(
    table: Table,
    valid_from_col: &str,
    supplier_col: &str,
    required: &[&str],
) -> (Vec<NormalizedRow>, usize) {
    let total = table.rows.len();
    let rows: Vec<NormalizedRow> = table
        .rows
        .into_iter()
        .filter_map(|record| {
            let valid_from = parse_valid_from(record.get(valid_from_col)?)?;
            let supplier_name = normalize_supplier(record.get(supplier_col)?)?;
            let complete = required
                .iter()
                .all(|col| record.get(*col).map_or(false, |v| !v.is_blank()));
            if !complete {
                return None;
            }
            Some(NormalizedRow {
                record,
                valid_from,
                supplier_name,
            })
        })
        .collect();
    let dropped = total - rows.len();
    (rows, dropped)
}
