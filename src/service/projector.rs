use std::fmt::Write;

use chrono::NaiveDateTime;

use crate::config::ReconConfig;
use crate::error::ReconError;
use crate::models::{ClassifiedRow, Record, Table, Value};

/// 输出列 = 配置列表 ∩ 可用列，顺序以配置列表为准
pub fn output_columns(desired: &[String], available: &[String]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::with_capacity(desired.len());
    for col in desired {
        if available.contains(col) && !columns.contains(col) {
            columns.push(col.clone());
        }
    }
    columns
}

pub fn render_valid_from(dt: &NaiveDateTime, display_format: &str) -> Result<String, ReconError> {
    let mut out = String::new();
    write!(out, "{}", dt.format(display_format)).map_err(|_| {
        ReconError::Unexpected(format!("invalid display format '{}'", display_format))
    })?;
    Ok(out)
}

/// 生成最终输出表。
///
/// `candidate_columns` 是过滤后候选表的列头；状态列和负责人列由分类结果补充。
/// 规范化日期、匹配键等中间字段不在记录中，因此不会输出。
pub fn project(
    rows: Vec<ClassifiedRow>,
    candidate_columns: &[String],
    config: &ReconConfig,
) -> Result<Table, ReconError> {
    let cols = &config.columns;
    let mut available = candidate_columns.to_vec();
    for derived in [&cols.status, &cols.assignee] {
        if !available.contains(derived) {
            available.push(derived.clone());
        }
    }
    let columns = output_columns(&config.output_columns, &available);

    let mut table = Table::new(columns);
    for classified in rows {
        let Some(label) = classified.disposition.label() else {
            continue;
        };
        let mut record = Record::with_capacity(table.columns.len());
        for col in &table.columns {
            let value = if *col == cols.valid_from {
                Value::Text(render_valid_from(&classified.row.valid_from, &config.display_format)?)
            } else if *col == cols.status {
                Value::text(label)
            } else if *col == cols.assignee {
                classified.disposition.assignee()
            } else {
                classified.row.record.get(col).cloned().unwrap_or_default()
            };
            record.insert(col.clone(), value);
        }
        table.rows.push(record);
    }
    Ok(table)
}
