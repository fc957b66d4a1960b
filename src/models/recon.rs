use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::fmt;

use super::table::{Record, Table, Value};

/// 匹配键：`YYYY-MM-DD` + 分隔符 + 供应商名称
///
/// 日期部分固定 10 个字符，因此即使名称中含有分隔符，键也不会产生歧义。
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CompositeKey(String);

impl CompositeKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn from_token(token: String) -> Self {
        Self(token)
    }
}

impl fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 规范化后的行：原始记录 + 解析出的日期时间 + 去空白的供应商名称
#[derive(Debug, Clone)]
pub struct NormalizedRow {
    pub record: Record,
    pub valid_from: NaiveDateTime,
    pub supplier_name: String,
}

impl NormalizedRow {
    /// 仅日期部分，用于构建匹配键
    pub fn canonical_date(&self) -> NaiveDate {
        self.valid_from.date()
    }
}

/// 带匹配键的行
#[derive(Debug, Clone)]
pub struct KeyedRow {
    pub row: NormalizedRow,
    pub key: CompositeKey,
}

/// 参考索引条目
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceEntry {
    pub status: String,
    pub assignee: Value,
}

/// 候选行的处置结果
#[derive(Debug, Clone, PartialEq)]
pub enum Disposition {
    /// 参考表中无匹配
    New,
    /// 有匹配且状态不是 approved，携带参考表的负责人
    Hold(Value),
    /// 有匹配且已 approved，不输出
    Ignore,
}

impl Disposition {
    /// 输出到状态列的标签；Ignore 没有标签
    pub fn label(&self) -> Option<&'static str> {
        match self {
            Disposition::New => Some("New"),
            Disposition::Hold(_) => Some("Hold"),
            Disposition::Ignore => None,
        }
    }

    /// 输出到负责人列的值
    pub fn assignee(&self) -> Value {
        match self {
            Disposition::Hold(assignee) => assignee.clone(),
            _ => Value::Empty,
        }
    }
}

/// 已分类的候选行 (Ignore 行不会出现在这里)
#[derive(Debug, Clone)]
pub struct ClassifiedRow {
    pub row: NormalizedRow,
    pub disposition: Disposition,
}

/// 各阶段计数，随结果一起返回
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconStats {
    pub reference_rows: usize,
    pub reference_dropped: usize,
    pub reference_entries: usize,
    pub duplicate_keys: usize,
    pub candidate_rows: usize,
    pub excluded_by_country: usize,
    pub candidate_dropped: usize,
    pub new: usize,
    pub hold: usize,
    pub ignored: usize,
}

impl ReconStats {
    pub fn output_rows(&self) -> usize {
        self.new + self.hold
    }
}

/// 引擎输出
#[derive(Debug, Clone)]
pub struct ReconOutput {
    pub table: Table,
    pub stats: ReconStats,
}

impl ReconOutput {
    /// 所有行都被过滤掉 (NoData)，这是合法的空结果
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}
