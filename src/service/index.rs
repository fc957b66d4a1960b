use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::config::DuplicatePolicy;
use crate::models::{CompositeKey, KeyedRow, ReferenceEntry, Value};

/// 参考索引：匹配键 -> {状态, 负责人}，构建后只读
#[derive(Debug, Default)]
pub struct ReferenceIndex {
    entries: HashMap<CompositeKey, ReferenceEntry>,
    duplicates: usize,
}

impl ReferenceIndex {
    /// 从规范化后的参考行构建索引。
    ///
    /// 每个键只保留一条记录，重复键按 `policy` 取第一条或最后一条。
    /// 状态为空的行在规范化阶段已被丢弃，这里不会再出现。
    pub fn build(
        rows: &[KeyedRow],
        status_col: &str,
        assignee_col: &str,
        policy: DuplicatePolicy,
    ) -> Self {
        let mut entries: HashMap<CompositeKey, ReferenceEntry> = HashMap::with_capacity(rows.len());
        let mut duplicates = 0;

        for keyed in rows {
            let record = &keyed.row.record;
            let Some(status) = record.get(status_col).and_then(Value::as_text) else {
                continue;
            };
            let entry = ReferenceEntry {
                status,
                assignee: record
                    .get(assignee_col)
                    .filter(|v| !v.is_blank())
                    .cloned()
                    .unwrap_or_default(),
            };

            match entries.entry(keyed.key.clone()) {
                Entry::Vacant(slot) => {
                    slot.insert(entry);
                }
                Entry::Occupied(mut slot) => {
                    duplicates += 1;
                    tracing::debug!("Duplicate reference key {}, policy {:?}", keyed.key, policy);
                    if policy == DuplicatePolicy::LastWins {
                        slot.insert(entry);
                    }
                }
            }
        }

        Self { entries, duplicates }
    }

    pub fn get(&self, key: &CompositeKey) -> Option<&ReferenceEntry> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 被策略折叠掉的重复行数
    pub fn duplicate_count(&self) -> usize {
        self.duplicates
    }
}
