use std::sync::Arc;

use crate::config::ReconConfig;
use crate::error::ReconError;
use crate::models::{ClassifiedRow, Disposition, ReconOutput, ReconStats, Table, TableKind};
use crate::service::classifier::classify;
use crate::service::filter::{drop_columns, exclude_countries};
use crate::service::index::ReferenceIndex;
use crate::service::key::key_rows;
use crate::service::normalizer::normalize_rows;
use crate::service::projector::project;

/// 核对服务：持有只读配置，每次调用相互独立
#[derive(Debug, Clone)]
pub struct Reconciler {
    config: Arc<ReconConfig>,
}

impl Reconciler {
    pub fn new(config: ReconConfig) -> Result<Self, ReconError> {
        config.validate()?;
        Ok(Self {
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &ReconConfig {
        &self.config
    }

    /// 核对中央参考表与候选表，生成过滤、重新标注后的输出表。
    ///
    /// 全部成功或整体失败；所有行都被过滤时返回空表而不是错误。
    pub fn run(&self, reference: Table, mut candidate: Table) -> Result<ReconOutput, ReconError> {
        let config = &*self.config;
        let cols = &config.columns;

        require_columns(
            &reference,
            TableKind::Reference,
            &[&cols.valid_from, &cols.supplier_name, &cols.status],
        )?;
        require_columns(
            &candidate,
            TableKind::Candidate,
            &[&cols.valid_from, &cols.supplier_name],
        )?;

        let mut stats = ReconStats {
            reference_rows: reference.len(),
            candidate_rows: candidate.len(),
            ..ReconStats::default()
        };

        // 1. 候选表预过滤
        drop_columns(&mut candidate, &config.drop_columns);
        stats.excluded_by_country =
            exclude_countries(&mut candidate, &cols.country, &config.excluded_countries);
        let candidate_columns = candidate.columns.clone();

        // 2. 规范化 + 匹配键
        let (reference_rows, dropped) = normalize_rows(
            reference,
            &cols.valid_from,
            &cols.supplier_name,
            &[cols.status.as_str()],
        );
        stats.reference_dropped = dropped;
        let (candidate_rows, dropped) =
            normalize_rows(candidate, &cols.valid_from, &cols.supplier_name, &[]);
        stats.candidate_dropped = dropped;

        let reference_rows = key_rows(reference_rows, &config.key_separator);
        let candidate_rows = key_rows(candidate_rows, &config.key_separator);

        // 3. 参考索引
        let index = ReferenceIndex::build(
            &reference_rows,
            &cols.status,
            &cols.assignee,
            config.duplicate_policy,
        );
        stats.reference_entries = index.len();
        stats.duplicate_keys = index.duplicate_count();
        if stats.duplicate_keys > 0 {
            tracing::warn!(
                "Reference table has {} duplicate keys, applied {:?}",
                stats.duplicate_keys,
                config.duplicate_policy
            );
        }

        // 4. 分类，Ignore 行直接丢弃
        let mut classified: Vec<ClassifiedRow> = Vec::with_capacity(candidate_rows.len());
        for keyed in candidate_rows {
            let disposition = classify(&keyed.key, &index, &config.approved_status);
            match disposition {
                Disposition::New => stats.new += 1,
                Disposition::Hold(_) => stats.hold += 1,
                Disposition::Ignore => {
                    stats.ignored += 1;
                    continue;
                }
            }
            classified.push(ClassifiedRow {
                row: keyed.row,
                disposition,
            });
        }

        // 5. 输出投影
        let table = project(classified, &candidate_columns, config)?;

        tracing::info!(
            "Reconciled: central {} rows ({} dropped, {} keys), lookup {} rows ({} excluded by country, {} dropped)",
            stats.reference_rows,
            stats.reference_dropped,
            stats.reference_entries,
            stats.candidate_rows,
            stats.excluded_by_country,
            stats.candidate_dropped
        );
        tracing::info!(
            "Dispositions: new {}, hold {}, ignored {}",
            stats.new,
            stats.hold,
            stats.ignored
        );
        if table.is_empty() {
            tracing::info!("No rows left after filtering, returning empty result");
        }

        Ok(ReconOutput { table, stats })
    }
}

fn require_columns(table: &Table, kind: TableKind, required: &[&String]) -> Result<(), ReconError> {
    match required.iter().find(|col| !table.has_column(col)) {
        Some(col) => Err(ReconError::MissingColumn {
            table: kind,
            column: (*col).clone(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_config_is_refused_up_front() {
        let config = ReconConfig {
            output_columns: Vec::new(),
            ..ReconConfig::default()
        };
        assert!(Reconciler::new(config).is_err());
    }

    #[test]
    fn missing_candidate_date_column_is_reported() {
        let reconciler = Reconciler::new(ReconConfig::default()).unwrap();
        let reference = Table::new(vec![
            "Valid From".into(),
            "Supplier Name".into(),
            "Status".into(),
        ]);
        let candidate = Table::new(vec!["Supplier Name".into()]);
        match reconciler.run(reference, candidate) {
            Err(ReconError::MissingColumn { table, column }) => {
                assert_eq!(table, TableKind::Candidate);
                assert_eq!(column, "Valid From");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
