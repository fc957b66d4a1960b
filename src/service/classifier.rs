use crate::models::{CompositeKey, Disposition};
use crate::service::index::ReferenceIndex;

/// 对单个候选键做一次性判定：
/// 无匹配 -> New；匹配且状态为 approved (忽略大小写，不去空白) -> Ignore；否则 -> Hold(负责人)
pub fn classify(key: &CompositeKey, index: &ReferenceIndex, approved_status: &str) -> Disposition {
    match index.get(key) {
        None => Disposition::New,
        Some(entry) if entry.status.eq_ignore_ascii_case(approved_status) => Disposition::Ignore,
        Some(entry) => Disposition::Hold(entry.assignee.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DuplicatePolicy;
    use crate::models::{KeyedRow, NormalizedRow, Record, Value};
    use crate::service::key::build_key;
    use chrono::NaiveDate;

    fn index_of(rows: &[(&str, &str, &str)]) -> ReferenceIndex {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let keyed: Vec<KeyedRow> = rows
            .iter()
            .map(|(name, status, assignee)| {
                let mut record = Record::new();
                record.insert("Status".into(), Value::text(*status));
                record.insert("Assigned".into(), Value::text(*assignee));
                KeyedRow {
                    key: build_key(date, name, "__"),
                    row: NormalizedRow {
                        record,
                        valid_from: date.and_hms_opt(0, 0, 0).unwrap(),
                        supplier_name: name.to_string(),
                    },
                }
            })
            .collect();
        ReferenceIndex::build(&keyed, "Status", "Assigned", DuplicatePolicy::FirstWins)
    }

    fn key(name: &str) -> CompositeKey {
        build_key(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), name, "__")
    }

    #[test]
    fn unmatched_is_new() {
        let index = index_of(&[("Acme", "Pending", "Alice")]);
        assert_eq!(classify(&key("Other"), &index, "approved"), Disposition::New);
    }

    #[test]
    fn approved_is_ignored_case_insensitively() {
        let index = index_of(&[("A", "Approved", ""), ("B", "APPROVED", ""), ("C", " approved ", "")]);
        for name in ["A", "B"] {
            assert_eq!(classify(&key(name), &index, "approved"), Disposition::Ignore);
        }
        // 带空白的状态不算 approved
        assert_eq!(
            classify(&key("C"), &index, "approved"),
            Disposition::Hold(Value::Empty)
        );
    }

    #[test]
    fn other_status_holds_with_assignee() {
        let index = index_of(&[("Acme", "Pending", "Alice"), ("Beta", "Rejected", "")]);
        assert_eq!(
            classify(&key("Acme"), &index, "approved"),
            Disposition::Hold(Value::text("Alice"))
        );
        assert_eq!(
            classify(&key("Beta"), &index, "approved"),
            Disposition::Hold(Value::Empty)
        );
    }

    #[test]
    fn key_match_stays_case_sensitive_while_status_is_not() {
        let index = index_of(&[("Acme", "APPROVED", "")]);
        assert_eq!(classify(&key("acme"), &index, "approved"), Disposition::New);
        assert_eq!(classify(&key("Acme"), &index, "Approved"), Disposition::Ignore);
    }
}
