use chrono::NaiveDate;

use crate::models::{CompositeKey, KeyedRow, NormalizedRow};

/// 由 (日期, 供应商名称) 构建匹配键
pub fn build_key(date: NaiveDate, supplier_name: &str, separator: &str) -> CompositeKey {
    CompositeKey::from_token(format!("{}{}{}", date.format("%Y-%m-%d"), separator, supplier_name))
}

pub fn key_rows(rows: Vec<NormalizedRow>, separator: &str) -> Vec<KeyedRow> {
    rows.into_iter()
        .map(|row| {
            let key = build_key(row.canonical_date(), &row.supplier_name, separator);
            KeyedRow { row, key }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_date_then_name() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(build_key(date, "Acme Corp", "__").as_str(), "2024-01-01__Acme Corp");
    }

    #[test]
    fn key_is_case_sensitive() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_ne!(build_key(date, "Acme", "__"), build_key(date, "ACME", "__"));
        assert_eq!(build_key(date, "Acme", "__"), build_key(date, "Acme", "__"));
    }
}
