use crate::error::ReconError;
use crate::models::Table;

/// 以 CSV 形式导出结果表，列顺序与表头一致
pub fn write_csv(table: &Table) -> Result<Vec<u8>, ReconError> {
    let csv_err = |e: ::csv::Error| ReconError::Unexpected(format!("csv write failed: {}", e));

    let mut writer = ::csv::Writer::from_writer(Vec::new());
    writer.write_record(&table.columns).map_err(csv_err)?;
    for record in &table.rows {
        writer
            .write_record(
                table
                    .columns
                    .iter()
                    .map(|col| record.get(col).map(|v| v.to_string()).unwrap_or_default()),
            )
            .map_err(csv_err)?;
    }
    writer
        .into_inner()
        .map_err(|e| ReconError::Unexpected(format!("csv flush failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_header_and_rows_in_column_order() {
        let mut table = Table::new(vec!["Supplier Name".into(), "Status".into(), "Assigned".into()]);
        table.push_row(["Acme, Inc.", "Hold", "Alice"]);
        table.push_row(["Foo", "New"]);

        let out = String::from_utf8(write_csv(&table).unwrap()).unwrap();
        assert_eq!(
            out,
            "Supplier Name,Status,Assigned\n\"Acme, Inc.\",Hold,Alice\nFoo,New,\n"
        );
    }
}
