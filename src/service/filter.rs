use crate::models::Table;

/// 删除存在的管理列；不存在的列直接忽略
pub fn drop_columns(table: &mut Table, names: &[String]) {
    if names.is_empty() {
        return;
    }
    table.columns.retain(|c| !names.contains(c));
    for row in &mut table.rows {
        row.retain(|k, _| !names.contains(k));
    }
}

/// 删除国家代码在排除集合中的行 (去空白、忽略大小写)，返回删除行数。
/// 表中没有国家列时不做过滤。
pub fn exclude_countries(table: &mut Table, country_col: &str, excluded: &[String]) -> usize {
    if excluded.is_empty() || !table.has_column(country_col) {
        return 0;
    }
    let before = table.rows.len();
    table.rows.retain(|row| {
        let Some(country) = row.get(country_col).and_then(|v| v.as_text()) else {
            return true;
        };
        let country = country.trim();
        !excluded.iter().any(|code| code.trim().eq_ignore_ascii_case(country))
    });
    before - table.rows.len()
}
