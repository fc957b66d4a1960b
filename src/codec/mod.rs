//! 表格编解码：上传的 xls/xlsx 转为 `Table`，结果表写回 xlsx 或 CSV。
//! 不含业务逻辑。

pub mod csv;
pub mod xlsx;

pub use self::csv::write_csv;
pub use self::xlsx::{read_table, write_table};

/// 允许上传的扩展名
pub const ALLOWED_EXTENSIONS: &[&str] = &["xls", "xlsx"];

pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const CSV_MIME: &str = "text/csv; charset=utf-8";

/// 文件名扩展名是否允许 (忽略大小写)
pub fn allowed_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ALLOWED_EXTENSIONS.iter().any(|a| a.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}
