#![allow(dead_code)]

use pmd_lookup::{Table, Value};
use rust_xlsxwriter::{Format, Workbook};

pub const REFERENCE_COLUMNS: &[&str] = &["Valid From", "Supplier Name", "Status", "Assigned"];

pub const CANDIDATE_COLUMNS: &[&str] = &[
    "Sl. No.",
    "Country",
    "Supplier Name",
    "Valid From",
    "Bukr.",
    "City",
];

pub fn table(columns: &[&str], rows: &[&[&str]]) -> Table {
    let mut table = Table::new(columns.iter().map(|c| c.to_string()).collect());
    for row in rows {
        table.push_row(row.iter().map(|v| if v.is_empty() { Value::Empty } else { Value::text(*v) }));
    }
    table
}

/// 候选行：(序号, 国家, 供应商, 日期, 公司代码, 城市)
pub fn candidate(rows: &[&[&str]]) -> Table {
    table(CANDIDATE_COLUMNS, rows)
}

pub fn reference(rows: &[&[&str]]) -> Table {
    table(REFERENCE_COLUMNS, rows)
}

/// 一个单元格：文本，或带日期格式的 Excel 序列号
pub enum Cell<'a> {
    Text(&'a str),
    Date(f64),
    Blank,
}

/// 用 rust_xlsxwriter 构造真实的 xlsx 工作簿字节
pub fn workbook(header: &[&str], rows: &[Vec<Cell<'_>>]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("yyyy-mm-dd hh:mm");
    let worksheet = workbook.add_worksheet();
    for (col, name) in header.iter().enumerate() {
        worksheet.write_string(0, col as u16, *name).unwrap();
    }
    for (r, row) in rows.iter().enumerate() {
        for (c, cell) in row.iter().enumerate() {
            let (r, c) = ((r + 1) as u32, c as u16);
            match cell {
                Cell::Text(s) => {
                    worksheet.write_string(r, c, *s).unwrap();
                }
                Cell::Date(serial) => {
                    worksheet.write_number_with_format(r, c, *serial, &date_format).unwrap();
                }
                Cell::Blank => {}
            }
        }
    }
    workbook.save_to_buffer().unwrap()
}

/// 把 xlsx 工作簿改为 1904 日期系统 (workbook.xml 的 `workbookPr date1904`)
pub fn with_1904_dates(bytes: &[u8]) -> Vec<u8> {
    use std::io::{Cursor, Read, Write};
    use zip::write::SimpleFileOptions;

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for i in 0..archive.len() {
        let mut file = archive.by_index(i).unwrap();
        let name = file.name().to_string();
        let mut data = Vec::new();
        file.read_to_end(&mut data).unwrap();
        if name == "xl/workbook.xml" {
            let xml = String::from_utf8(data).unwrap();
            assert!(xml.contains("<workbookPr"), "workbook.xml has no workbookPr element");
            data = xml.replacen("<workbookPr", "<workbookPr date1904=\"1\"", 1).into_bytes();
        }
        writer.start_file(name, SimpleFileOptions::default()).unwrap();
        writer.write_all(&data).unwrap();
    }
    writer.finish().unwrap().into_inner()
}
