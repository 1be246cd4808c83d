//! Parser Module
//!
//! calamineを使用したワークブック（XLS/XLSX）の読み込み。

mod workbook;

pub(crate) use workbook::WorkbookParser;
