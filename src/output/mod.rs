//! Output Module
//!
//! 読み込んだ表をCSVファイルとして書き出すモジュール。

mod csv_writer;

pub(crate) use csv_writer::CsvWriter;
