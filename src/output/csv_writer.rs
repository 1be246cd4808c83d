//! CSV Writer
//!
//! 表をカンマ区切り・ヘッダー行付き・行番号なしのCSVとして出力します。

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::error::ConvertError;
use crate::types::SheetTable;

/// CSV出力
#[derive(Debug, Clone, Copy)]
pub(crate) struct CsvWriter {
    delimiter: u8,
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// 表を指定パスのファイルに書き出す（既存ファイルは上書き）
    pub fn write_file(&self, table: &SheetTable, path: &Path) -> Result<(), ConvertError> {
        let file = File::create(path)?;
        self.write(table, file)
    }

    /// 表を任意のライターに書き出す
    ///
    /// 列のない表（使用範囲が空のシート）は何も出力しません。
    pub fn write<W: Write>(&self, table: &SheetTable, output: W) -> Result<(), ConvertError> {
        if table.width() == 0 {
            return Ok(());
        }

        let mut writer = WriterBuilder::new()
            .delimiter(self.delimiter)
            .terminator(Terminator::Any(b'\n'))
            .quote_style(QuoteStyle::Necessary)
            .from_writer(output);

        writer.write_record(&table.headers)?;
        for row in &table.rows {
            writer.write_record(row)?;
        }

        writer.flush()?;
        Ok(())
    }
}
