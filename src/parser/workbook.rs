//! Workbook Parser
//!
//! calamineのラッパーとして、ワークブックを開き、シートを表として読み込みます。

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};

use crate::error::ConvertError;
use crate::formatter::CellFormatter;
use crate::types::SheetTable;

/// ワークブックパーサー
///
/// 1つのソースファイルを処理する間だけ保持され、スコープを抜けるとファイルは閉じられます。
/// 拡張子（`.xls`/`.xlsx`）に応じてcalamineのリーダーが自動的に選択されます。
pub(crate) struct WorkbookParser {
    /// calamineのワークブック
    workbook: Sheets<BufReader<File>>,
    /// エラーメッセージ用のパス
    path: PathBuf,
}

impl WorkbookParser {
    /// ワークブックを開く
    ///
    /// # 戻り値
    ///
    /// * `Ok(WorkbookParser)` - 読み込みに成功した場合
    /// * `Err(ConvertError::WorkbookOpen)` - ファイルが存在しない、破損している、または形式が不正な場合
    pub fn open(path: &Path) -> Result<Self, ConvertError> {
        let workbook = open_workbook_auto(path).map_err(|source| ConvertError::WorkbookOpen {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self {
            workbook,
            path: path.to_path_buf(),
        })
    }

    /// ワークブックのパス
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// すべてのシート名をワークブック内の順序で取得
    pub fn sheet_names(&self) -> Vec<String> {
        self.workbook.sheet_names().to_vec()
    }

    /// シートを読み込み、1行目を列名とする表に変換する
    ///
    /// # 戻り値
    ///
    /// * `Ok(SheetTable)` - 読み込んだ表（使用範囲が空の場合は列も行もない表）
    /// * `Err(ConvertError::SheetRead)` - シートの読み込みに失敗した場合
    pub fn read_table(
        &mut self,
        sheet_name: &str,
        formatter: &CellFormatter,
    ) -> Result<SheetTable, ConvertError> {
        let range = self
            .workbook
            .worksheet_range(sheet_name)
            .map_err(|source| ConvertError::SheetRead {
                path: self.path.clone(),
                sheet: sheet_name.to_string(),
                source,
            })?;

        Ok(range_to_table(&range, formatter))
    }
}

/// calamineの範囲を表に変換する
///
/// 使用範囲の先頭行が列名になり、残りの行がデータ行になります。
/// 使用範囲がA列より右から始まる場合は、左側の空の列を補って
/// 列番号をシート上の位置に揃えます。
pub(crate) fn range_to_table(range: &Range<Data>, formatter: &CellFormatter) -> SheetTable {
    let leading = range.start().map_or(0, |(_, col)| col as usize);
    let mut rows = range.rows();

    let headers = match rows.next() {
        Some(header_row) => {
            let padded: Vec<Data> = std::iter::repeat(Data::Empty)
                .take(leading)
                .chain(header_row.iter().cloned())
                .collect();
            formatter.column_names(&padded)
        }
        None => return SheetTable::default(),
    };

    let data_rows: Vec<&[Data]> = rows.collect();
    let float_columns = formatter.float_columns(&data_rows, range.width());

    let rows = data_rows
        .iter()
        .map(|row| {
            std::iter::repeat(String::new())
                .take(leading)
                .chain(row.iter().zip(&float_columns).map(|(cell, &as_float)| {
                    if as_float {
                        formatter.format_float_cell(cell)
                    } else {
                        formatter.format_cell(cell)
                    }
                }))
                .collect()
        })
        .collect();

    SheetTable { headers, rows }
}
