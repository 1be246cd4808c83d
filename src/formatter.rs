//! Formatter Module
//!
//! セル値をCSVのフィールド文字列に変換するモジュール。
//! 列名の補完（空の列名、重複する列名）もここで行います。

use std::collections::HashMap;

use calamine::{Data, ExcelDateTime};
use chrono::{NaiveDateTime, Timelike};

/// 時刻部分が0時の日時の出力形式
const DATE_FORMAT: &str = "%Y-%m-%d";

/// 時刻部分を持つ日時の出力形式
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// セルフォーマッター
///
/// セル値のフォーマット処理のファサードとして機能します。
#[derive(Debug, Default)]
pub(crate) struct CellFormatter {
    /// 日付フォーマッター
    date_formatter: DateFormatter,
}

impl CellFormatter {
    /// 新しいCellFormatterインスタンスを生成
    pub fn new() -> Self {
        Self::default()
    }

    /// セル値をフォーマット
    ///
    /// - 文字列: そのまま
    /// - 数値: 最短の10進表現（整数値の浮動小数点数は小数部なし）
    /// - 論理値: `True` / `False`
    /// - 日時: `YYYY-MM-DD`（0時の場合）または`YYYY-MM-DD HH:MM:SS`
    /// - エラー値: Excelの表記（例: `#DIV/0!`）
    /// - 空セル: 空文字列
    pub fn format_cell(&self, cell: &Data) -> String {
        match cell {
            Data::String(s) => s.clone(),
            Data::Int(i) => i.to_string(),
            Data::Float(f) => f.to_string(),
            Data::Bool(b) => if *b { "True" } else { "False" }.to_string(),
            Data::DateTime(dt) => self.date_formatter.format(dt),
            Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
            Data::Error(e) => e.to_string(),
            Data::Empty => String::new(),
        }
    }

    /// 浮動小数点数の列として出力するセルをフォーマット
    ///
    /// 整数値も`1200.0`のように小数部を付けて出力します。数値以外は`format_cell`と同じです。
    pub fn format_float_cell(&self, cell: &Data) -> String {
        match cell {
            Data::Int(i) => format!("{}.0", i),
            Data::Float(f) if f.is_finite() && f.fract() == 0.0 => format!("{:.1}", f),
            _ => self.format_cell(cell),
        }
    }

    /// 浮動小数点数の列かどうかを列ごとに判定
    ///
    /// 空でないセルがすべて数値で、かつ小数部を持つ値か空セルを含む列が対象です。
    /// 数値のみで整数値だけの列、文字列などが混在する列は対象外です。
    pub fn float_columns(&self, rows: &[&[Data]], width: usize) -> Vec<bool> {
        (0..width)
            .map(|col| {
                let mut numeric = 0;
                let mut fractional_or_blank = false;

                for cell in rows.iter().map(|row| row.get(col).unwrap_or(&Data::Empty)) {
                    match cell {
                        Data::Int(_) => numeric += 1,
                        Data::Float(f) => {
                            numeric += 1;
                            if f.fract() != 0.0 {
                                fractional_or_blank = true;
                            }
                        }
                        Data::Empty => fractional_or_blank = true,
                        _ => return false,
                    }
                }

                numeric > 0 && fractional_or_blank
            })
            .collect()
    }

    /// ヘッダー行のセルから列名を生成
    ///
    /// 空の列名は`Unnamed: <列番号>`に置き換え、重複する列名には
    /// `.1`, `.2`, ... の接尾辞を付けて一意にします。
    pub fn column_names(&self, header_row: &[Data]) -> Vec<String> {
        let mut counts: HashMap<String, usize> = HashMap::new();
        let mut names = Vec::with_capacity(header_row.len());

        for (col_idx, cell) in header_row.iter().enumerate() {
            let mut name = self.format_cell(cell);
            if name.is_empty() {
                name = format!("Unnamed: {}", col_idx);
            }

            let mut count = counts.get(&name).copied().unwrap_or(0);
            while count > 0 {
                counts.insert(name.clone(), count + 1);
                name = format!("{}.{}", name, count);
                count = counts.get(&name).copied().unwrap_or(0);
            }
            counts.insert(name.clone(), count + 1);
            names.push(name);
        }

        names
    }
}

/// 日付フォーマッター
#[derive(Debug, Default)]
struct DateFormatter;

impl DateFormatter {
    /// Excelの日時値をフォーマット
    ///
    /// 日時に変換できない値（期間など）はシリアル値をそのまま数値として出力します。
    fn format(&self, value: &ExcelDateTime) -> String {
        if value.is_duration() {
            return value.as_f64().to_string();
        }

        match value.as_datetime() {
            Some(datetime) => self.format_datetime(&datetime),
            None => value.as_f64().to_string(),
        }
    }

    fn format_datetime(&self, datetime: &NaiveDateTime) -> String {
        if datetime.num_seconds_from_midnight() == 0 {
            datetime.format(DATE_FORMAT).to_string()
        } else {
            datetime.format(DATETIME_FORMAT).to_string()
        }
    }
}
