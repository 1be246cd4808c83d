//! Types Module
//!
//! クレート全体で使用する共通データ型を定義するモジュール。

use serde::Serialize;

use crate::api::SheetPolicy;

/// 開始年の半開区間 `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearWindow {
    pub start: i32,
    pub end: i32,
}

impl YearWindow {
    /// 新しい区間を生成
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    /// 開始年が区間に含まれるかどうか
    pub fn contains(&self, year: i32) -> bool {
        self.start <= year && year < self.end
    }

    /// 区間が空かどうか
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// 2つの区間が重なるかどうか
    pub fn overlaps(&self, other: &YearWindow) -> bool {
        !self.is_empty() && !other.is_empty() && self.start < other.end && other.start < self.end
    }
}

/// 年度区分（区間とシート選択ポリシーの組）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Era {
    pub window: YearWindow,
    pub policy: SheetPolicy,
}

impl Era {
    pub fn new(window: YearWindow, policy: SheetPolicy) -> Self {
        Self { window, policy }
    }

    /// 2000-01年度から2010-11年度: `ccpc`シートのみ
    pub fn single_named_sheet() -> Self {
        Self::new(YearWindow::new(2000, 2011), SheetPolicy::single_named_sheet())
    }

    /// 2011-12年度から2019-20年度: データシートすべて
    pub fn all_data_sheets() -> Self {
        Self::new(YearWindow::new(2011, 2020), SheetPolicy::all_data_sheets())
    }

    /// 既定の年度区分
    pub fn standard() -> Vec<Era> {
        vec![Self::single_named_sheet(), Self::all_data_sheets()]
    }
}

/// ワークシートを読み込んだ表
///
/// 1行目を列名とし、残りの行をデータ行として保持します。
/// すべての行は`headers`と同じ列数を持ちます。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SheetTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SheetTable {
    /// 列数
    pub fn width(&self) -> usize {
        self.headers.len()
    }

    /// データ行数（ヘッダー行を除く）
    pub fn height(&self) -> usize {
        self.rows.len()
    }
}
