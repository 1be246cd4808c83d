//! Public API Types
//!
//! 公開APIで使用する列挙型を定義するモジュール。

use std::path::Path;

use serde::Serialize;

use crate::error::ConvertError;

/// `SingleNamedSheet`の既定のシート名接頭辞
pub const DEFAULT_SHEET_PREFIX: &str = "ccpc";

/// `AllDataSheets`の既定の除外キーワード（小文字）
pub const DEFAULT_EXCLUDED_KEYWORDS: [&str; 2] = ["index", "sheet"];

/// 出力ファイル名に使えないシート名の文字
const PATH_SEPARATORS: [char; 2] = ['/', '\\'];

/// シート選択ポリシー
///
/// 年度の区分（Era）ごとに、ワークブックのどのシートをCSVとして出力するかを指定します。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[non_exhaustive]
pub enum SheetPolicy {
    /// 接頭辞に一致する最初のシートのみを出力
    ///
    /// ワークブック内の順序でシート名を走査し、`prefix`で始まる（大文字小文字を区別）
    /// 最初のシートを選択します。出力名は`P<fileYear>.csv`です。
    ///
    /// 一致するシートがない場合は`ConvertError::SheetNotFound`になります。
    SingleNamedSheet {
        /// シート名の接頭辞（例: `ccpc`）
        prefix: String,
    },

    /// 除外キーワードを含まないすべてのシートを出力
    ///
    /// シート名を小文字化し、`excluded`のいずれかを部分文字列として含むシートはスキップします。
    /// 出力名は`P<fileYear>_<シート名>.csv`で、シート名の大文字小文字は保持されます。
    AllDataSheets {
        /// 除外キーワード（小文字で指定）
        excluded: Vec<String>,
    },
}

impl SheetPolicy {
    /// 既定の`SingleNamedSheet`（接頭辞`ccpc`）
    pub fn single_named_sheet() -> Self {
        SheetPolicy::SingleNamedSheet {
            prefix: DEFAULT_SHEET_PREFIX.to_string(),
        }
    }

    /// 既定の`AllDataSheets`（`index`と`sheet`を除外）
    pub fn all_data_sheets() -> Self {
        SheetPolicy::AllDataSheets {
            excluded: DEFAULT_EXCLUDED_KEYWORDS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    /// ポリシーに基づいてシートを選択し、出力ファイル名と組にして返す
    ///
    /// # 引数
    ///
    /// * `file_year` - ファイル名から導出した年度文字列（例: `2012-13`）
    /// * `sheet_names` - ワークブック内の順序で並んだシート名
    /// * `path` - エラーメッセージ用のワークブックのパス
    ///
    /// # 戻り値
    ///
    /// * `Ok(Vec<SelectedSheet>)` - 選択されたシート（ワークブック内の順序）
    /// * `Err(ConvertError::SheetNotFound)` - `SingleNamedSheet`で一致するシートがない場合
    /// * `Err(ConvertError::UnsafeSheetName)` - `AllDataSheets`で選択したシート名にパス区切り文字が含まれる場合
    pub fn select(
        &self,
        file_year: &str,
        sheet_names: &[String],
        path: &Path,
    ) -> Result<Vec<SelectedSheet>, ConvertError> {
        match self {
            SheetPolicy::SingleNamedSheet { prefix } => {
                let sheet_name = sheet_names
                    .iter()
                    .find(|name| name.starts_with(prefix.as_str()))
                    .ok_or_else(|| ConvertError::SheetNotFound {
                        path: path.to_path_buf(),
                        prefix: prefix.clone(),
                    })?;

                Ok(vec![SelectedSheet {
                    sheet_name: sheet_name.clone(),
                    output_name: format!("P{}.csv", file_year),
                }])
            }

            SheetPolicy::AllDataSheets { excluded } => sheet_names
                .iter()
                .filter(|name| {
                    let lower = name.to_lowercase();
                    !excluded.iter().any(|keyword| lower.contains(keyword.as_str()))
                })
                .map(|name| {
                    if name.contains(PATH_SEPARATORS) {
                        return Err(ConvertError::UnsafeSheetName {
                            path: path.to_path_buf(),
                            sheet: name.clone(),
                        });
                    }
                    Ok(SelectedSheet {
                        sheet_name: name.clone(),
                        output_name: format!("P{}_{}.csv", file_year, name),
                    })
                })
                .collect(),
        }
    }
}

/// 選択されたシートと出力ファイル名の組
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedSheet {
    /// ワークブック内のシート名
    pub sheet_name: String,
    /// 出力CSVのファイル名
    pub output_name: String,
}

/// ファイル単位のエラーの扱い
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[non_exhaustive]
pub enum ErrorPolicy {
    /// 最初のエラーで実行全体を中断（デフォルト）
    #[default]
    HaltOnError,

    /// エラーをレポートに記録し、次のファイルの処理を継続
    ///
    /// カタログ作成時のエラーと出力ディレクトリの作成失敗は、このモードでも致命的です。
    CollectAndContinue,
}
