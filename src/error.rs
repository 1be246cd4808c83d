//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use std::path::PathBuf;

use thiserror::Error;

/// dacnet-convertクレート全体で使用するエラー型
///
/// カタログ作成、ワークブックの読み込み、シート選択、CSV出力の各段階で
/// 発生するエラーを統一的に扱います。
///
/// # エラーの種類
///
/// - `Io`: ディレクトリ走査や出力ディレクトリ作成中のI/Oエラー
/// - `MalformedFileName`: ファイル名から年度を導出できないエラー
/// - `WorkbookOpen`: ワークブックを開けないエラー（calamine由来）
/// - `SheetNotFound`: 対象シートが見つからないエラー
/// - `UnsafeSheetName`: 出力ファイル名に使えないシート名
/// - `SheetRead`: 選択したシートの読み込みに失敗したエラー
/// - `Csv`: CSV出力中のエラー
/// - `Config`: 設定の検証に失敗したエラー
/// - `Report`: 実行レポートのシリアライズに失敗したエラー
#[derive(Error, Debug)]
pub enum ConvertError {
    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// 命名規則に従わないファイル名
    ///
    /// 先頭文字`P`と拡張子のフィルタを通過したにもかかわらず、
    /// 年度部分を整数として解釈できなかった場合に発生します。
    #[error("Malformed file name '{name}': {reason}")]
    MalformedFileName {
        /// 対象のファイル名
        name: String,
        /// 解析に失敗した理由
        reason: String,
    },

    /// ワークブックを開けなかったエラー
    ///
    /// 破損したファイルや、拡張子と中身の形式が一致しないファイルなどが原因となります。
    #[error("Failed to open workbook {}: {source}", .path.display())]
    WorkbookOpen {
        /// ワークブックのパス
        path: PathBuf,
        /// calamineのエラー
        #[source]
        source: calamine::Error,
    },

    /// 指定の接頭辞を持つシートが存在しない
    #[error("No worksheet starting with '{prefix}' in {}", .path.display())]
    SheetNotFound {
        /// ワークブックのパス
        path: PathBuf,
        /// 探索したシート名の接頭辞
        prefix: String,
    },

    /// 出力ファイル名に使えないシート名
    ///
    /// シート名にパス区切り文字が含まれ、出力先ディレクトリの外を指しうる場合に発生します。
    #[error("Worksheet name '{sheet}' in {} contains a path separator", .path.display())]
    UnsafeSheetName {
        /// ワークブックのパス
        path: PathBuf,
        /// シート名
        sheet: String,
    },

    /// 選択したシートの読み込みに失敗したエラー
    #[error("Failed to read worksheet '{sheet}' in {}: {source}", .path.display())]
    SheetRead {
        /// ワークブックのパス
        path: PathBuf,
        /// シート名
        sheet: String,
        /// calamineのエラー
        #[source]
        source: calamine::Error,
    },

    /// CSV出力中のエラー
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// 設定の検証に失敗したエラー
    ///
    /// `ConverterBuilder::build()`時に検出されます。
    ///
    /// # 例
    ///
    /// ```rust,no_run
    /// use dacnet_convert::{ConvertError, ConverterBuilder};
    ///
    /// let result = ConverterBuilder::new().with_eras(Vec::new()).build();
    ///
    /// match result {
    ///     Err(ConvertError::Config(msg)) => {
    ///         println!("設定エラー: {}", msg);
    ///     }
    ///     _ => {}
    /// }
    /// ```
    #[error("Configuration error: {0}")]
    Config(String),

    /// 実行レポートのJSONシリアライズエラー
    #[error("Report serialization error: {0}")]
    Report(#[from] serde_json::Error),
}

impl ConvertError {
    /// ファイル単位で扱える（CollectAndContinueで記録して継続できる）エラーかどうか
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            ConvertError::WorkbookOpen { .. }
                | ConvertError::SheetNotFound { .. }
                | ConvertError::UnsafeSheetName { .. }
                | ConvertError::SheetRead { .. }
                | ConvertError::Csv(_)
        )
    }
}
