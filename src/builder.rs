//! Builder Module
//!
//! Fluent Builder APIを提供し、`Converter`インスタンスを段階的に構築する。

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::api::{ErrorPolicy, SheetPolicy};
use crate::catalog::{build_catalog, records_in_window, FileRecord};
use crate::error::ConvertError;
use crate::formatter::CellFormatter;
use crate::output::CsvWriter;
use crate::parser::WorkbookParser;
use crate::report::{ConversionReport, FileFailure, OutputArtifact};
use crate::types::Era;

/// プロジェクトルートからのソースディレクトリ
const RAW_DIR: [&str; 2] = ["data", "raw"];

/// プロジェクトルートからの出力ディレクトリ
const CSV_DIR: [&str; 3] = ["data", "raw", "temp"];

fn layout_dir(root: &Path, parts: &[&str]) -> PathBuf {
    parts.iter().fold(root.to_path_buf(), |dir, part| dir.join(part))
}

/// 変換処理の設定を保持する内部構造体
#[derive(Debug, Clone)]
pub(crate) struct ConversionConfig {
    /// ワークブックを置いたディレクトリ
    pub source_dir: PathBuf,

    /// CSVの出力先ディレクトリ
    pub target_dir: PathBuf,

    /// 年度区分（処理順）
    pub eras: Vec<Era>,

    /// ファイル単位のエラーの扱い
    pub error_policy: ErrorPolicy,
}

impl ConversionConfig {
    fn for_project_root(root: &Path) -> Self {
        Self {
            source_dir: layout_dir(root, &RAW_DIR),
            target_dir: layout_dir(root, &CSV_DIR),
            eras: Era::standard(),
            error_policy: ErrorPolicy::default(),
        }
    }
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self::for_project_root(Path::new("."))
    }
}

/// Fluent Builder APIを提供する構造体
///
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみをオーバーライドできます。
///
/// # 使用例
///
/// ```rust,no_run
/// use dacnet_convert::{ConverterBuilder, ErrorPolicy};
///
/// # fn main() -> Result<(), dacnet_convert::ConvertError> {
/// let converter = ConverterBuilder::new()
///     .with_project_root("/srv/dacnet")
///     .with_error_policy(ErrorPolicy::CollectAndContinue)
///     .build()?;
/// let report = converter.run()?;
/// println!("{} file(s) written", report.written.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ConverterBuilder {
    /// 内部設定（構築中）
    config: ConversionConfig,
}

impl Default for ConverterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConverterBuilder {
    /// デフォルト設定を持つビルダーインスタンスを生成する
    ///
    /// # デフォルト設定
    ///
    /// - ソース: `./data/raw`
    /// - 出力先: `./data/raw/temp`
    /// - 年度区分: 2000〜2010年は`ccpc`シートのみ、2011〜2019年はデータシートすべて
    /// - エラー: 最初のエラーで中断
    pub fn new() -> Self {
        Self {
            config: ConversionConfig::default(),
        }
    }

    /// プロジェクトルートを指定する
    ///
    /// ソースは`<root>/data/raw`、出力先は`<root>/data/raw/temp`になります。
    pub fn with_project_root(mut self, root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        self.config.source_dir = layout_dir(root, &RAW_DIR);
        self.config.target_dir = layout_dir(root, &CSV_DIR);
        self
    }

    /// ソースディレクトリを指定する
    pub fn with_source_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.source_dir = dir.into();
        self
    }

    /// 出力先ディレクトリを指定する
    pub fn with_target_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.target_dir = dir.into();
        self
    }

    /// 年度区分を指定する（指定した順に処理されます）
    pub fn with_eras(mut self, eras: Vec<Era>) -> Self {
        self.config.eras = eras;
        self
    }

    /// ファイル単位のエラーの扱いを指定する
    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.config.error_policy = policy;
        self
    }

    /// 設定を検証し、`Converter`インスタンスを生成する
    ///
    /// # 発生し得るエラー
    ///
    /// * `ConvertError::Config(String)`: 設定の検証に失敗した場合
    ///   * 年度区分が1つもない
    ///   * 年度区分の区間が空、または区間同士が重なっている
    ///   * `SingleNamedSheet`の接頭辞が空
    ///   * `AllDataSheets`の除外キーワードに空文字列が含まれる
    ///
    /// 除外キーワードは小文字に正規化されます。
    pub fn build(mut self) -> Result<Converter, ConvertError> {
        // 1. 年度区分の検証
        if self.config.eras.is_empty() {
            return Err(ConvertError::Config("No eras configured".to_string()));
        }

        for (idx, era) in self.config.eras.iter().enumerate() {
            if era.window.is_empty() {
                return Err(ConvertError::Config(format!(
                    "Invalid era window: start ({}) >= end ({})",
                    era.window.start, era.window.end
                )));
            }

            if let Some(other) = self.config.eras[idx + 1..]
                .iter()
                .find(|other| other.window.overlaps(&era.window))
            {
                return Err(ConvertError::Config(format!(
                    "Overlapping era windows: [{}, {}) and [{}, {})",
                    era.window.start, era.window.end, other.window.start, other.window.end
                )));
            }
        }

        // 2. ポリシーの検証
        for era in &mut self.config.eras {
            match &mut era.policy {
                SheetPolicy::SingleNamedSheet { prefix } => {
                    if prefix.is_empty() {
                        return Err(ConvertError::Config(
                            "Sheet prefix must not be empty".to_string(),
                        ));
                    }
                }
                SheetPolicy::AllDataSheets { excluded } => {
                    if excluded.iter().any(|keyword| keyword.is_empty()) {
                        return Err(ConvertError::Config(
                            "Excluded sheet keywords must not be empty".to_string(),
                        ));
                    }
                    for keyword in excluded.iter_mut() {
                        *keyword = keyword.to_lowercase();
                    }
                }
            }
        }

        // 3. Converterインスタンス生成
        Ok(Converter::new(self.config))
    }
}

/// 変換処理のファサード
///
/// ソースディレクトリのカタログを作成し、年度区分ごとのポリシーでシートを選択して
/// CSVに変換します。処理はすべて逐次的に行われます。
#[derive(Debug)]
pub struct Converter {
    /// 変換設定
    config: ConversionConfig,

    /// セルフォーマッター
    formatter: CellFormatter,

    /// CSV出力
    writer: CsvWriter,
}

impl Converter {
    pub(crate) fn new(config: ConversionConfig) -> Self {
        Self {
            config,
            formatter: CellFormatter::new(),
            writer: CsvWriter::new(),
        }
    }

    /// ソースディレクトリ
    pub fn source_dir(&self) -> &Path {
        &self.config.source_dir
    }

    /// 出力先ディレクトリ
    pub fn target_dir(&self) -> &Path {
        &self.config.target_dir
    }

    /// 年度区分
    pub fn eras(&self) -> &[Era] {
        &self.config.eras
    }

    /// ファイル単位のエラーの扱い
    pub fn error_policy(&self) -> ErrorPolicy {
        self.config.error_policy
    }

    /// ソースディレクトリのカタログを作成する
    pub fn catalog(&self) -> Result<Vec<FileRecord>, ConvertError> {
        build_catalog(&self.config.source_dir)
    }

    /// 変換全体を実行する
    ///
    /// # 処理フロー
    ///
    /// 1. 出力先ディレクトリの作成（親ディレクトリを含む）
    /// 2. カタログの作成
    /// 3. 年度区分ごとに、区間に含まれるファイルを変換
    ///
    /// # 戻り値
    ///
    /// * `Ok(ConversionReport)` - 実行レポート
    /// * `Err(ConvertError)` - 致命的なエラー（`HaltOnError`ではファイル単位のエラーも含む）
    pub fn run(&self) -> Result<ConversionReport, ConvertError> {
        fs::create_dir_all(&self.config.target_dir)?;

        let catalog = self.catalog()?;
        let mut report = ConversionReport::default();

        for era in &self.config.eras {
            debug!(
                "Processing era [{}, {}) with {:?}",
                era.window.start, era.window.end, era.policy
            );
            self.extract(records_in_window(&catalog, &era.window), &era.policy, &mut report)?;
        }

        Ok(report)
    }

    /// ファイル群をポリシーに従って変換し、結果をレポートに追加する
    ///
    /// 出力先ディレクトリは既に存在している必要があります（`run()`が作成します）。
    /// `ErrorPolicy::HaltOnError`では最初のエラーで中断し、以降のファイルは処理しません。
    pub fn extract<'a, I>(
        &self,
        records: I,
        policy: &SheetPolicy,
        report: &mut ConversionReport,
    ) -> Result<(), ConvertError>
    where
        I: IntoIterator<Item = &'a FileRecord>,
    {
        for record in records {
            match self.convert_file(record, policy, &mut report.written) {
                Ok(()) => {}
                Err(e)
                    if self.config.error_policy == ErrorPolicy::CollectAndContinue
                        && e.is_per_file() =>
                {
                    warn!("Skipping {}: {}", record.file_name, e);
                    report.failures.push(FileFailure {
                        file_name: record.file_name.clone(),
                        error: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        Ok(())
    }

    /// 1つのワークブックを変換する
    ///
    /// ワークブックはこの関数のスコープ内でのみ開かれます。
    fn convert_file(
        &self,
        record: &FileRecord,
        policy: &SheetPolicy,
        written: &mut Vec<OutputArtifact>,
    ) -> Result<(), ConvertError> {
        let mut parser = WorkbookParser::open(&record.full_path)?;
        let sheet_names = parser.sheet_names();

        let selected = policy.select(&record.file_year, &sheet_names, parser.path())?;
        for skipped in sheet_names
            .iter()
            .filter(|name| !selected.iter().any(|s| &s.sheet_name == *name))
        {
            debug!("Skipping worksheet '{}' in {}", skipped, record.file_name);
        }

        for sheet in selected {
            let table = parser.read_table(&sheet.sheet_name, &self.formatter)?;
            let path = self.config.target_dir.join(&sheet.output_name);
            self.writer.write_file(&table, &path)?;

            info!("Saved: {}", sheet.output_name);

            written.push(OutputArtifact {
                source_file: record.file_name.clone(),
                sheet_name: sheet.sheet_name,
                file_name: sheet.output_name,
                path,
                rows: table.height(),
                columns: table.width(),
            });
        }

        Ok(())
    }
}
