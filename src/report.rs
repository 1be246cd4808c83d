//! Report Module
//!
//! 実行結果（出力したファイルと記録したエラー）の集計。

use std::io::Write;
use std::path::PathBuf;

use serde::Serialize;

use crate::error::ConvertError;

/// 出力したCSVファイル1つ分の情報
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputArtifact {
    /// 元のワークブックのファイル名
    pub source_file: String,
    /// 出力したシート名
    pub sheet_name: String,
    /// 出力ファイル名
    pub file_name: String,
    /// 出力ファイルのパス
    pub path: PathBuf,
    /// データ行数（ヘッダー行を除く）
    pub rows: usize,
    /// 列数
    pub columns: usize,
}

/// `ErrorPolicy::CollectAndContinue`で記録されたファイル単位のエラー
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    /// 元のワークブックのファイル名
    pub file_name: String,
    /// エラーメッセージ
    pub error: String,
}

/// 実行レポート
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversionReport {
    pub written: Vec<OutputArtifact>,
    pub failures: Vec<FileFailure>,
}

impl ConversionReport {
    /// エラーなく完了したかどうか
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// 出力ファイル名の一覧（出力順）
    pub fn written_names(&self) -> Vec<&str> {
        self.written.iter().map(|a| a.file_name.as_str()).collect()
    }

    /// 整形済みJSONとして書き出す
    pub fn write_json<W: Write>(&self, mut writer: W) -> Result<(), ConvertError> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writeln!(writer)?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(name: &str) -> OutputArtifact {
        OutputArtifact {
            source_file: "P2012-13.xlsx".to_string(),
            sheet_name: "Data1".to_string(),
            file_name: name.to_string(),
            path: PathBuf::from("/out").join(name),
            rows: 3,
            columns: 2,
        }
    }

    #[test]
    fn test_is_success() {
        let mut report = ConversionReport::default();
        assert!(report.is_success());

        report.failures.push(FileFailure {
            file_name: "P2001-02.xls".to_string(),
            error: "No worksheet starting with 'ccpc'".to_string(),
        });
        assert!(!report.is_success());
    }

    #[test]
    fn test_written_names() {
        let report = ConversionReport {
            written: vec![artifact("P2012-13_Data1.csv"), artifact("P2012-13_Prices.csv")],
            failures: Vec::new(),
        };
        assert_eq!(
            report.written_names(),
            vec!["P2012-13_Data1.csv", "P2012-13_Prices.csv"]
        );
    }

    #[test]
    fn test_write_json() {
        let report = ConversionReport {
            written: vec![artifact("P2012-13_Data1.csv")],
            failures: Vec::new(),
        };

        let mut output = Vec::new();
        report.write_json(&mut output).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(value["written"][0]["file_name"], "P2012-13_Data1.csv");
        assert_eq!(value["written"][0]["rows"], 3);
        assert_eq!(value["failures"].as_array().unwrap().len(), 0);
    }
}
