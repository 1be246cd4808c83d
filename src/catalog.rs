//! Catalog Module
//!
//! ソースディレクトリを走査し、命名規則に一致するワークブックのメタデータ（カタログ）を作成する。
//!
//! ファイル名は`P<年度7文字><拡張子>`の形式で、例えば`P2012-13.xlsx`は
//! 年度`2012-13`、開始年`2012`、種別`.xlsx`を表します。

use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::error::ConvertError;
use crate::types::YearWindow;

/// カタログ対象のファイル名の先頭文字
pub const FILE_PREFIX: char = 'P';

/// カタログ対象の拡張子
pub const WORKBOOK_EXTENSIONS: [&str; 2] = [".xls", ".xlsx"];

/// ファイル名中の年度部分の位置
const FILE_YEAR_SPAN: Range<usize> = 1..8;

/// 年度部分のうち開始年を表す長さ
const START_YEAR_LEN: usize = 4;

/// 1ファイル分のカタログエントリ
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileRecord {
    /// 元のファイル名
    pub file_name: String,
    /// 年度文字列（例: `2012-13`）
    pub file_year: String,
    /// 開始年（例: `2012`）
    pub file_start_year: i32,
    /// 年度部分以降の残り（例: `.xlsx`）
    pub file_type: String,
    /// ソースディレクトリとファイル名を結合したパス
    pub full_path: PathBuf,
}

/// ファイル名から導出したメタデータ
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFileName {
    pub file_year: String,
    pub file_start_year: i32,
    pub file_type: String,
}

/// ファイル名がカタログ対象かどうかを判定
///
/// 先頭が`P`で、拡張子が`.xls`または`.xlsx`のファイル名のみが対象です。
pub fn is_catalog_candidate(name: &str) -> bool {
    name.starts_with(FILE_PREFIX) && WORKBOOK_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

/// ファイル名から年度・開始年・種別を導出する
///
/// # 戻り値
///
/// * `Ok(ParsedFileName)` - 導出に成功した場合
/// * `Err(ConvertError::MalformedFileName)` - ファイル名が短すぎる、または開始年が整数でない場合
pub fn parse_file_name(name: &str) -> Result<ParsedFileName, ConvertError> {
    let malformed = |reason: String| ConvertError::MalformedFileName {
        name: name.to_string(),
        reason,
    };

    let year_bytes = char_span(name, FILE_YEAR_SPAN).ok_or_else(|| {
        malformed(format!(
            "expected a year range at characters {}..{}",
            FILE_YEAR_SPAN.start, FILE_YEAR_SPAN.end
        ))
    })?;
    let file_year = &name[year_bytes.clone()];

    let start_year = char_span(file_year, 0..START_YEAR_LEN)
        .map(|bytes| &file_year[bytes])
        .unwrap_or(file_year);
    let file_start_year = start_year
        .parse::<i32>()
        .map_err(|e| malformed(format!("start year '{}' is not an integer: {}", start_year, e)))?;

    Ok(ParsedFileName {
        file_year: file_year.to_string(),
        file_start_year,
        file_type: name[year_bytes.end..].to_string(),
    })
}

/// 文字位置の範囲をバイト位置の範囲に変換する（文字数が足りない場合は`None`）
fn char_span(s: &str, span: Range<usize>) -> Option<Range<usize>> {
    let mut boundaries = s
        .char_indices()
        .map(|(idx, _)| idx)
        .chain(std::iter::once(s.len()));

    let start = boundaries.nth(span.start)?;
    let end = boundaries.nth(span.end.checked_sub(span.start + 1)?)?;
    Some(start..end)
}

/// ソースディレクトリを走査してカタログを作成する
///
/// 対象外のエントリ（命名規則に一致しない名前、通常ファイル以外、UTF-8でない名前）は
/// エラーにせず除外します。結果はファイル名の昇順です。ファイルは開きません。
///
/// # 戻り値
///
/// * `Ok(Vec<FileRecord>)` - カタログ（一致するファイルがなければ空）
/// * `Err(ConvertError::Io)` - ディレクトリを読めない場合
/// * `Err(ConvertError::MalformedFileName)` - 対象ファイルの年度を導出できない場合
pub fn build_catalog(source_dir: &Path) -> Result<Vec<FileRecord>, ConvertError> {
    let mut records = Vec::new();

    for entry in fs::read_dir(source_dir)? {
        let entry = entry?;

        let file_name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(raw) => {
                debug!("Skipping non UTF-8 entry: {:?}", raw);
                continue;
            }
        };

        if !is_catalog_candidate(&file_name) {
            debug!("Skipping {}", file_name);
            continue;
        }

        if !entry.file_type()?.is_file() {
            debug!("Skipping non-file entry {}", file_name);
            continue;
        }

        let parsed = parse_file_name(&file_name)?;
        records.push(FileRecord {
            full_path: source_dir.join(&file_name),
            file_name,
            file_year: parsed.file_year,
            file_start_year: parsed.file_start_year,
            file_type: parsed.file_type,
        });
    }

    records.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    debug!(
        "Catalogued {} workbook(s) in {}",
        records.len(),
        source_dir.display()
    );

    Ok(records)
}

/// 開始年が区間に含まれるレコードのみを返す（順序は保持）
pub fn records_in_window<'a>(
    records: &'a [FileRecord],
    window: &'a YearWindow,
) -> impl Iterator<Item = &'a FileRecord> + 'a {
    records
        .iter()
        .filter(move |record| window.contains(record.file_start_year))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        File::create(dir.join(name)).unwrap();
    }

    #[test]
    fn test_is_catalog_candidate() {
        assert!(is_catalog_candidate("P2005-06.xls"));
        assert!(is_catalog_candidate("P2012-13.xlsx"));

        assert!(!is_catalog_candidate("p2005-06.xls"));
        assert!(!is_catalog_candidate("Q2005-06.xls"));
        assert!(!is_catalog_candidate("P2005-06.csv"));
        assert!(!is_catalog_candidate("P2005-06.XLS"));
        assert!(!is_catalog_candidate("P2005-06.xlsm"));
        assert!(!is_catalog_candidate("readme.txt"));
    }

    #[test]
    fn test_parse_file_name() {
        let parsed = parse_file_name("P2012-13.xlsx").unwrap();
        assert_eq!(parsed.file_year, "2012-13");
        assert_eq!(parsed.file_start_year, 2012);
        assert_eq!(parsed.file_type, ".xlsx");

        let parsed = parse_file_name("P2005-06.xls").unwrap();
        assert_eq!(parsed.file_year, "2005-06");
        assert_eq!(parsed.file_start_year, 2005);
        assert_eq!(parsed.file_type, ".xls");
    }

    #[test]
    fn test_parse_file_name_uses_fixed_offsets() {
        // 年度部分は常に7文字分
        let parsed = parse_file_name("P2019_2020.xlsx").unwrap();
        assert_eq!(parsed.file_year, "2019_20");
        assert_eq!(parsed.file_start_year, 2019);
        assert_eq!(parsed.file_type, "20.xlsx");
    }

    #[test]
    fn test_parse_file_name_non_numeric_year() {
        match parse_file_name("Pabcd-ef.xls") {
            Err(ConvertError::MalformedFileName { name, reason }) => {
                assert_eq!(name, "Pabcd-ef.xls");
                assert!(reason.contains("abcd"));
            }
            other => panic!("Expected MalformedFileName, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_file_name_too_short() {
        assert!(matches!(
            parse_file_name("P.xls"),
            Err(ConvertError::MalformedFileName { .. })
        ));
    }

    #[test]
    fn test_parse_file_name_multibyte_year() {
        assert!(matches!(
            parse_file_name("P20é-130.xls"),
            Err(ConvertError::MalformedFileName { .. })
        ));
    }

    #[test]
    fn test_parse_file_name_counts_characters() {
        let parsed = parse_file_name("P2012-é3.xls").unwrap();
        assert_eq!(parsed.file_year, "2012-é3");
        assert_eq!(parsed.file_start_year, 2012);
        assert_eq!(parsed.file_type, ".xls");
    }

    #[test]
    fn test_char_span() {
        assert_eq!(char_span("P2012-13.xls", 1..8), Some(1..8));
        assert_eq!(char_span("Pé012-13", 1..8), Some(1..9));
        assert_eq!(char_span("P2012", 1..8), None);
    }

    #[test]
    fn test_build_catalog_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "P2012-13.xlsx");
        touch(dir.path(), "P2005-06.xls");
        touch(dir.path(), "notes.txt");
        touch(dir.path(), "p2006-07.xls");
        touch(dir.path(), "P2007-08.csv");
        fs::create_dir(dir.path().join("P2008-09.xls")).unwrap();

        let records = build_catalog(dir.path()).unwrap();

        let names: Vec<&str> = records.iter().map(|r| r.file_name.as_str()).collect();
        assert_eq!(names, vec!["P2005-06.xls", "P2012-13.xlsx"]);

        assert_eq!(records[0].file_year, "2005-06");
        assert_eq!(records[0].file_start_year, 2005);
        assert_eq!(records[0].file_type, ".xls");
        assert_eq!(records[0].full_path, dir.path().join("P2005-06.xls"));
    }

    #[test]
    fn test_build_catalog_empty_directory() {
        let dir = TempDir::new().unwrap();
        assert!(build_catalog(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_build_catalog_missing_directory() {
        let dir = TempDir::new().unwrap();
        let result = build_catalog(&dir.path().join("missing"));
        assert!(matches!(result, Err(ConvertError::Io(_))));
    }

    #[test]
    fn test_build_catalog_malformed_name_is_fatal() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "P2005-06.xls");
        touch(dir.path(), "Prices.xlsx");

        let result = build_catalog(dir.path());
        assert!(matches!(
            result,
            Err(ConvertError::MalformedFileName { ref name, .. }) if name == "Prices.xlsx"
        ));
    }

    #[test]
    fn test_records_in_window() {
        let dir = TempDir::new().unwrap();
        for name in ["P1999-00.xls", "P2000-01.xls", "P2010-11.xls", "P2011-12.xlsx"] {
            touch(dir.path(), name);
        }
        let records = build_catalog(dir.path()).unwrap();

        let window = YearWindow::new(2000, 2011);
        let years: Vec<i32> = records_in_window(&records, &window)
            .map(|r| r.file_start_year)
            .collect();
        assert_eq!(years, vec![2000, 2010]);
    }

    // プロパティベーステスト
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_start_year_matches_name(
                year in 1000i32..10000,
                tail in "[0-9]{2}-[0-9]{2}",
                ext in prop::sample::select(vec![".xls", ".xlsx"])
            ) {
                // 年度部分は4桁の開始年 + 3文字
                let name = format!("P{}{}{}", year, &tail[2..], ext);
                prop_assume!(is_catalog_candidate(&name));

                let parsed = parse_file_name(&name).unwrap();
                prop_assert_eq!(parsed.file_start_year, year);
                let year_str = year.to_string();
                prop_assert_eq!(&parsed.file_year[..4], year_str.as_str());
                prop_assert_eq!(parsed.file_type, ext);
            }

            #[test]
            fn test_non_matching_names_are_excluded(
                first in "[A-OQ-Za-z0-9]",
                rest in "[A-Za-z0-9-]{0,12}",
                ext in prop::sample::select(vec![".xls", ".xlsx", ".csv", ""])
            ) {
                let name = format!("{}{}{}", first, rest, ext);
                prop_assert!(!is_catalog_candidate(&name));
            }
        }
    }
}
