//! dacnet-convert - DACNET market-price workbooks to per-sheet CSV files
//!
//! ソースディレクトリにある`P<年度>.xls` / `P<年度>.xlsx`形式のワークブックを走査し、
//! 年度区分ごとのシート選択ポリシーに従って、各シートを独立したCSVファイルとして出力します。
//!
//! - 2000-01年度〜2010-11年度: 名前が`ccpc`で始まる最初のシートを`P<年度>.csv`に出力
//! - 2011-12年度〜2019-20年度: 名前に`index`/`sheet`を含まないすべてのシートを
//!   `P<年度>_<シート名>.csv`に出力
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use dacnet_convert::ConverterBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // ./data/raw から ./data/raw/temp へ変換
//!     let converter = ConverterBuilder::new().build()?;
//!     let report = converter.run()?;
//!
//!     for artifact in &report.written {
//!         println!("{} <- {}", artifact.file_name, artifact.source_file);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Custom Configuration
//!
//! ```rust,no_run
//! use dacnet_convert::{ConverterBuilder, Era, ErrorPolicy, SheetPolicy, YearWindow};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let converter = ConverterBuilder::new()
//!         .with_source_dir("/data/dacnet/raw")
//!         .with_target_dir("/data/dacnet/csv")
//!         .with_eras(vec![
//!             Era::single_named_sheet(),
//!             Era::new(YearWindow::new(2011, 2025), SheetPolicy::all_data_sheets()),
//!         ])
//!         .with_error_policy(ErrorPolicy::CollectAndContinue)
//!         .build()?;
//!
//!     let report = converter.run()?;
//!     for failure in &report.failures {
//!         eprintln!("{}: {}", failure.file_name, failure.error);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod api;
mod builder;
mod catalog;
mod error;
mod formatter;
mod output;
mod parser;
mod report;
mod types;

// 公開API
pub use api::{
    ErrorPolicy, SelectedSheet, SheetPolicy, DEFAULT_EXCLUDED_KEYWORDS, DEFAULT_SHEET_PREFIX,
};
pub use builder::{Converter, ConverterBuilder};
pub use catalog::{
    build_catalog, is_catalog_candidate, parse_file_name, records_in_window, FileRecord,
    ParsedFileName, FILE_PREFIX, WORKBOOK_EXTENSIONS,
};
pub use error::ConvertError;
pub use report::{ConversionReport, FileFailure, OutputArtifact};
pub use types::{Era, YearWindow};
