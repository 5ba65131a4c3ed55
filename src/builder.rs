//! Builder Module
//!
//! Fluent Builder APIを提供し、`Converter`インスタンスを段階的に構築する。
//! `Converter`は単一ファイル変換・ディレクトリ一括変換のファサードです。

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::api::SheetSelector;
use crate::encoding::is_known_label;
use crate::error::SheetMarkError;
use crate::loader::{self, SUPPORTED_EXTENSIONS};
use crate::progress::ProgressSink;
use crate::render::render_markdown;
use crate::walker::find_files;

/// 変換処理の設定を保持する内部構造体
#[derive(Debug, Clone)]
pub(crate) struct ConversionConfig {
    /// シート選択方式
    pub sheet_selector: SheetSelector,

    /// ヘッダー行と区切り行を出力するか
    pub include_headers: bool,

    /// CSVのエンコーディング指定（Noneの場合は自動検出）
    pub encoding_override: Option<String>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            sheet_selector: SheetSelector::All,
            include_headers: true,
            encoding_override: None,
        }
    }
}

/// Fluent Builder APIを提供する構造体
///
/// `Converter`インスタンスを段階的に構築するためのビルダーです。
/// すべての設定項目にデフォルト値が設定されており、必要な設定のみを
/// オーバーライドできます。
///
/// # 使用例
///
/// ```rust,no_run
/// use sheetmark::{ConverterBuilder, SheetSelector};
///
/// # fn main() -> Result<(), sheetmark::SheetMarkError> {
/// let converter = ConverterBuilder::new()
///     .with_sheet_selector(SheetSelector::Name("Sheet1".to_string()))
///     .include_headers(true)
///     .build()?;
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
    /// - シート選択: すべてのシート
    /// - ヘッダー: 出力する
    /// - エンコーディング: 自動検出
    pub fn new() -> Self {
        Self {
            config: ConversionConfig::default(),
        }
    }

    /// 変換対象のシートを選択する
    ///
    /// # 引数
    ///
    /// * `selector: SheetSelector`: シート選択方式
    pub fn with_sheet_selector(mut self, selector: SheetSelector) -> Self {
        self.config.sheet_selector = selector;
        self
    }

    /// ヘッダー行と区切り行を出力するかを指定する
    ///
    /// # 引数
    ///
    /// * `include: bool`:
    ///   * `true`: 列名のヘッダー行と`---`区切り行を出力（デフォルト）
    ///   * `false`: データ行のみを出力
    pub fn include_headers(mut self, include: bool) -> Self {
        self.config.include_headers = include;
        self
    }

    /// CSVファイルのエンコーディングを明示的に指定する
    ///
    /// 指定した場合、自動検出をスキップしてこのラベルでデコードします。
    /// Excelファイルの読み込みには影響しません。
    ///
    /// # 引数
    ///
    /// * `label`: エンコーディングラベル（例: `utf-8`、`gbk`、`gb18030`）
    pub fn with_encoding_override(mut self, label: impl Into<String>) -> Self {
        self.config.encoding_override = Some(label.into());
        self
    }

    /// 設定を検証し、`Converter`インスタンスを生成する
    ///
    /// # 戻り値
    ///
    /// * `Ok(Converter)`: 設定が有効な場合
    /// * `Err(SheetMarkError::Config)`: エンコーディング指定が未知の
    ///   ラベルの場合
    pub fn build(self) -> Result<Converter, SheetMarkError> {
        if let Some(label) = &self.config.encoding_override {
            if !is_known_label(label) {
                return Err(SheetMarkError::Config(format!(
                    "Unknown encoding label: '{label}'"
                )));
            }
        }

        Ok(Converter::new(self.config))
    }
}

/// 1ファイルの変換結果
///
/// バッチ変換でファイルごとの成否を表す値です。失敗は例外の巻き戻し
/// ではなく、この値として収集されます。
#[derive(Debug)]
pub struct FileOutcome {
    /// 入力ファイルのパス
    pub input: PathBuf,

    /// 成功時は書き出したMarkdownファイルのパス、失敗時はエラー
    pub result: Result<PathBuf, SheetMarkError>,
}

/// バッチ変換のサマリー
#[derive(Debug, Default)]
pub struct BatchSummary {
    /// ファイルごとの変換結果（入力パスの辞書順）
    pub outcomes: Vec<FileOutcome>,
}

impl BatchSummary {
    /// 変換に成功したファイル数
    pub fn converted(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    /// 変換に失敗したファイル数
    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_err()).count()
    }

    /// 処理したファイルの総数
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }
}

/// 変換処理のファサード
///
/// Excel/CSVファイルをMarkdown形式に変換するためのメインエントリー
/// ポイントです。`ConverterBuilder`を使用して構築された設定に基づいて
/// 変換処理を実行します。
///
/// # 使用例
///
/// ```rust,no_run
/// use std::path::Path;
/// use sheetmark::{ConverterBuilder, NullSink};
///
/// # fn main() -> Result<(), sheetmark::SheetMarkError> {
/// let converter = ConverterBuilder::new().build()?;
/// let markdown = converter.convert_file(Path::new("report.xlsx"), &NullSink::new())?;
/// println!("{}", markdown);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Converter {
    /// 変換設定
    config: ConversionConfig,
}

impl Converter {
    pub(crate) fn new(config: ConversionConfig) -> Self {
        Self { config }
    }

    /// 1ファイルをMarkdownテキストに変換
    ///
    /// # 引数
    ///
    /// * `path` - 入力ファイル（xlsx/xls/csv）のパス
    /// * `sink` - 進捗通知シンク
    ///
    /// # 戻り値
    ///
    /// * `Ok(String)` - 変換されたMarkdownテキスト。複数シートの場合は
    ///   各セクションが空行区切りで連結される
    /// * `Err(SheetMarkError)` - 読み込みまたは解析に失敗した場合
    pub fn convert_file(
        &self,
        path: &Path,
        sink: &dyn ProgressSink,
    ) -> Result<String, SheetMarkError> {
        let sections = self.convert_file_sections(path, sink)?;
        Ok(sections.join("\n\n"))
    }

    /// 1ファイルをセクション単位で変換
    ///
    /// 複数シートのワークブックでは1シートにつき1セクションを返します。
    /// 各セクションは`## Sheet: <名前>`の見出しと空行に続けてテーブル
    /// 本体を含みます。CSVや単一シート指定の場合は見出しなしの
    /// テーブルのみのセクションが1つ返ります。
    ///
    /// プレビュー表示などセクション単位の組版が必要な呼び出し側の
    /// ために分離されています。
    pub fn convert_file_sections(
        &self,
        path: &Path,
        sink: &dyn ProgressSink,
    ) -> Result<Vec<String>, SheetMarkError> {
        let extension = loader::extension_of(path);
        let encoding_override = self.config.encoding_override.as_deref();

        match extension.as_str() {
            "xlsx" | "xls" => match &self.config.sheet_selector {
                SheetSelector::All => {
                    let sheet_names = loader::list_sheets(path)?;
                    let file_name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_default();
                    sink.status(&format!("Converting sheets in {file_name}..."));

                    let mut sections = Vec::with_capacity(sheet_names.len());
                    for sheet_name in &sheet_names {
                        let grid = loader::load_with_encoding(
                            path,
                            Some(sheet_name),
                            encoding_override,
                        )?;
                        let table = render_markdown(&grid, self.config.include_headers);
                        sections.push(format!("## Sheet: {sheet_name}\n\n{table}"));
                        sink.tick();
                    }
                    Ok(sections)
                }

                SheetSelector::Index(index) => {
                    let sheet_names = loader::list_sheets(path)?;
                    let sheet_name = sheet_names.get(*index).ok_or_else(|| {
                        SheetMarkError::Config(format!(
                            "Sheet index {} is out of range (total: {})",
                            index,
                            sheet_names.len()
                        ))
                    })?;
                    let grid =
                        loader::load_with_encoding(path, Some(sheet_name), encoding_override)?;
                    Ok(vec![render_markdown(&grid, self.config.include_headers)])
                }

                SheetSelector::Name(name) => {
                    let grid = loader::load_with_encoding(path, Some(name), encoding_override)?;
                    Ok(vec![render_markdown(&grid, self.config.include_headers)])
                }
            },

            // CSVは常に単一テーブル、見出しなし
            "csv" => {
                let grid = loader::load_with_encoding(path, None, encoding_override)?;
                Ok(vec![render_markdown(&grid, self.config.include_headers)])
            }

            _ => Err(SheetMarkError::UnsupportedExtension { extension }),
        }
    }

    /// 1ファイルを変換してMarkdownファイルに書き出す
    ///
    /// 入力のエンコーディングに関わらず、出力は常にUTF-8で書き込み
    /// ます。
    pub fn convert_file_to(
        &self,
        path: &Path,
        output_path: &Path,
        sink: &dyn ProgressSink,
    ) -> Result<(), SheetMarkError> {
        let markdown = self.convert_file(path, sink)?;
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(output_path, markdown)?;
        debug!(output = %output_path.display(), "wrote markdown file");
        Ok(())
    }

    /// ディレクトリ内のExcel/CSVファイルを一括変換
    ///
    /// # 引数
    ///
    /// * `input_dir` - 入力ディレクトリ
    /// * `output_dir` - 出力ディレクトリ。`None`の場合は入力ディレクトリ
    /// * `recursive` - サブディレクトリを再帰的に処理するか
    /// * `sink` - 進捗通知シンク
    ///
    /// # 戻り値
    ///
    /// * `Ok(BatchSummary)` - ファイルごとの成否を含むサマリー
    /// * `Err(SheetMarkError)` - 入力ディレクトリが存在しない、または
    ///   ファイル列挙に失敗した場合
    ///
    /// # バッチのエラー処理
    ///
    /// ファイル単位の変換はワーカープール上で並列に実行され、各
    /// ファイルのパイプラインは独立した作業単位です。1ファイルの失敗は
    /// `FileOutcome`として記録され、残りのファイルの処理は継続します。
    pub fn convert_directory(
        &self,
        input_dir: &Path,
        output_dir: Option<&Path>,
        recursive: bool,
        sink: &dyn ProgressSink,
    ) -> Result<BatchSummary, SheetMarkError> {
        if !input_dir.is_dir() {
            return Err(SheetMarkError::Config(format!(
                "Input directory '{}' does not exist",
                input_dir.display()
            )));
        }

        sink.status(&format!(
            "Processing directory {} (recursive={recursive})",
            input_dir.display()
        ));

        let output_dir = match output_dir {
            Some(dir) => {
                fs::create_dir_all(dir)?;
                sink.status(&format!("Output directory: {}", dir.display()));
                dir.to_path_buf()
            }
            None => input_dir.to_path_buf(),
        };

        let files = find_files(input_dir, &SUPPORTED_EXTENSIONS, recursive)?;
        if files.is_empty() {
            sink.status(&format!(
                "No Excel or CSV files found in '{}'",
                input_dir.display()
            ));
            return Ok(BatchSummary::default());
        }

        let excel_count = files
            .iter()
            .filter(|p| matches!(loader::extension_of(p).as_str(), "xlsx" | "xls"))
            .count();
        let csv_count = files.len() - excel_count;
        sink.status(&format!(
            "Found {excel_count} Excel files and {csv_count} CSV files."
        ));

        // ファイル単位の変換を並列化。順序はインデックスで復元する
        let mut indexed: Vec<(usize, FileOutcome)> = files
            .par_iter()
            .enumerate()
            .map(|(idx, path)| {
                let outcome = self.convert_batch_entry(path, input_dir, &output_dir, sink);
                sink.tick();
                (idx, outcome)
            })
            .collect();
        indexed.sort_by_key(|(idx, _)| *idx);

        let summary = BatchSummary {
            outcomes: indexed.into_iter().map(|(_, outcome)| outcome).collect(),
        };

        sink.status(&format!(
            "Successfully converted {} out of {} files",
            summary.converted(),
            summary.total()
        ));
        if summary.failed() > 0 {
            sink.status(&format!("Failed to convert {} files", summary.failed()));
        }

        Ok(summary)
    }

    /// バッチ内の1ファイルを変換（失敗は値として返す）
    fn convert_batch_entry(
        &self,
        path: &Path,
        input_dir: &Path,
        output_dir: &Path,
        sink: &dyn ProgressSink,
    ) -> FileOutcome {
        let relative = path.strip_prefix(input_dir).unwrap_or(path);
        let output_path = output_dir.join(relative).with_extension("md");

        sink.status(&format!(
            "Converting: {} -> {}",
            path.display(),
            output_path.display()
        ));

        let result = match self.convert_file_to(path, &output_path, sink) {
            Ok(()) => {
                sink.status(&format!("✓ Successfully converted {}", path.display()));
                Ok(output_path)
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "batch conversion entry failed");
                sink.status(&format!("✘ Failed to convert {}: {e}", path.display()));
                Err(e)
            }
        };

        FileOutcome {
            input: path.to_path_buf(),
            result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_converter_builder_new() {
        let builder = ConverterBuilder::new();
        assert_eq!(builder.config.sheet_selector, SheetSelector::All);
        assert!(builder.config.include_headers);
        assert!(builder.config.encoding_override.is_none());
    }

    #[test]
    fn test_with_sheet_selector() {
        let builder = ConverterBuilder::new().with_sheet_selector(SheetSelector::Index(0));
        assert!(matches!(
            builder.config.sheet_selector,
            SheetSelector::Index(0)
        ));

        let builder =
            ConverterBuilder::new().with_sheet_selector(SheetSelector::Name("Sheet1".to_string()));
        assert!(matches!(
            builder.config.sheet_selector,
            SheetSelector::Name(ref name) if name == "Sheet1"
        ));
    }

    #[test]
    fn test_include_headers() {
        let builder = ConverterBuilder::new().include_headers(false);
        assert!(!builder.config.include_headers);
    }

    #[test]
    fn test_with_encoding_override() {
        let builder = ConverterBuilder::new().with_encoding_override("gbk");
        assert_eq!(builder.config.encoding_override.as_deref(), Some("gbk"));
    }

    #[test]
    fn test_build_success() {
        let result = ConverterBuilder::new().build();
        assert!(result.is_ok());
    }

    #[test]
    fn test_build_with_valid_encoding_override() {
        let result = ConverterBuilder::new()
            .with_encoding_override("gb18030")
            .build();
        assert!(result.is_ok());
    }

    #[test]
    fn test_build_with_invalid_encoding_override() {
        let result = ConverterBuilder::new()
            .with_encoding_override("utf-9")
            .build();
        match result {
            Err(SheetMarkError::Config(msg)) => {
                assert!(msg.contains("utf-9"));
            }
            _ => panic!("Expected Config error"),
        }
    }

    #[test]
    fn test_builder_method_chaining() {
        let builder = ConverterBuilder::new()
            .with_sheet_selector(SheetSelector::Index(1))
            .include_headers(false)
            .with_encoding_override("utf-8");

        assert!(matches!(
            builder.config.sheet_selector,
            SheetSelector::Index(1)
        ));
        assert!(!builder.config.include_headers);
        assert_eq!(builder.config.encoding_override.as_deref(), Some("utf-8"));
    }

    #[test]
    fn test_batch_summary_counts() {
        let summary = BatchSummary {
            outcomes: vec![
                FileOutcome {
                    input: PathBuf::from("a.csv"),
                    result: Ok(PathBuf::from("a.md")),
                },
                FileOutcome {
                    input: PathBuf::from("b.xlsx"),
                    result: Err(SheetMarkError::Config("bad".to_string())),
                },
                FileOutcome {
                    input: PathBuf::from("c.csv"),
                    result: Ok(PathBuf::from("c.md")),
                },
            ],
        };

        assert_eq!(summary.total(), 3);
        assert_eq!(summary.converted(), 2);
        assert_eq!(summary.failed(), 1);
    }

    #[test]
    fn test_batch_summary_default_is_empty() {
        let summary = BatchSummary::default();
        assert_eq!(summary.total(), 0);
        assert_eq!(summary.converted(), 0);
        assert_eq!(summary.failed(), 0);
    }
}
