//! Error Types Module
//!
//! クレート全体で使用する構造化エラー型を定義するモジュール。
//! `thiserror`を使用して、エラーの自動変換とメッセージフォーマットを実現する。

use thiserror::Error;

/// sheetmarkクレート全体で使用するエラー型
///
/// このエラー型は、Excel/CSVファイルの読み込み、解析、変換処理中に発生する
/// すべてのエラーを統一的に扱うために使用されます。
///
/// # エラーの種類
///
/// - `Io`: I/O操作中に発生したエラー（ファイル読み込み失敗など）
/// - `Parse`: ワークブックの解析中に発生したエラー（calamine由来）
/// - `Csv`: CSVファイルの解析中に発生したエラー（csvクレート由来）
/// - `UnsupportedExtension`: サポート外の拡張子が指定されたエラー
/// - `SheetNotFound`: 指定されたシートが存在しないエラー
/// - `Config`: 設定の検証に失敗したエラー（無効なシート指定など）
///
/// なお、エンコーディング検出はエラーを返しません。統計的検出と
/// フォールバックラダーがすべて失敗した場合でも`utf-8`を返します。
///
/// # 使用例
///
/// ```rust,no_run
/// use sheetmark::SheetMarkError;
/// use std::fs::File;
///
/// fn open_input(path: &str) -> Result<(), SheetMarkError> {
///     let file = File::open(path)?;  // Ioエラーが自動的に変換される
///     // ... 処理 ...
///     Ok(())
/// }
/// ```
#[derive(Error, Debug)]
pub enum SheetMarkError {
    /// I/O操作中に発生したエラー
    ///
    /// `#[from]`属性により、`std::io::Error`から自動的に変換されます。
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ワークブックの解析中に発生したエラー
    ///
    /// calamineクレートがExcelファイルを解析する際に発生したエラーです。
    /// ファイル形式が不正、破損したファイルなどが原因となります。
    ///
    /// `#[from]`属性により、`calamine::Error`から自動的に変換されます。
    #[error("Failed to parse workbook: {0}")]
    Parse(#[from] calamine::Error),

    /// CSVファイルの解析中に発生したエラー
    ///
    /// `#[from]`属性により、`csv::Error`から自動的に変換されます。
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// サポート外の拡張子が指定されたエラー
    ///
    /// 入力ファイルの拡張子が`.xlsx`、`.xls`、`.csv`のいずれでもない場合に
    /// 発生します。該当ファイルに対しては致命的なエラーです。
    #[error("Unsupported file extension: '{extension}' (expected xlsx, xls, or csv)")]
    UnsupportedExtension {
        /// 入力ファイルの拡張子（拡張子なしの場合は空文字列）
        extension: String,
    },

    /// 指定されたシートが存在しないエラー
    #[error("Sheet '{name}' not found")]
    SheetNotFound {
        /// 見つからなかったシート名
        name: String,
    },

    /// 設定の検証に失敗したエラー
    ///
    /// `ConverterBuilder::build()`時に設定を検証し、無効な設定が検出された
    /// 場合に発生します。例えば、シートインデックスが範囲外の場合や、
    /// エンコーディング指定が不正なラベルの場合などです。
    #[error("Configuration error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    // Ioエラーのテスト
    #[test]
    fn test_io_error() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error: SheetMarkError = io_err.into();

        match error {
            SheetMarkError::Io(e) => {
                assert_eq!(e.kind(), io::ErrorKind::NotFound);
                assert_eq!(e.to_string(), "File not found");
            }
            _ => panic!("Expected Io error"),
        }
    }

    #[test]
    fn test_io_error_display() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "Permission denied");
        let error: SheetMarkError = io_err.into();

        let error_msg = error.to_string();
        assert!(error_msg.contains("IO error"));
        assert!(error_msg.contains("Permission denied"));
    }

    // Parseエラーのテスト
    #[test]
    fn test_parse_error() {
        let parse_err = calamine::Error::Msg("Invalid file format");
        let error: SheetMarkError = parse_err.into();

        match error {
            SheetMarkError::Parse(e) => match e {
                calamine::Error::Msg(msg) => {
                    assert_eq!(msg, "Invalid file format");
                }
                _ => panic!("Expected Msg variant"),
            },
            _ => panic!("Expected Parse error"),
        }
    }

    #[test]
    fn test_parse_error_display() {
        let parse_err = calamine::Error::Msg("Corrupted file");
        let error: SheetMarkError = parse_err.into();

        let error_msg = error.to_string();
        assert!(error_msg.contains("Failed to parse workbook"));
        assert!(error_msg.contains("Corrupted file"));
    }

    // UnsupportedExtensionエラーのテスト
    #[test]
    fn test_unsupported_extension_error() {
        let error = SheetMarkError::UnsupportedExtension {
            extension: "pdf".to_string(),
        };

        let error_msg = error.to_string();
        assert!(error_msg.contains("Unsupported file extension"));
        assert!(error_msg.contains("pdf"));
        assert!(error_msg.contains("xlsx, xls, or csv"));
    }

    #[test]
    fn test_unsupported_extension_error_empty() {
        let error = SheetMarkError::UnsupportedExtension {
            extension: String::new(),
        };

        assert!(error.to_string().contains("''"));
    }

    // SheetNotFoundエラーのテスト
    #[test]
    fn test_sheet_not_found_error() {
        let error = SheetMarkError::SheetNotFound {
            name: "Summary".to_string(),
        };

        let error_msg = error.to_string();
        assert!(error_msg.contains("Sheet 'Summary' not found"));
    }

    // Configエラーのテスト
    #[test]
    fn test_config_error() {
        let error = SheetMarkError::Config("Sheet index 5 is out of range".to_string());

        match error {
            SheetMarkError::Config(msg) => {
                assert_eq!(msg, "Sheet index 5 is out of range");
            }
            _ => panic!("Expected Config error"),
        }
    }

    #[test]
    fn test_config_error_display() {
        let error = SheetMarkError::Config("Unknown encoding label: 'utf-9'".to_string());
        let error_msg = error.to_string();

        assert!(error_msg.contains("Configuration error"));
        assert!(error_msg.contains("utf-9"));
    }

    // エラー変換のテスト（?演算子の動作確認）
    #[test]
    fn test_error_conversion_with_question_mark() {
        fn io_operation() -> Result<(), SheetMarkError> {
            let _file = std::fs::File::open("nonexistent_file.xlsx")?;
            Ok(())
        }

        let result = io_operation();
        assert!(result.is_err());

        match result {
            Err(SheetMarkError::Io(_)) => {}
            _ => panic!("Expected Io error from ? operator"),
        }
    }

    // エラーメッセージのフォーマット確認
    #[test]
    fn test_all_error_formats() {
        // Io
        let io_err: SheetMarkError = io::Error::other("test io").into();
        assert!(io_err.to_string().starts_with("IO error"));

        // Parse
        let parse_err: SheetMarkError = calamine::Error::Msg("test parse").into();
        assert!(parse_err.to_string().starts_with("Failed to parse workbook"));

        // UnsupportedExtension
        let ext_err = SheetMarkError::UnsupportedExtension {
            extension: "txt".to_string(),
        };
        assert!(ext_err.to_string().starts_with("Unsupported file extension"));

        // SheetNotFound
        let sheet_err = SheetMarkError::SheetNotFound {
            name: "Sheet1".to_string(),
        };
        assert!(sheet_err.to_string().starts_with("Sheet"));

        // Config
        let config_err = SheetMarkError::Config("test config".to_string());
        assert!(config_err.to_string().starts_with("Configuration error"));
    }
}
