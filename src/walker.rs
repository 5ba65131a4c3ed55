//! Walker Module
//!
//! ディレクトリから変換対象ファイルを列挙するモジュール。
//! 拡張子ごとにglobパターンを構築して検索します。

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::SheetMarkError;

/// ディレクトリから指定拡張子のファイルを列挙
///
/// # 引数
///
/// * `dir` - 検索対象のディレクトリ
/// * `extensions` - 対象とする拡張子のリスト（小文字、ドットなし）
/// * `recursive` - サブディレクトリを再帰的に検索するか
///
/// # 戻り値
///
/// * `Ok(Vec<PathBuf>)` - 見つかったファイルのパス（辞書順ソート済み）
/// * `Err(SheetMarkError)` - パターン構築に失敗した場合
///
/// 検索結果は決定的な順序（パスの辞書順）で返します。
pub fn find_files(
    dir: &Path,
    extensions: &[&str],
    recursive: bool,
) -> Result<Vec<PathBuf>, SheetMarkError> {
    let mut files = Vec::new();

    for extension in extensions {
        let pattern = if recursive {
            format!("{}/**/*.{}", dir.display(), extension)
        } else {
            format!("{}/*.{}", dir.display(), extension)
        };

        let paths = glob::glob(&pattern)
            .map_err(|e| SheetMarkError::Config(format!("Invalid glob pattern: {e}")))?;

        for entry in paths {
            match entry {
                Ok(path) => {
                    if path.is_file() {
                        files.push(path);
                    }
                }
                Err(e) => {
                    // 読めないエントリはスキップして列挙を続行する
                    debug!(error = %e, "skipping unreadable directory entry");
                }
            }
        }
    }

    files.sort();
    debug!(dir = %dir.display(), count = files.len(), recursive, "enumerated input files");
    Ok(files)
}
