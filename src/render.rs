//! Markdown Render Module
//!
//! グリッドをMarkdownテーブルテキストに変換するモジュール。
//! 内部状態を持たない純粋関数として実装されており、同じ入力に対して
//! 常にバイト単位で同一の出力を返します。

use crate::grid::Grid;

/// 空のグリッドに対して出力される固定テキスト
///
/// 有効なMarkdownテーブルではなく、意図的なリテラル出力です。
pub(crate) const EMPTY_TABLE_TEXT: &str = "Empty table";

/// グリッドをMarkdownテーブルテキストに変換
///
/// # 引数
///
/// * `grid` - 変換対象のグリッド
/// * `include_headers` - ヘッダー行と区切り行を出力するか
///
/// # 戻り値
///
/// 行を`\n`で連結した単一の文字列。先頭・末尾に余分な区切りを
/// 含まないため、呼び出し側はシート見出しと空行区切りで
/// そのまま連結できます。
///
/// # 出力ルール
///
/// - 空のグリッド（ローダー基準で空）は`Empty table`という
///   リテラルテキストになります。
/// - `include_headers`が真の場合、`| col1 | col2 | ... |`のヘッダー行と
///   列ごとに`---`を並べた区切り行を出力します。
/// - データ行は`| v1 | v2 | ... |`として出力し、空セルはパイプ間の
///   空文字列になります。
/// - セル内の`|`や改行などMarkdown上意味を持つ文字はエスケープ
///   しません。元実装から引き継いだ既知の忠実性ギャップであり、
///   テストで明示しています。
///
/// # 使用例
///
/// ```rust
/// use sheetmark::{render_markdown, CellValue, Grid};
///
/// let grid = Grid::new(
///     vec!["X".to_string(), "Y".to_string()],
///     vec![vec![
///         CellValue::Text("a".to_string()),
///         CellValue::Number(1.0),
///     ]],
/// );
///
/// let markdown = render_markdown(&grid, true);
/// assert_eq!(markdown, "| X | Y |\n| --- | --- |\n| a | 1 |");
/// ```
pub fn render_markdown(grid: &Grid, include_headers: bool) -> String {
    if grid.is_empty() {
        return EMPTY_TABLE_TEXT.to_string();
    }

    let mut lines = Vec::with_capacity(grid.rows().len() + 2);

    if include_headers {
        let header_row = format!("| {} |", grid.columns().join(" | "));
        let separator_row = format!(
            "| {} |",
            vec!["---"; grid.width()].join(" | ")
        );
        lines.push(header_row);
        lines.push(separator_row);
    }

    for row in grid.rows() {
        debug_assert_eq!(row.len(), grid.width());
        let cells: Vec<String> = row.iter().map(|cell| cell.render()).collect();
        lines.push(format!("| {} |", cells.join(" | ")));
    }

    lines.join("\n")
}
