//! Grid Module
//!
//! レンダラーが消費する矩形テーブル構造を定義するモジュール。
//! 列名の順序列と行の順序列（各行はセル値の順序列）から構成されます。

/// セルの値を表す列挙型
///
/// ローダーが論理値・エラー値・日付などをすべて文字列に正規化するため、
/// レンダラーが扱う値はこの3種類だけです。
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// 文字列
    Text(String),

    /// 数値（f64）
    Number(f64),

    /// 空セル
    Empty,
}

impl CellValue {
    /// 値が空かどうかを判定
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// 値をMarkdownセル用の文字列として取得
    ///
    /// 空セルは空文字列になります（"None"や"null"のような
    /// プレースホルダは使用しません）。数値はf64のデフォルト表記です
    /// （桁区切りなし、固定小数点パディングなし）。
    pub fn render(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Empty => String::new(),
        }
    }
}

/// 矩形テーブル構造
///
/// ローダーによって生成された後は不変として扱います。
///
/// # 不変条件
///
/// すべての行のセル数は列名の数と一致します。末尾セルが欠けた行の
/// パディングはローダーの責務であり、レンダラーは再検証しません。
#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Grid {
    /// 列名と行データからグリッドを生成
    ///
    /// # 引数
    ///
    /// * `columns` - 列名の順序列（ソース上で一意である必要はない）
    /// * `rows` - 行の順序列。各行は`columns.len()`個のセルを持つこと
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        debug_assert!(
            rows.iter().all(|row| row.len() == columns.len()),
            "every row must have exactly as many cells as there are columns"
        );
        Self { columns, rows }
    }

    /// 行も列も持たない空のグリッドを生成
    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// 列名のスライスを取得
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// 行データのスライスを取得
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// 列数を取得
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// グリッドが空かどうかを判定
    ///
    /// どちらかの軸が長さ0であれば空とみなします。ヘッダー行しか持たない
    /// ファイル（列はあるが行がない）も空として扱われます。
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }
}
