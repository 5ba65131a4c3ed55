//! Loader Module
//!
//! Excel/CSVファイルをグリッド構造に読み込むモジュール。
//! Excel系（xlsx/xls）はcalamine、CSVはエンコーディング検出付きの
//! csvクレートで解析します。
//!
//! 最初のデータ行が列名になり、残りがデータ行になります。行の
//! セル数が列数に満たない場合はここで空セルを補い、グリッドの
//! 不変条件（全行が列数と同じセル数を持つ）を成立させます。

use std::fs;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader};
use chrono::{Duration, NaiveDate};
use csv::ReaderBuilder;
use tracing::debug;

use crate::encoding::{decode_bytes, detect_encoding};
use crate::error::SheetMarkError;
use crate::grid::{CellValue, Grid};

/// サポートする入力ファイルの拡張子
pub const SUPPORTED_EXTENSIONS: [&str; 3] = ["xlsx", "xls", "csv"];

/// パスの拡張子を小文字で取得（拡張子なしの場合は空文字列）
pub(crate) fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default()
}

/// パスがサポート対象の拡張子を持つか判定
pub fn is_supported(path: &Path) -> bool {
    SUPPORTED_EXTENSIONS.contains(&extension_of(path).as_str())
}

/// ワークブックのシート名を元の順序で取得
///
/// # 引数
///
/// * `path` - ワークブックファイル（xlsx/xls）のパス
///
/// # 戻り値
///
/// * `Ok(Vec<String>)` - シート名のリスト（ワークブック内の順序）
/// * `Err(SheetMarkError)` - 拡張子がサポート外、または解析失敗
pub fn list_sheets(path: &Path) -> Result<Vec<String>, SheetMarkError> {
    let extension = extension_of(path);
    match extension.as_str() {
        "xlsx" | "xls" => {
            let workbook = open_workbook_auto(path)?;
            Ok(workbook.sheet_names().to_vec())
        }
        // CSVは単一テーブルなのでシートを持たない
        "csv" => Ok(Vec::new()),
        _ => Err(SheetMarkError::UnsupportedExtension { extension }),
    }
}

/// ファイルをグリッドに読み込む
///
/// # 引数
///
/// * `path` - 入力ファイルのパス
/// * `sheet` - Excelファイルで読み込むシート名。`None`の場合は最初のシート
///
/// # 戻り値
///
/// * `Ok(Grid)` - 読み込まれたグリッド
/// * `Err(SheetMarkError)` - サポート外の拡張子、解析失敗、シート未存在
///
/// # 使用例
///
/// ```rust,no_run
/// use std::path::Path;
/// use sheetmark::load;
///
/// # fn main() -> Result<(), sheetmark::SheetMarkError> {
/// let grid = load(Path::new("data.csv"), None)?;
/// println!("{} columns", grid.width());
/// # Ok(())
/// # }
/// ```
pub fn load(path: &Path, sheet: Option<&str>) -> Result<Grid, SheetMarkError> {
    load_with_encoding(path, sheet, None)
}

/// エンコーディング指定付きでファイルをグリッドに読み込む
///
/// `encoding_override`が指定された場合、CSVの自動検出をスキップして
/// そのラベルでデコードします。Excel系の読み込みには影響しません。
pub(crate) fn load_with_encoding(
    path: &Path,
    sheet: Option<&str>,
    encoding_override: Option<&str>,
) -> Result<Grid, SheetMarkError> {
    let extension = extension_of(path);
    match extension.as_str() {
        "xlsx" | "xls" => load_excel(path, sheet),
        "csv" => load_csv(path, encoding_override),
        _ => Err(SheetMarkError::UnsupportedExtension { extension }),
    }
}

/// Excelファイルの1シートをグリッドに読み込む
fn load_excel(path: &Path, sheet: Option<&str>) -> Result<Grid, SheetMarkError> {
    let mut workbook = open_workbook_auto(path)?;
    let sheet_names = workbook.sheet_names().to_vec();

    let sheet_name = match sheet {
        Some(name) => {
            if !sheet_names.iter().any(|candidate| candidate == name) {
                return Err(SheetMarkError::SheetNotFound {
                    name: name.to_string(),
                });
            }
            name.to_string()
        }
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| SheetMarkError::Parse(calamine::Error::Msg("workbook has no sheets")))?,
    };

    let range = workbook.worksheet_range(&sheet_name)?;

    debug!(
        path = %path.display(),
        sheet = %sheet_name,
        rows = range.height(),
        "loaded worksheet range"
    );

    let raw_rows: Vec<Vec<CellValue>> = range
        .rows()
        .map(|row| row.iter().map(data_to_cell).collect())
        .collect();

    Ok(grid_from_rows(raw_rows))
}

/// CSVファイルをグリッドに読み込む
///
/// エンコーディングを検出（または指定を使用）してテキストへデコード
/// した後、csvクレートで解析します。行ごとのフィールド数の揺れは
/// 許容し（`flexible`）、グリッド構築時にパディングで吸収します。
fn load_csv(path: &Path, encoding_override: Option<&str>) -> Result<Grid, SheetMarkError> {
    let bytes = fs::read(path)?;

    let label = match encoding_override {
        Some(label) => label.to_string(),
        None => detect_encoding(path),
    };
    debug!(path = %path.display(), %label, "decoding CSV");
    let content = decode_bytes(&label, &bytes);

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut raw_rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: Vec<CellValue> = record
            .iter()
            .map(|field| {
                if field.is_empty() {
                    CellValue::Empty
                } else {
                    // CSVフィールドは数値に再解釈せず原文のまま保持する。
                    // "007"や"1.50"のような表記を変えないため
                    CellValue::Text(field.to_string())
                }
            })
            .collect();
        raw_rows.push(row);
    }

    Ok(grid_from_rows(raw_rows))
}

/// 生の行データからグリッドを構築
///
/// 最初の行を列名（文字列表現に強制）として使用し、残りをデータ行と
/// します。グリッド幅は全行の最大幅とし、短い行は空セルで、短い
/// ヘッダーは空の列名で埋めます。
fn grid_from_rows(mut raw_rows: Vec<Vec<CellValue>>) -> Grid {
    if raw_rows.is_empty() {
        return Grid::empty();
    }

    let width = raw_rows.iter().map(Vec::len).max().unwrap_or(0);
    if width == 0 {
        return Grid::empty();
    }

    let header = raw_rows.remove(0);
    let mut columns: Vec<String> = header.iter().map(CellValue::render).collect();
    columns.resize(width, String::new());

    let rows: Vec<Vec<CellValue>> = raw_rows
        .into_iter()
        .map(|mut row| {
            row.resize(width, CellValue::Empty);
            row
        })
        .collect();

    Grid::new(columns, rows)
}

/// calamineのセル値を正規化
///
/// 論理値・エラー値・日付は文字列に落とし、レンダラーが扱う値を
/// テキスト・数値・空の3種類に限定します。
fn data_to_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Text(b.to_string()),
        Data::Error(e) => CellValue::Text(e.to_string()),
        Data::DateTime(dt) => serial_to_text(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
        #[allow(unreachable_patterns)]
        _ => CellValue::Empty,
    }
}

/// Excelのシリアル日付値をISO形式のテキストに変換
///
/// 1900年システム（1899年12月30日起算）で変換します。時刻部分を
/// 持たないシリアル値は日付のみ（YYYY-MM-DD）になります。
/// エポック範囲外の値は数値のまま返します。
fn serial_to_text(serial: f64) -> CellValue {
    let epoch = match NaiveDate::from_ymd_opt(1899, 12, 30) {
        Some(date) => date,
        None => return CellValue::Number(serial),
    };

    let mut days = serial.floor() as i64;
    let day_fraction = serial - serial.floor();
    let mut seconds = (day_fraction * 86_400.0).round() as u32;
    // 丸めで翌日0時に繰り上がるケース
    if seconds >= 86_400 {
        days += 1;
        seconds = 0;
    }

    let date = match epoch.checked_add_signed(Duration::days(days)) {
        Some(date) => date,
        None => return CellValue::Number(serial),
    };

    if seconds == 0 {
        CellValue::Text(date.format("%Y-%m-%d").to_string())
    } else {
        match date.and_hms_opt(seconds / 3600, (seconds % 3600) / 60, seconds % 60) {
            Some(datetime) => CellValue::Text(datetime.format("%Y-%m-%d %H:%M:%S").to_string()),
            None => CellValue::Number(serial),
        }
    }
}
