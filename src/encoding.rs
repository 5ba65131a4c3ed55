//! Encoding Detection Module
//!
//! テキストファイルの先頭サンプルから文字エンコーディングを推定する
//! モジュール。統計的検出（chardet）が低信頼度の場合は、固定順序の
//! フォールバックラダーを試行します。
//!
//! このモジュールはエラーを返しません。すべての推定が失敗した場合でも
//! `utf-8`を返します（正しさの保証ではなく損失許容のデフォルトであり、
//! 後段のデコードで置換文字が生じる可能性があります）。

use std::fs::File;
use std::io::Read;
use std::path::Path;

use encoding_rs::{DecoderResult, Encoding, UTF_8};
use tracing::debug;

/// 統計的検出の信頼度しきい値
const CONFIDENCE_THRESHOLD: f32 = 0.7;

/// ファイル先頭から読み取るサンプルサイズ（バイト）
const SAMPLE_SIZE: usize = 10_000;

/// ラダー試行時にデコードするプレフィックス長（バイト）
///
/// 元の検証は先頭100文字の読み取りであり、1文字最大4バイトとして
/// 等価なバイト数に換算しています。
const PROBE_PREFIX_BYTES: usize = 400;

/// フォールバックラダー
///
/// 統計的検出が低信頼度の場合に順に試行するエンコーディングラベル。
/// この順序は動作契約であり、変更してはいけません。
pub const FALLBACK_LADDER: [&str; 6] = ["gb18030", "gbk", "gb2312", "utf-8", "utf-16", "big5"];

/// ファイルのエンコーディングを検出
///
/// ファイル先頭から最大10,000バイト（ファイルがそれより短い場合は全体）を
/// サンプルとして読み取り、エンコーディングラベルを返します。
///
/// # 引数
///
/// * `path` - 検出対象のファイルパス
///
/// # 戻り値
///
/// 小文字のエンコーディングラベル（例: `utf-8`、`gbk`）。
/// ファイルが読み取れない場合も`utf-8`を返します。読み取りエラー自体は
/// 後段のローダーが改めて検出します。
pub fn detect_encoding(path: &Path) -> String {
    let mut sample = Vec::with_capacity(SAMPLE_SIZE);
    let reached_eof = match File::open(path) {
        Ok(file) => match file.take(SAMPLE_SIZE as u64).read_to_end(&mut sample) {
            Ok(n) => n < SAMPLE_SIZE,
            Err(_) => return "utf-8".to_string(),
        },
        Err(_) => return "utf-8".to_string(),
    };

    let label = detect_from_sample(&sample, reached_eof);
    debug!(path = %path.display(), %label, "detected encoding");
    label
}

/// バイトサンプルからエンコーディングを検出（純粋関数）
///
/// # 引数
///
/// * `sample` - ファイル先頭のバイトサンプル
/// * `reached_eof` - サンプルがファイル全体を含むか
///   （真の場合、ラダー試行で末尾の不完全なバイト列は失敗扱いになる）
///
/// # アルゴリズム
///
/// 1. chardetによる統計的検出。信頼度が0.7以上なら候補を採用。
/// 2. 低信頼度の場合、フォールバックラダーを順に試行し、
///    プレフィックスをエラーなくデコードできた最初のラベルを返す。
/// 3. すべて失敗した場合は`utf-8`。
pub fn detect_from_sample(sample: &[u8], reached_eof: bool) -> String {
    let (charset, confidence, _language) = chardet::detect(sample);

    if !charset.is_empty() && confidence >= CONFIDENCE_THRESHOLD {
        let label = chardet::charset2encoding(&charset).to_ascii_lowercase();
        // デコーダーが解決できない候補名は採用せずラダーに回す
        if !label.is_empty() && is_known_label(&label) {
            debug!(%label, confidence, "statistical detection accepted");
            return label;
        }
    }

    debug!(confidence, "statistical detection below threshold, trying fallback ladder");
    if let Some(label) = ladder_fallback(sample, reached_eof) {
        return label;
    }

    // 損失許容のデフォルト。正しさは保証しない
    "utf-8".to_string()
}

/// フォールバックラダーを順に試行
///
/// プレフィックスをエラーなくデコードできた最初のラベルを返します。
fn ladder_fallback(sample: &[u8], reached_eof: bool) -> Option<String> {
    let prefix_len = sample.len().min(PROBE_PREFIX_BYTES);
    let prefix = &sample[..prefix_len];
    // プレフィックスがファイル全体を含む場合のみEOFセマンティクスで検証する。
    // 元の検証はデコードストリームから100文字を読む方式であり、
    // 途中で切られた末尾バイト列はEOFでのみエラーになる
    let last = reached_eof && sample.len() <= PROBE_PREFIX_BYTES;

    for label in FALLBACK_LADDER {
        let encoding = match Encoding::for_label(label.as_bytes()) {
            Some(encoding) => encoding,
            None => continue,
        };
        if probe_decode(encoding, prefix, last) {
            debug!(%label, "fallback ladder accepted");
            return Some(label.to_string());
        }
    }

    None
}

/// プレフィックスが指定エンコーディングでエラーなくデコードできるか検証
fn probe_decode(encoding: &'static Encoding, prefix: &[u8], last: bool) -> bool {
    let mut decoder = encoding.new_decoder();
    let capacity = decoder
        .max_utf8_buffer_length_without_replacement(prefix.len())
        .unwrap_or(prefix.len() * 4);
    let mut output = String::with_capacity(capacity);

    let (result, _bytes_read) =
        decoder.decode_to_string_without_replacement(prefix, &mut output, last);
    !matches!(result, DecoderResult::Malformed(_, _))
}

/// ラベルでバイト列をデコード（置換文字許容）
///
/// ラベルが解決できない場合はUTF-8として扱います。不正なバイト列は
/// 置換文字（U+FFFD）になります。CSVローダーが使用します。
pub(crate) fn decode_bytes(label: &str, bytes: &[u8]) -> String {
    let encoding = Encoding::for_label(label.as_bytes()).unwrap_or(UTF_8);
    let (decoded, _encoding_used, had_errors) = encoding.decode(bytes);
    if had_errors {
        debug!(%label, "decoded with replacement characters");
    }
    decoded.into_owned()
}

/// ラベルが既知のエンコーディングに解決できるか検証
pub(crate) fn is_known_label(label: &str) -> bool {
    Encoding::for_label(label.as_bytes()).is_some()
}
