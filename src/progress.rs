//! Progress Sink Module
//!
//! 変換の進捗を通知するための出力シンクを定義するモジュール。
//! シンクは呼び出し側から明示的に渡され、プロセス全体で共有される
//! グローバル状態は持ちません。観測専用であり、シンクの実装が変換の
//! 動作に影響することはありません。

/// 進捗通知を受け取るシンク
///
/// バッチ変換ではワーカープールから共有されるため`Sync`を要求します。
pub trait ProgressSink: Sync {
    /// ステータスメッセージを通知
    fn status(&self, message: &str);

    /// 1項目の完了を通知
    fn tick(&self);
}

/// 標準エラー出力へ書き出すシンク
///
/// 変換結果は標準出力へ出る場合があるため、進捗は標準エラー出力に
/// 分離します。
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    /// 新しいConsoleSinkを生成
    pub fn new() -> Self {
        Self
    }
}

impl ProgressSink for ConsoleSink {
    fn status(&self, message: &str) {
        eprintln!("{message}");
    }

    fn tick(&self) {}
}

/// すべての通知を破棄するシンク
///
/// ライブラリ利用やテストで進捗表示が不要な場合に使用します。
#[derive(Debug, Default)]
pub struct NullSink;

impl NullSink {
    /// 新しいNullSinkを生成
    pub fn new() -> Self {
        Self
    }
}

impl ProgressSink for NullSink {
    fn status(&self, _message: &str) {}

    fn tick(&self) {}
}
