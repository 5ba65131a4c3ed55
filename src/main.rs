//! sheetmark CLI - Excel/CSVファイルをMarkdownテーブルに変換するコマンドラインツール

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use sheetmark::{ConsoleSink, ConverterBuilder, ProgressSink, SheetSelector};

#[derive(Parser)]
#[command(name = "sheetmark")]
#[command(
    author,
    version,
    about = "Convert Excel/CSV file(s) to Markdown table format"
)]
struct Cli {
    /// Input file, or a directory when --directory is used
    input_path: PathBuf,

    /// Output Markdown file path or directory
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Sheet name (for Excel files)
    #[arg(short, long)]
    sheet: Option<String>,

    /// Preview the Markdown output
    #[arg(short, long)]
    preview: bool,

    /// Process all Excel/CSV files in the directory
    #[arg(short, long)]
    directory: bool,

    /// Recursively process subdirectories (when --directory is used)
    #[arg(short, long)]
    recursive: bool,

    /// Encoding for CSV files (e.g. utf-8, gbk, gb18030); auto-detected when omitted
    #[arg(short, long)]
    encoding: Option<String>,
}

fn main() -> Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_string()))
        .try_init();

    let cli = Cli::parse();
    let sink = ConsoleSink::new();
    sink.status("Excel/CSV to Markdown Converter");

    let mut builder = ConverterBuilder::new();
    // シート指定は単一ファイル変換でのみ有効。バッチでは全シートを変換する
    if !cli.directory {
        if let Some(name) = &cli.sheet {
            builder = builder.with_sheet_selector(SheetSelector::Name(name.clone()));
        }
    }
    if let Some(label) = &cli.encoding {
        builder = builder.with_encoding_override(label.clone());
    }
    let converter = builder.build().context("Invalid configuration")?;

    if cli.directory {
        sink.status(&format!(
            "Processing directory: {}",
            cli.input_path.display()
        ));
        converter
            .convert_directory(
                &cli.input_path,
                cli.output.as_deref(),
                cli.recursive,
                &sink,
            )
            .with_context(|| {
                format!("Failed to process directory '{}'", cli.input_path.display())
            })?;
        // バッチの個別失敗はサマリーとして報告済み。終了コードは0
        return Ok(());
    }

    sink.status(&format!("Converting: {}", cli.input_path.display()));

    let sections = converter
        .convert_file_sections(&cli.input_path, &sink)
        .with_context(|| format!("Failed to convert '{}'", cli.input_path.display()))?;

    // 出力先もプレビュー指定もない場合はプレビューにフォールバック
    let preview = cli.preview || cli.output.is_none();
    if preview {
        for (i, section) in sections.iter().enumerate() {
            if i > 0 {
                println!("\n---\n");
            }
            println!("{section}");
        }
    }

    if let Some(output_path) = &cli.output {
        // 出力は入力エンコーディングに関わらず常にUTF-8
        fs::write(output_path, sections.join("\n\n"))
            .with_context(|| format!("Failed to write '{}'", output_path.display()))?;
        sink.status(&format!(
            "Successfully converted to Markdown and saved to {}",
            output_path.display()
        ));
    }

    Ok(())
}
