//! パフォーマンスベンチマーク
//!
//! コア2コンポーネント（エンコーディング検出・Markdownレンダリング）の
//! 処理速度を測定します。

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use sheetmark::{detect_from_sample, render_markdown, CellValue, Grid};

/// ベンチマーク用のグリッドを生成（rows行 × cols列）
fn build_grid(rows: usize, cols: usize) -> Grid {
    let columns: Vec<String> = (0..cols).map(|c| format!("Col{c}")).collect();
    let data: Vec<Vec<CellValue>> = (0..rows)
        .map(|r| {
            (0..cols)
                .map(|c| match c % 3 {
                    0 => CellValue::Text(format!("cell-{r}-{c}")),
                    1 => CellValue::Number((r * c) as f64 + 0.5),
                    _ => CellValue::Empty,
                })
                .collect()
        })
        .collect();
    Grid::new(columns, data)
}

fn benchmark_render(c: &mut Criterion) {
    let grid = build_grid(1_000, 10);

    let mut group = c.benchmark_group("render");
    group.throughput(Throughput::Elements(1_000));

    group.bench_function("render_1000x10_with_headers", |b| {
        b.iter(|| black_box(render_markdown(black_box(&grid), true)));
    });

    group.bench_function("render_1000x10_without_headers", |b| {
        b.iter(|| black_box(render_markdown(black_box(&grid), false)));
    });

    group.finish();
}

fn benchmark_detection(c: &mut Criterion) {
    // 統計的検出が高信頼度で成功するサンプル
    let utf8_sample = "编码检测基准测试，包含足够长的中文文本。\n".repeat(200);
    // 統計的検出が低信頼度となり、ラダーに落ちるサンプル
    let (gbk_sample, _, _) = encoding_rs::GBK.encode("短文");

    let mut group = c.benchmark_group("detection");
    group.throughput(Throughput::Bytes(utf8_sample.len() as u64));

    group.bench_function("detect_utf8_statistical", |b| {
        b.iter(|| black_box(detect_from_sample(black_box(utf8_sample.as_bytes()), true)));
    });

    group.bench_function("detect_short_sample_ladder", |b| {
        b.iter(|| black_box(detect_from_sample(black_box(&gbk_sample), true)));
    });

    group.finish();
}

criterion_group!(benches, benchmark_render, benchmark_detection);
criterion_main!(benches);
