use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use lumiquant::ingest::parse_rows;
use lumiquant::table::Cell;

/// Generate a synthetic multi-block export for benchmarking
fn generate_export(blocks: usize, rows_per_block: usize, wells: usize) -> Vec<Vec<Cell>> {
    let mut table = Vec::new();
    table.push(vec![Cell::from_text("Assay export"), Cell::from_text("synthetic")]);

    for block in 0..blocks {
        let mut header = vec![Cell::Missing, Cell::from_text("Time")];
        for index in 0..wells {
            let row_letter = (b'A' + (index / 12) as u8) as char;
            let column = (index % 12) + 1;
            header.push(Cell::from_text(&format!("{row_letter}{column}")));
        }
        table.push(header);

        for row in 0..rows_per_block {
            let minutes = (block * rows_per_block + row) as f64 * 0.5;
            let mut record = vec![Cell::Missing, Cell::Number(minutes)];
            for index in 0..wells {
                record.push(Cell::Number(1000.0 + (index as f64) * (row as f64 + 1.0)));
            }
            table.push(record);
        }
        table.push(vec![Cell::Missing, Cell::Missing]);
    }
    table
}

fn bench_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan_and_merge");

    for (blocks, rows, wells) in [(1, 120, 96), (4, 120, 96), (8, 240, 96)] {
        let table = generate_export(blocks, rows, wells);
        let readings = (blocks * rows * wells) as u64;
        group.throughput(Throughput::Elements(readings));
        group.bench_with_input(
            BenchmarkId::new("blocks", format!("{blocks}x{rows}x{wells}")),
            &table,
            |b, table| b.iter(|| parse_rows(table, "bench").unwrap()),
        );
    }
    group.finish();
}

criterion_group!(benches, bench_scan);
criterion_main!(benches);
