use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::io::Cursor;

use fixarrow::{convert, EngineConfig, FieldSpec, FieldType, RowLayout};

fn layout() -> RowLayout {
    RowLayout::single(vec![
        FieldSpec::new("idnr", 11, FieldType::Int64),
        FieldSpec::new("description", 20, FieldType::String),
        FieldSpec::new("amount", 12, FieldType::Float64),
    ])
}

fn generate_input(rows: usize) -> Vec<u8> {
    let mut buf = Vec::with_capacity(rows * 44);
    for i in 0..rows {
        buf.extend_from_slice(format!("{:011}", i).as_bytes());
        buf.extend_from_slice(b"Widget              ");
        buf.extend_from_slice(format!("{:>12}", "123.45").as_bytes());
        buf.push(b'\n');
    }
    buf
}

fn bench_convert(c: &mut Criterion) {
    let layout = layout();
    let rows = 200_000;
    let input = generate_input(rows);

    let mut group = c.benchmark_group("convert");
    group.throughput(Throughput::Bytes(input.len() as u64));

    for cores in [1usize, 2, 4] {
        group.bench_with_input(BenchmarkId::from_parameter(cores), &cores, |b, &cores| {
            let config = EngineConfig::new().with_cores(cores).with_column_cap(rows / cores.max(1));
            b.iter(|| {
                convert(Cursor::new(input.clone()), input.len() as u64, &layout, &config).unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_convert);
criterion_main!(benches);
