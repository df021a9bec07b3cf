use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use std::num::NonZeroUsize;

use distcast_core::{Column, Frame};
use distcast_engine::{Balance, PartitionSpec};

/// `series` series of `len` rows each, interleaved the way a row-chunked source delivers them.
fn interleaved_frame(series: usize, len: usize) -> Frame {
    let mut ids = Vec::with_capacity(series * len);
    let mut ys = Vec::with_capacity(series * len);
    for t in 0..len {
        for s in 0..series {
            ids.push(format!("series-{s}"));
            ys.push((s * len + t) as f64);
        }
    }
    Frame::new(vec![Column::utf8("unique_id", ids), Column::float64("y", ys)])
        .expect("columns have equal length")
}

fn bench_split(c: &mut Criterion) {
    let mut group = c.benchmark_group("partition_split");
    let num = NonZeroUsize::new(8).expect("non-zero");

    for &series in &[10usize, 1_000, 10_000] {
        let frame = interleaved_frame(series, 24);
        group.throughput(Throughput::Elements(frame.num_rows() as u64));

        for (label, balance) in [("coarse", Balance::Coarse), ("even", Balance::Even)] {
            let spec = PartitionSpec::new("unique_id", num).with_balance(balance);
            group.bench_with_input(BenchmarkId::new(label, series), &frame, |b, frame| {
                b.iter(|| spec.split(black_box(frame)).expect("split"))
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_split);
criterion_main!(benches);
