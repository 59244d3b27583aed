use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

fn sample(len: usize) -> Vec<u8> {
    // mix of zero runs and noise, similar to deflated page content
    (0..len)
        .map(|i| if (i / 64) % 4 == 0 { 0 } else { (i * 31 % 251) as u8 })
        .collect()
}

fn bench_encode(c: &mut Criterion) {
    let data = sample(64 * 1024);
    let mut group = c.benchmark_group("ascii85");
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("encode 64k", |b| b.iter(|| pagegraft_ascii85::encode(black_box(&data))));

    let encoded = pagegraft_ascii85::encode(&data);
    group.bench_function("decode 64k", |b| {
        b.iter(|| pagegraft_ascii85::decode(black_box(encoded.as_bytes())))
    });
    group.finish();
}

criterion_group!(benches, bench_encode);
criterion_main!(benches);
