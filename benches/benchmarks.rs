#[macro_use]
extern crate criterion;

use b64dec::alphabet::{DATA_SYMBOLS, STANDARD};
use b64dec::read::DecoderReader;
use b64dec::stream::decode_stream;
use b64dec::{decode, decode_group, decode_groups, decode_groups_parallel, SymbolGroup};
use criterion::{black_box, Bencher, BenchmarkId, Criterion, Throughput};
use rand::{Rng, SeedableRng};
use std::io::{self, Read};
use std::ops::ControlFlow;

fn do_decode_bench(b: &mut Bencher, &size: &usize) {
    let encoded = random_encoded(size, 0);

    b.iter(|| {
        let orig = decode(&encoded);
        black_box(&orig);
    });
}

fn do_decode_bench_noisy(b: &mut Bencher, &size: &usize) {
    // wrapped at 76 columns, like MIME
    let encoded = random_encoded(size, 76);

    b.iter(|| {
        let orig = decode(&encoded);
        black_box(&orig);
    });
}

fn do_decode_bench_stream(b: &mut Bencher, &size: &usize) {
    let encoded = random_encoded(size, 76);

    b.iter(|| {
        let report = decode_stream(
            &encoded[..],
            &mut io::sink(),
            &b64dec::decode::DEFAULT_DECODER,
            |_| ControlFlow::Continue(()),
        );
        black_box(&report);
    });
}

fn do_decode_bench_stream_reader(b: &mut Bencher, &size: &usize) {
    let encoded = random_encoded(size, 76);
    let mut buf = Vec::with_capacity(size * 3 / 4);

    b.iter(|| {
        buf.clear();
        let mut reader = DecoderReader::new(&encoded[..]);
        reader.read_to_end(&mut buf).unwrap();
        black_box(&buf);
    });
}

fn do_decode_groups_bench(b: &mut Bencher, &size: &usize) {
    let groups = random_groups(size);

    b.iter(|| {
        let decoded = decode_groups(&groups);
        black_box(&decoded);
    });
}

fn do_decode_groups_parallel_bench(b: &mut Bencher, &size: &usize) {
    let groups = random_groups(size);

    b.iter(|| {
        let decoded = decode_groups_parallel(&groups, 4);
        black_box(&decoded);
    });
}

fn do_decode_group_bench(b: &mut Bencher) {
    b.iter(|| {
        let chunk = decode_group(black_box(b"QUI="));
        black_box(&chunk);
    });
}

fn random_groups(size: usize) -> Vec<SymbolGroup> {
    let encoded = random_encoded(size, 0);
    encoded
        .chunks_exact(4)
        .map(|c| [c[0], c[1], c[2], c[3]])
        .collect()
}

/// `size` symbols of random unpadded base64, with a line break every `wrap` symbols if nonzero.
fn random_encoded(size: usize, wrap: usize) -> Vec<u8> {
    // weak randomness is plenty; we just want to not be completely friendly to the branch predictor
    let mut r = rand::rngs::SmallRng::from_entropy();
    let symbols = size / 4 * 4;

    let mut v = Vec::with_capacity(symbols + symbols / 38);
    for i in 0..symbols {
        if wrap > 0 && i > 0 && i % wrap == 0 {
            v.extend_from_slice(b"\r\n");
        }
        v.push(STANDARD.symbol_at(r.gen_range(0..DATA_SYMBOLS as u8)).unwrap());
    }
    v
}

const BYTE_SIZES: [usize; 5] = [4, 64, 512, 4096, 8192];

// Benchmarks over these byte sizes take longer so we will run fewer samples.
const LARGE_BYTE_SIZES: [usize; 3] = [102400, 1024 * 1024, 10 * 1024 * 1024];

fn decode_benchmarks(c: &mut Criterion, label: &str, byte_sizes: &[usize]) {
    let mut group = c.benchmark_group(label);
    group
        .warm_up_time(std::time::Duration::from_millis(500))
        .measurement_time(std::time::Duration::from_secs(3));

    for size in byte_sizes {
        group
            .throughput(Throughput::Bytes(*size as u64))
            .bench_with_input(BenchmarkId::new("decode", size), size, do_decode_bench)
            .bench_with_input(
                BenchmarkId::new("decode_noisy", size),
                size,
                do_decode_bench_noisy,
            )
            .bench_with_input(
                BenchmarkId::new("decode_stream", size),
                size,
                do_decode_bench_stream,
            )
            .bench_with_input(
                BenchmarkId::new("decode_stream_reader", size),
                size,
                do_decode_bench_stream_reader,
            )
            .bench_with_input(
                BenchmarkId::new("decode_groups", size),
                size,
                do_decode_groups_bench,
            )
            .bench_with_input(
                BenchmarkId::new("decode_groups_parallel", size),
                size,
                do_decode_groups_parallel_bench,
            );
    }

    group.finish();
}

fn bench(c: &mut Criterion) {
    let _ = c.bench_function("decode_group", do_decode_group_bench);
    decode_benchmarks(c, "decode_small_input", &BYTE_SIZES[..]);
    decode_benchmarks(c, "decode_large_input", &LARGE_BYTE_SIZES[..]);
}

criterion_group!(benches, bench);
criterion_main!(benches);
