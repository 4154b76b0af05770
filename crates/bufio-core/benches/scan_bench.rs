//! Stream read-path benchmarks.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use bufio_core::testing::MemoryIo;
use bufio_core::{OpenMode, Stream};

fn line_corpus(line_len: usize, lines: usize) -> Vec<u8> {
    let mut data = Vec::with_capacity((line_len + 1) * lines);
    for _ in 0..lines {
        data.extend(std::iter::repeat_n(b'x', line_len));
        data.push(b'\n');
    }
    data
}

fn bench_read_line(c: &mut Criterion) {
    let line_lens: &[usize] = &[16, 256, 4096];
    let mut group = c.benchmark_group("read_line");

    for &len in line_lens {
        let data = line_corpus(len, 256);
        group.throughput(Throughput::Bytes(data.len() as u64));

        group.bench_with_input(BenchmarkId::new("newline", len), &data, |b, data| {
            b.iter(|| {
                let mut s = Stream::new(MemoryIo::new(data), OpenMode::reading());
                while let Some(line) = s.gets().unwrap() {
                    black_box(line);
                }
            });
        });
    }
    group.finish();
}

fn bench_bounded_read(c: &mut Criterion) {
    let chunk_sizes: &[usize] = &[1, 64, 4096];
    let data = vec![0xABu8; 1 << 16];
    let mut group = c.benchmark_group("bounded_read");
    group.throughput(Throughput::Bytes(data.len() as u64));

    for &chunk in chunk_sizes {
        group.bench_with_input(BenchmarkId::new("chunk", chunk), &chunk, |b, &chunk| {
            b.iter(|| {
                let mut s = Stream::new(MemoryIo::new(&data), OpenMode::reading());
                while let Some(bytes) = s.read(Some(chunk)).unwrap() {
                    black_box(bytes);
                }
            });
        });
    }
    group.finish();
}

fn bench_pushback_cycle(c: &mut Criterion) {
    let data = vec![b'z'; 4096];
    c.bench_function("ungetc_read_cycle", |b| {
        b.iter(|| {
            let mut s = Stream::new(MemoryIo::new(&data), OpenMode::reading());
            for _ in 0..256 {
                let byte = s.read_byte().unwrap();
                s.ungetbyte(black_box(byte));
                black_box(s.read_byte().unwrap());
            }
        });
    });
}

criterion_group!(benches, bench_read_line, bench_bounded_read, bench_pushback_cycle);
criterion_main!(benches);
