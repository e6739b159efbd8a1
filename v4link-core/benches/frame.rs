use criterion::{Criterion, black_box, criterion_group, criterion_main};
use v4link_core::{Command, Frame, checksum};

fn bench_checksum(c: &mut Criterion) {
    let data = vec![0x5Au8; 512];

    c.bench_function("checksum_512", |b| {
        b.iter(|| checksum::calculate(black_box(&data)))
    });
}

fn bench_encode(c: &mut Criterion) {
    let frame = Frame::new(Command::Exec, vec![0x76u8; 512]).unwrap();

    c.bench_function("encode_exec_512", |b| b.iter(|| black_box(&frame).encode()));
}

fn bench_decode_status(c: &mut Criterion) {
    let response = [0xA5, 0x01, 0x00, 0x00, 0x6B];

    c.bench_function("decode_status", |b| {
        b.iter(|| Frame::decode_status(black_box(&response)))
    });
}

criterion_group!(benches, bench_checksum, bench_encode, bench_decode_status);
criterion_main!(benches);
